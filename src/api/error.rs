//! Failure taxonomy for calls against the admin API.
//!
//! Every request either never completes (`Network`), completes with a non-success
//! status (`Response`), or completes with a body that does not decode (`Parse`).
//! Callers in the list pipeline downgrade all three to empty results, so these
//! values mostly travel as diagnostics rather than as propagated errors.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network failure calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("{endpoint} responded with HTTP {status}")]
    Response {
        endpoint: String,
        status: StatusCode,
    },

    #[error("malformed response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },
}

impl FetchError {
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn response(endpoint: impl Into<String>, status: StatusCode) -> Self {
        FetchError::Response {
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn parse(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Parse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Classify a reqwest error raised while talking to `endpoint`.
    ///
    /// Decode failures are `Parse`; anything else means the request never
    /// completed.
    pub fn from_reqwest(endpoint: impl Into<String>, err: &reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if err.is_decode() {
            return FetchError::Parse {
                endpoint,
                message: err.to_string(),
            };
        }
        FetchError::Network {
            endpoint,
            message: err.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::Network { endpoint, .. }
            | FetchError::Response { endpoint, .. }
            | FetchError::Parse { endpoint, .. } => endpoint,
        }
    }

    /// Short label used in log fields and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "network",
            FetchError::Response { .. } => "response",
            FetchError::Parse { .. } => "parse",
        }
    }
}
