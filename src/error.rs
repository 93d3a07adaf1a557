use thiserror::Error;

use crate::api::error::FetchError;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate row key '{0}'")]
    DuplicateRowKey(String),

    #[error("row '{key}' has {actual} cells, expected {expected}")]
    ColumnMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AdminError>;
