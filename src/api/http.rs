//! reqwest implementation of [`AdminApi`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{AdminError, Result};
use crate::filter::QueryPairs;

use super::{
    AdminApi, AiImageTotals, Feedback, FeedbackCount, FetchError, FetchResult, RealImageTotals,
    ResolutionStatus, User,
};

const FEEDBACKS: &str = "admin/getFeedbacks";
const FEEDBACK_COUNT: &str = "admin/getFeedbackCount";
const RESOLVE_FEEDBACK: &str = "admin/resolveAllFeedbackByImage";
const IMAGE_VIEW: &str = "api/images/view";
const FILTER_USERS: &str = "admin/filter-users";
const RESOLUTION_STATUS: &str = "admin/getFeedbackResolutionStatus";
const TOTAL_REAL: &str = "admin/getTotalRealImages";
const TOTAL_AI: &str = "admin/getTotalAIImages";

/// Admin API client over HTTP
#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    client: Client,
    base: Url,
}

impl HttpAdminApi {
    /// Build a client from configuration.
    ///
    /// Uses the configured request timeout and a 10s connect timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base = config.api_base_url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AdminError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join drops the last segment of a base without a trailing slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> FetchResult<Url> {
        self.base
            .join(path)
            .map_err(|e| FetchError::network(path, format!("invalid endpoint URL: {e}")))
    }

    /// Endpoint URL with `segment` appended as one percent-encoded path segment.
    fn endpoint_with_segment(&self, path: &str, segment: &str) -> FetchResult<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| FetchError::network(path, "base URL cannot carry path segments"))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> FetchResult<Vec<u8>> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(endpoint, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::response(endpoint, status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(endpoint, e.to_string()))?;
        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &QueryPairs) -> FetchResult<T> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        debug!(%url, "GET");

        let body = self.send(path, self.client.get(url)).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::parse(path, e.to_string()))
    }
}

impl AdminApi for HttpAdminApi {
    async fn fetch_feedbacks(&self, query: &QueryPairs) -> FetchResult<Vec<Feedback>> {
        self.get_json(FEEDBACKS, query).await
    }

    async fn fetch_feedback_count(&self, query: &QueryPairs) -> FetchResult<FeedbackCount> {
        self.get_json(FEEDBACK_COUNT, query).await
    }

    async fn resolve_feedback(&self, image_id: &str) -> FetchResult<()> {
        let url = self.endpoint_with_segment(RESOLVE_FEEDBACK, image_id)?;
        debug!(%url, "POST");
        self.send(RESOLVE_FEEDBACK, self.client.post(url)).await?;
        Ok(())
    }

    async fn fetch_image(&self, image_path: &str) -> FetchResult<Vec<u8>> {
        let url = self.endpoint_with_segment(IMAGE_VIEW, image_path)?;
        debug!(%url, "GET image");
        self.send(IMAGE_VIEW, self.client.get(url)).await
    }

    async fn filter_users(&self, query: &QueryPairs) -> FetchResult<Vec<User>> {
        self.get_json(FILTER_USERS, query).await
    }

    async fn resolution_status(&self) -> FetchResult<Vec<ResolutionStatus>> {
        self.get_json(RESOLUTION_STATUS, &QueryPairs::new()).await
    }

    async fn total_real_images(&self) -> FetchResult<Vec<RealImageTotals>> {
        self.get_json(TOTAL_REAL, &QueryPairs::new()).await
    }

    async fn total_ai_images(&self) -> FetchResult<Vec<AiImageTotals>> {
        self.get_json(TOTAL_AI, &QueryPairs::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn api(base: &str) -> HttpAdminApi {
        HttpAdminApi::with_client(Client::new(), Url::parse(base).unwrap())
    }

    /// Answer one request with the raw HTTP `response`, returning the server's
    /// base URL.
    async fn serve_once(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    fn local_api(base: Url) -> HttpAdminApi {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpAdminApi::with_client(client, base)
    }

    #[tokio::test]
    async fn test_error_status_is_response_error() {
        let base = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = local_api(base)
            .fetch_feedback_count(&vec![("image_type", "all".to_string())])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "response");
        assert_eq!(err.endpoint(), FEEDBACK_COUNT);
        assert!(matches!(
            err,
            FetchError::Response { status, .. } if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 9\r\nConnection: close\r\n\r\n{not json",
        )
        .await;

        let err = local_api(base)
            .fetch_feedbacks(&QueryPairs::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "parse");
        assert_eq!(err.endpoint(), FEEDBACKS);
    }

    #[tokio::test]
    async fn test_success_body_is_decoded() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 18\r\nConnection: close\r\n\r\n{\"total_count\":45}",
        )
        .await;

        let count = local_api(base)
            .fetch_feedback_count(&QueryPairs::new())
            .await
            .unwrap();

        assert_eq!(count.total_count, 45);
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = local_api(Url::parse(&format!("http://{addr}/")).unwrap())
            .resolve_feedback("img-1")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "network");
    }

    #[test]
    fn test_base_without_trailing_slash_keeps_prefix() {
        let api = api("https://detect.example.com/backend");
        let url = api.endpoint(FEEDBACKS).unwrap();
        assert_eq!(
            url.as_str(),
            "https://detect.example.com/backend/admin/getFeedbacks"
        );
    }

    #[test]
    fn test_image_path_is_single_encoded_segment() {
        let api = api("https://detect.example.com/");
        let url = api
            .endpoint_with_segment(IMAGE_VIEW, "uploads/2024/cat photo.png")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://detect.example.com/api/images/view/uploads%2F2024%2Fcat%20photo.png"
        );
    }

    #[test]
    fn test_resolve_url() {
        let api = api("http://localhost:8080");
        let url = api.endpoint_with_segment(RESOLVE_FEEDBACK, "img-42").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/admin/resolveAllFeedbackByImage/img-42"
        );
    }
}
