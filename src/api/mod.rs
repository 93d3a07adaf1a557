//! Admin API access.
//!
//! The list views only see the [`AdminApi`] trait. [`HttpAdminApi`] is the
//! reqwest-backed implementation used by the CLI; tests plug in fixtures.

pub mod error;
pub mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::filter::QueryPairs;

pub use error::FetchError;
pub use http::HttpAdminApi;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// One feedback group as returned by `getFeedbacks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub image_id: String,
    pub image_type: String,
    pub unresolved_count: u64,
    pub last_feedback_time: String,
    pub upload_time: String,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCount {
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub level: u32,
    pub score: f64,
    pub games_started: u64,
    pub accuracy: f64,
    pub engagement: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionStatus {
    pub resolved_count: u64,
    pub unresolved_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealImageTotals {
    pub total_real: u64,
    pub percentage_detected: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiImageTotals {
    #[serde(rename = "totalAI")]
    pub total_ai: u64,
    pub percentage_detected: f64,
}

/// Remote data source consumed by the list pipeline
pub trait AdminApi: Send + Sync {
    /// `GET /admin/getFeedbacks`
    fn fetch_feedbacks(
        &self,
        query: &QueryPairs,
    ) -> impl Future<Output = FetchResult<Vec<Feedback>>> + Send;

    /// `GET /admin/getFeedbackCount`
    fn fetch_feedback_count(
        &self,
        query: &QueryPairs,
    ) -> impl Future<Output = FetchResult<FeedbackCount>> + Send;

    /// `POST /admin/resolveAllFeedbackByImage/{id}`
    fn resolve_feedback(&self, image_id: &str) -> impl Future<Output = FetchResult<()>> + Send;

    /// `GET /api/images/view/{path}`, returning the raw image bytes
    fn fetch_image(&self, image_path: &str) -> impl Future<Output = FetchResult<Vec<u8>>> + Send;

    /// `GET /admin/filter-users`
    fn filter_users(&self, query: &QueryPairs)
    -> impl Future<Output = FetchResult<Vec<User>>> + Send;

    /// `GET /admin/getFeedbackResolutionStatus`
    fn resolution_status(&self) -> impl Future<Output = FetchResult<Vec<ResolutionStatus>>> + Send;

    /// `GET /admin/getTotalRealImages`
    fn total_real_images(&self) -> impl Future<Output = FetchResult<Vec<RealImageTotals>>> + Send;

    /// `GET /admin/getTotalAIImages`
    fn total_ai_images(&self) -> impl Future<Output = FetchResult<Vec<AiImageTotals>>> + Send;
}
