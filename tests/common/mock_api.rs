//! In-memory admin API used by the pipeline tests.
//!
//! Serves a fixed data set, applies the same filtering/sorting/pagination the
//! real service does, records every request, and can be told to fail specific
//! calls or to hold a category's row response until released.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::Notify;

use heartflow_admin::api::{
    AdminApi, AiImageTotals, Feedback, FeedbackCount, FetchError, FetchResult, RealImageTotals,
    ResolutionStatus, User,
};
use heartflow_admin::filter::{Category, QueryPairs};

/// A recorded request
#[derive(Debug, Clone)]
pub struct Request {
    pub endpoint: &'static str,
    pub query: QueryPairs,
}

/// Holds `getFeedbacks` responses for one category until released
#[derive(Clone)]
pub struct Gate {
    pub category: Category,
    /// Notified when a gated request has arrived
    pub started: Arc<Notify>,
    /// Notify to let the gated request finish
    pub release: Arc<Notify>,
}

#[derive(Default)]
pub struct FixtureApi {
    feedbacks: Vec<Feedback>,
    users: Vec<(User, Vec<String>)>,
    failing_images: HashSet<String>,
    list_failure: Option<FetchError>,
    count_failure: Option<FetchError>,
    resolve_failure: Option<FetchError>,
    users_failure: Option<FetchError>,
    summary_failure: Option<FetchError>,
    gate: Option<Gate>,
    requests: Mutex<Vec<Request>>,
    resolved: Mutex<Vec<String>>,
}

pub fn feedback(id: &str, image_type: &str, unresolved: u64, day: u32) -> Feedback {
    Feedback {
        image_id: id.to_string(),
        image_type: image_type.to_string(),
        unresolved_count: unresolved,
        last_feedback_time: format!("2024-03-{:02}T10:00:00Z", day % 28 + 1),
        upload_time: format!("2024-01-{:02}T08:30:00Z", day % 28 + 1),
        image_path: Some(format!("images/{id}.png")),
    }
}

pub fn user(name: &str, level: u32, tags: &[&str]) -> (User, Vec<String>) {
    (
        User {
            username: name.to_string(),
            level,
            score: f64::from(level) * 100.0,
            games_started: u64::from(level) * 3,
            accuracy: 0.75,
            engagement: 4.0,
        },
        tags.iter().map(|t| t.to_string()).collect(),
    )
}

impl FixtureApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// `ai_unresolved` AI images with open feedback, `ai_resolved` AI images
    /// without, and `real` real images with open feedback.
    pub fn with_feedback(ai_unresolved: usize, ai_resolved: usize, real: usize) -> Self {
        let mut feedbacks = Vec::new();
        for i in 0..ai_unresolved {
            feedbacks.push(feedback(&format!("ai-open-{i:03}"), "ai", (i % 4 + 1) as u64, i as u32));
        }
        for i in 0..ai_resolved {
            feedbacks.push(feedback(&format!("ai-done-{i:03}"), "ai", 0, i as u32));
        }
        for i in 0..real {
            feedbacks.push(feedback(&format!("real-{i:03}"), "real", 2, i as u32));
        }
        Self {
            feedbacks,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: Vec<(User, Vec<String>)>) -> Self {
        self.users = users;
        self
    }

    pub fn failing_image(mut self, image_id: &str) -> Self {
        self.failing_images.insert(format!("images/{image_id}.png"));
        self
    }

    pub fn failing_list(mut self, error: FetchError) -> Self {
        self.list_failure = Some(error);
        self
    }

    pub fn failing_count(mut self, error: FetchError) -> Self {
        self.count_failure = Some(error);
        self
    }

    pub fn failing_resolve(mut self, error: FetchError) -> Self {
        self.resolve_failure = Some(error);
        self
    }

    pub fn failing_users(mut self, error: FetchError) -> Self {
        self.users_failure = Some(error);
        self
    }

    pub fn failing_summary(mut self, error: FetchError) -> Self {
        self.summary_failure = Some(error);
        self
    }

    pub fn gated(mut self, category: Category) -> (Self, Gate) {
        let gate = Gate {
            category,
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().clone()
    }

    fn record(&self, endpoint: &'static str, query: &QueryPairs) {
        self.requests.lock().push(Request {
            endpoint,
            query: query.clone(),
        });
    }

    fn matching(&self, query: &QueryPairs) -> Vec<Feedback> {
        let category = param(query, "image_type").unwrap_or("all");
        let resolved = param(query, "resolved");

        self.feedbacks
            .iter()
            .filter(|f| category == "all" || f.image_type == category)
            .filter(|f| match resolved {
                Some("true") => f.unresolved_count == 0,
                Some("false") => f.unresolved_count > 0,
                _ => true,
            })
            .cloned()
            .collect()
    }
}

pub fn param<'a>(query: &'a QueryPairs, key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

impl AdminApi for FixtureApi {
    async fn fetch_feedbacks(&self, query: &QueryPairs) -> FetchResult<Vec<Feedback>> {
        self.record("getFeedbacks", query);

        if let Some(gate) = &self.gate
            && param(query, "image_type") == Some(gate.category.as_str())
        {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        if let Some(err) = &self.list_failure {
            return Err(err.clone());
        }

        let mut rows = self.matching(query);
        match param(query, "sort_by") {
            Some("unresolved_count") => rows.sort_by_key(|f| f.unresolved_count),
            Some("upload_time") => rows.sort_by(|a, b| a.upload_time.cmp(&b.upload_time)),
            _ => rows.sort_by(|a, b| a.last_feedback_time.cmp(&b.last_feedback_time)),
        }
        if param(query, "sort_order") == Some("desc") {
            rows.reverse();
        }

        let page: usize = param(query, "page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let limit: usize = param(query, "limit").and_then(|l| l.parse().ok()).unwrap_or(20);
        Ok(rows
            .into_iter()
            .skip((page.max(1) - 1) * limit)
            .take(limit)
            .collect())
    }

    async fn fetch_feedback_count(&self, query: &QueryPairs) -> FetchResult<FeedbackCount> {
        self.record("getFeedbackCount", query);
        if let Some(err) = &self.count_failure {
            return Err(err.clone());
        }
        Ok(FeedbackCount {
            total_count: self.matching(query).len() as u64,
        })
    }

    async fn resolve_feedback(&self, image_id: &str) -> FetchResult<()> {
        self.record("resolveAllFeedbackByImage", &vec![("id", image_id.to_string())]);
        if let Some(err) = &self.resolve_failure {
            return Err(err.clone());
        }
        self.resolved.lock().push(image_id.to_string());
        Ok(())
    }

    async fn fetch_image(&self, image_path: &str) -> FetchResult<Vec<u8>> {
        self.record("images/view", &vec![("path", image_path.to_string())]);
        if self.failing_images.contains(image_path) {
            return Err(FetchError::response("api/images/view", StatusCode::NOT_FOUND));
        }
        Ok(image_path.as_bytes().to_vec())
    }

    async fn filter_users(&self, query: &QueryPairs) -> FetchResult<Vec<User>> {
        self.record("filter-users", query);
        if let Some(err) = &self.users_failure {
            return Err(err.clone());
        }

        let tags: Vec<&str> = query
            .iter()
            .filter(|(k, _)| *k == "tags")
            .map(|(_, v)| v.as_str())
            .collect();
        let match_all = param(query, "all") == Some("true");

        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|(_, user_tags)| {
                let has = |t: &&str| user_tags.iter().any(|u| u == t);
                if match_all {
                    tags.iter().all(has)
                } else {
                    tags.iter().any(has)
                }
            })
            .map(|(u, _)| u.clone())
            .collect();

        users.sort_by_key(|u| u.level);
        if param(query, "desc") == Some("true") {
            users.reverse();
        }
        Ok(users)
    }

    async fn resolution_status(&self) -> FetchResult<Vec<ResolutionStatus>> {
        self.record("getFeedbackResolutionStatus", &QueryPairs::new());
        if let Some(err) = &self.summary_failure {
            return Err(err.clone());
        }
        let resolved = self.feedbacks.iter().filter(|f| f.unresolved_count == 0).count() as u64;
        Ok(vec![ResolutionStatus {
            resolved_count: resolved,
            unresolved_count: self.feedbacks.len() as u64 - resolved,
        }])
    }

    async fn total_real_images(&self) -> FetchResult<Vec<RealImageTotals>> {
        self.record("getTotalRealImages", &QueryPairs::new());
        Ok(vec![RealImageTotals {
            total_real: self.feedbacks.iter().filter(|f| f.image_type == "real").count() as u64,
            percentage_detected: 0.625,
        }])
    }

    async fn total_ai_images(&self) -> FetchResult<Vec<AiImageTotals>> {
        self.record("getTotalAIImages", &QueryPairs::new());
        Ok(vec![AiImageTotals {
            total_ai: self.feedbacks.iter().filter(|f| f.image_type == "ai").count() as u64,
            percentage_detected: 0.375,
        }])
    }
}
