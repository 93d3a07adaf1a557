//! Dashboard landing numbers: feedback resolution and detection rates.

use serde::Serialize;
use tracing::warn;

use crate::api::{AdminApi, FetchError, FetchResult, ResolutionStatus};

/// Image count and detection rate for one image population
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImageTotals {
    pub total: u64,
    /// Fraction of images players classified correctly, `0.0..=1.0`
    pub percentage_detected: f64,
}

impl ImageTotals {
    pub fn detected_percent(&self) -> f64 {
        self.percentage_detected * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub resolution: ResolutionStatus,
    pub real_images: ImageTotals,
    pub ai_images: ImageTotals,
    /// Parts that could not be loaded and show zeroes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl DashboardSummary {
    /// Fetch all three summary endpoints concurrently. A failing part falls
    /// back to zeroes.
    pub async fn load<A: AdminApi>(api: &A) -> Self {
        let (resolution, real, ai) = tokio::join!(
            api.resolution_status(),
            api.total_real_images(),
            api.total_ai_images(),
        );

        let mut errors = Vec::new();
        let resolution = first_or_default(resolution, "resolution status", &mut errors);
        let real_images = first_or_default(real, "real image totals", &mut errors)
            .map(|r| ImageTotals {
                total: r.total_real,
                percentage_detected: r.percentage_detected,
            });
        let ai_images = first_or_default(ai, "AI image totals", &mut errors).map(|a| ImageTotals {
            total: a.total_ai,
            percentage_detected: a.percentage_detected,
        });

        Self {
            resolution: resolution.unwrap_or_default(),
            real_images: real_images.unwrap_or_default(),
            ai_images: ai_images.unwrap_or_default(),
            errors,
        }
    }

    pub fn total_feedback(&self) -> u64 {
        self.resolution
            .resolved_count
            .saturating_add(self.resolution.unresolved_count)
    }
}

/// The summary endpoints wrap their record in a one-element array.
fn first_or_default<T>(
    result: FetchResult<Vec<T>>,
    what: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(records) => {
            let first = records.into_iter().next();
            if first.is_none() {
                warn!("{what} response was empty");
                errors.push(format!("{what}: empty response"));
            }
            first
        }
        Err(e) => {
            report(what, &e);
            errors.push(format!("{what}: {e}"));
            None
        }
    }
}

fn report(what: &str, error: &FetchError) {
    warn!(kind = error.kind(), error = %error, "failed to load {what}");
}

/// Format a `0.0..=1.0` fraction as a percentage with two decimals.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
