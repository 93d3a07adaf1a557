//! Feedback list pipeline: fetch, normalise, and hold one page of feedback.

pub mod view;

use std::num::NonZeroU32;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{AdminApi, Feedback, FetchError};
use crate::error::Result;
use crate::filter::FeedbackFilters;
use crate::images::{ImageHandle, ImageStore};
use crate::pagination::{PAGE_SIZE, PageInfo, Pagination};

pub use view::{FeedbackView, LoadTicket};

/// Image state of a row after its secondary fetch
#[derive(Debug)]
pub enum RowImage {
    Ready(ImageHandle),
    /// The image fetch failed; the row is shown without it
    Placeholder,
    /// The record carries no image reference
    Missing,
}

impl RowImage {
    pub fn is_ready(&self) -> bool {
        matches!(self, RowImage::Ready(_))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RowImage::Placeholder)
    }

    pub fn handle(&self) -> Option<&ImageHandle> {
        match self {
            RowImage::Ready(handle) => Some(handle),
            _ => None,
        }
    }
}

/// A display-ready feedback record
#[derive(Debug)]
pub struct FeedbackRow {
    pub feedback: Feedback,
    pub image: RowImage,
}

impl FeedbackRow {
    pub fn key(&self) -> String {
        self.feedback.image_id.clone()
    }
}

/// Result of one page load.
///
/// Loads never fail outright: on error `rows` is empty and `error` carries the
/// diagnostic.
#[derive(Debug)]
pub struct PageLoad {
    pub rows: Vec<FeedbackRow>,
    pub page_info: PageInfo,
    pub error: Option<FetchError>,
}

impl PageLoad {
    fn failed(page_info: PageInfo, error: FetchError) -> Self {
        Self {
            rows: Vec::new(),
            page_info,
            error: Some(error),
        }
    }

    /// Rows whose image fetch fell back to a placeholder
    pub fn placeholder_count(&self) -> usize {
        self.rows.iter().filter(|r| r.image.is_placeholder()).count()
    }
}

/// Serialisable view of a row, used for `--json` output
#[derive(Debug, Serialize)]
pub struct FeedbackRowSummary<'a> {
    #[serde(flatten)]
    pub feedback: &'a Feedback,
    pub image: ImageSummary,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ImageSummary {
    Ready { handle: String, bytes: usize },
    Placeholder,
    Missing,
}

impl<'a> From<&'a FeedbackRow> for FeedbackRowSummary<'a> {
    fn from(row: &'a FeedbackRow) -> Self {
        let image = match &row.image {
            RowImage::Ready(handle) => ImageSummary::Ready {
                handle: handle.url(),
                bytes: handle.len(),
            },
            RowImage::Placeholder => ImageSummary::Placeholder,
            RowImage::Missing => ImageSummary::Missing,
        };
        Self {
            feedback: &row.feedback,
            image,
        }
    }
}

/// Builds queries from filters and turns API responses into [`PageLoad`]s
pub struct FeedbackLoader<A> {
    api: Arc<A>,
    images: ImageStore,
}

impl<A: AdminApi> FeedbackLoader<A> {
    pub fn new(api: Arc<A>, images: ImageStore) -> Self {
        Self { api, images }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Load one page of feedback for `filters`.
    ///
    /// The row and count requests share the same filter parameters and run
    /// concurrently. If the count shows `page` is past the last page, the rows
    /// are fetched again for the last page so the rows always match the
    /// returned [`PageInfo`]. Each row's image is then fetched concurrently; a
    /// failed image leaves that row with [`RowImage::Placeholder`].
    pub async fn load(&self, filters: &FeedbackFilters, page: NonZeroU32) -> PageLoad {
        let list_query = filters.list_query(page, PAGE_SIZE);
        let count_query = filters.count_query();

        let (rows, count) = tokio::join!(
            self.api.fetch_feedbacks(&list_query),
            self.api.fetch_feedback_count(&count_query),
        );

        let (page_info, error) = match count {
            Ok(count) => {
                let mut pagination = Pagination::from_total_count(count.total_count);
                pagination.go_to(page.get());
                (pagination.info(), None)
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "failed to load feedback count");
                let info = PageInfo {
                    current_page: page.get(),
                    total_pages: page.get(),
                };
                (info, Some(e))
            }
        };

        let rows = match NonZeroU32::new(page_info.current_page) {
            Some(clamped) if clamped != page => {
                debug!(
                    requested = page.get(),
                    clamped = clamped.get(),
                    "page out of range, loading last page"
                );
                self.api
                    .fetch_feedbacks(&filters.list_query(clamped, PAGE_SIZE))
                    .await
            }
            _ => rows,
        };

        let mut feedbacks = match rows {
            Ok(feedbacks) => feedbacks,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "failed to load feedback page");
                return PageLoad::failed(page_info, e);
            }
        };
        feedbacks.truncate(PAGE_SIZE as usize);

        let rows = join_all(feedbacks.into_iter().map(|f| self.attach_image(f))).await;
        debug!(
            rows = rows.len(),
            page = page_info.current_page,
            total_pages = page_info.total_pages,
            "feedback page loaded"
        );

        PageLoad {
            rows,
            page_info,
            error,
        }
    }

    async fn attach_image(&self, feedback: Feedback) -> FeedbackRow {
        let image = match feedback.image_path.as_deref().filter(|p| !p.is_empty()) {
            None => RowImage::Missing,
            Some(path) => match self.api.fetch_image(path).await {
                Ok(bytes) => RowImage::Ready(self.images.insert(bytes)),
                Err(e) => {
                    warn!(
                        image_id = %feedback.image_id,
                        error = %e,
                        "image fetch failed, showing placeholder"
                    );
                    RowImage::Placeholder
                }
            },
        };
        FeedbackRow { feedback, image }
    }
}

/// Mark every feedback entry of an image as resolved.
pub async fn resolve_feedback<A: AdminApi>(api: &A, image_id: &str) -> Result<()> {
    api.resolve_feedback(image_id).await.map_err(|e| {
        warn!(image_id, error = %e, "failed to resolve feedback");
        e.into()
    })
}
