//! View state for the feedback list.
//!
//! Every filter change bumps the view's generation. A load is tagged with the
//! generation it was issued under and is applied only if that generation is
//! still current; stale loads are dropped, which releases their image handles.

use jiff::Timestamp;
use jiff::tz::TimeZone;
use tokio::sync::watch;
use tracing::debug;

use crate::api::{AdminApi, FetchError};
use crate::error::Result;
use crate::filter::FeedbackFilters;
use crate::list_view::{Align, ColumnDescriptor, ListView, RenderedTable};
use crate::pagination::{PageInfo, Pagination};

use super::{FeedbackLoader, FeedbackRow, PageLoad, RowImage};

/// Snapshot of the filters a load was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub filters: FeedbackFilters,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct FeedbackView {
    filters: FeedbackFilters,
    rows: Vec<FeedbackRow>,
    pagination: Pagination,
    generation: u64,
    last_error: Option<FetchError>,
}

impl FeedbackView {
    pub fn new(filters: FeedbackFilters) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn filters(&self) -> &FeedbackFilters {
        &self.filters
    }

    pub fn rows(&self) -> &[FeedbackRow] {
        &self.rows
    }

    pub fn row(&self, image_id: &str) -> Option<&FeedbackRow> {
        self.rows.iter().find(|r| r.feedback.image_id == image_id)
    }

    pub fn page_info(&self) -> PageInfo {
        self.pagination.info()
    }

    /// Diagnostic from the most recently applied load
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the filters, superseding any load in flight.
    pub fn set_filters(&mut self, filters: FeedbackFilters) {
        if filters != self.filters {
            self.filters = filters;
            self.generation += 1;
        }
    }

    /// Change the filters in place. Changing anything but the page returns to
    /// page 1.
    pub fn update_filters(&mut self, change: impl FnOnce(&mut FeedbackFilters)) {
        let mut next = self.filters.clone();
        change(&mut next);
        if next.page == self.filters.page && next != self.filters {
            next.page = std::num::NonZeroU32::MIN;
        }
        self.set_filters(next);
    }

    /// Move to page `n`, clamped to the known page range.
    pub fn go_to_page(&mut self, n: u32) {
        let page = self.pagination.go_to(n);
        self.update_filters(|f| f.page = page);
    }

    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
            filters: self.filters.clone(),
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a finished load. Returns `false` and drops the load if the
    /// filters changed after `ticket` was issued.
    pub fn apply(&mut self, ticket: LoadTicket, load: PageLoad) -> bool {
        if !self.is_current(&ticket) {
            debug!(
                issued = ticket.generation,
                current = self.generation,
                "discarding stale feedback load"
            );
            return false;
        }

        // Replacing the rows drops the previous page's image handles.
        self.rows = load.rows;
        self.pagination.set_total_pages(load.page_info.total_pages);
        // The loader may have clamped the page; the filters follow what is shown.
        self.filters.page = self.pagination.go_to(load.page_info.current_page);
        self.last_error = load.error;
        true
    }

    /// Optimistically mark a row resolved. Other rows are untouched.
    pub fn apply_resolved(&mut self, image_id: &str) -> bool {
        match self
            .rows
            .iter_mut()
            .find(|r| r.feedback.image_id == image_id)
        {
            Some(row) => {
                row.feedback.unresolved_count = 0;
                true
            }
            None => false,
        }
    }

    /// Resolve a row through the API and update it locally on success.
    ///
    /// On failure the view is left unchanged and the error is returned for
    /// display.
    pub async fn resolve<A: AdminApi>(&mut self, api: &A, image_id: &str) -> Result<()> {
        super::resolve_feedback(api, image_id).await?;
        self.apply_resolved(image_id);
        Ok(())
    }

    /// Load the current filters and apply the result.
    pub async fn refresh<A: AdminApi>(&mut self, loader: &FeedbackLoader<A>) -> bool {
        let ticket = self.begin_load();
        let load = loader.load(&ticket.filters, ticket.filters.page).await;
        self.apply(ticket, load)
    }

    /// Re-load whenever `filters` publishes a new value, until the sender is
    /// dropped. A new value cancels the load in flight.
    pub async fn drive<A: AdminApi>(
        &mut self,
        loader: &FeedbackLoader<A>,
        mut filters: watch::Receiver<FeedbackFilters>,
    ) {
        let initial = filters.borrow_and_update().clone();
        self.set_filters(initial);

        loop {
            let ticket = self.begin_load();
            let snapshot = ticket.filters.clone();

            let finished = tokio::select! {
                load = loader.load(&snapshot, snapshot.page) => Ok(load),
                changed = filters.changed() => Err(changed),
            };

            let next = match finished {
                Ok(load) => {
                    self.apply(ticket, load);
                    filters.changed().await
                }
                Err(changed) => changed,
            };

            if next.is_err() {
                return;
            }
            let latest = filters.borrow_and_update().clone();
            self.set_filters(latest);
        }
    }

    pub fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("Image"),
            ColumnDescriptor::new("Image ID"),
            ColumnDescriptor::new("Image Type"),
            ColumnDescriptor::new("Unresolved Feedback").aligned(Align::Right),
            ColumnDescriptor::new("Last Feedback Time"),
            ColumnDescriptor::new("Upload Time"),
        ]
    }

    pub fn render(&self) -> Result<RenderedTable> {
        ListView::render(&Self::columns(), &self.rows, FeedbackRow::key, |row| {
            vec![
                image_cell(&row.image),
                row.feedback.image_id.clone(),
                row.feedback.image_type.clone(),
                row.feedback.unresolved_count.to_string(),
                format_timestamp(&row.feedback.last_feedback_time),
                format_timestamp(&row.feedback.upload_time),
            ]
        })
    }
}

fn image_cell(image: &RowImage) -> String {
    match image {
        RowImage::Ready(handle) => format!("{} ({})", handle.url(), format_bytes(handle.len())),
        RowImage::Placeholder => "(image unavailable)".to_string(),
        RowImage::Missing => "-".to_string(),
    }
}

/// Format an ISO 8601 timestamp in the local time zone, falling back to the raw
/// value when it does not parse.
pub fn format_timestamp(raw: &str) -> String {
    match raw.parse::<Timestamp>() {
        Ok(ts) => ts
            .to_zoned(TimeZone::system())
            .strftime("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

fn format_bytes(len: usize) -> String {
    if len < 1024 {
        format!("{len} B")
    } else if len < 1024 * 1024 {
        format!("{:.1} KiB", len as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", len as f64 / (1024.0 * 1024.0))
    }
}
