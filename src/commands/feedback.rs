use std::num::NonZeroU32;

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Context, print_json};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::feedback::{FeedbackLoader, FeedbackRowSummary, FeedbackView, resolve_feedback};
use crate::filter::{Category, FeedbackFilters, Preset, ResolvedFilter, SortOrder};
use crate::images::ImageStore;

/// Options for `feedback ls`
#[derive(Debug, Clone)]
pub struct FeedbackLsOptions {
    pub preset: Option<Preset>,
    pub category: Option<Category>,
    pub resolved: Option<ResolvedFilter>,
    pub sort_by: String,
    pub order: SortOrder,
    pub page: NonZeroU32,
}

impl FeedbackLsOptions {
    /// Start from the preset (if any), then apply explicit flags on top.
    pub fn filters(&self) -> FeedbackFilters {
        let mut filters = self
            .preset
            .map(FeedbackFilters::from_preset)
            .unwrap_or_default();
        if let Some(category) = self.category {
            filters.category = category;
        }
        if let Some(resolved) = self.resolved {
            filters.resolved = resolved;
        }
        filters.sort_field = self.sort_by.clone();
        filters.sort_order = self.order;
        filters.with_page(self.page)
    }
}

/// List one page of feedback
pub async fn cmd_feedback_ls(
    ctx: &Context,
    options: FeedbackLsOptions,
    output: OutputOptions,
) -> Result<()> {
    let loader = FeedbackLoader::new(ctx.api()?, ImageStore::new());
    let mut view = FeedbackView::new(options.filters());
    view.refresh(&loader).await;

    let page = view.page_info();

    if output.json {
        let rows: Vec<FeedbackRowSummary> = view.rows().iter().map(Into::into).collect();
        let error = view.last_error().map(|e| {
            json!({
                "kind": e.kind(),
                "message": e.to_string(),
            })
        });
        return print_json(&json!({
            "filters": view.filters(),
            "page": page,
            "rows": rows,
            "error": error,
        }));
    }

    if let Some(err) = view.last_error() {
        eprintln!("{} {}", "warning:".yellow().bold(), err);
    }

    if view.rows().is_empty() {
        println!("No feedback found.");
    } else {
        println!("{}", view.render()?);
    }

    let placeholders = view
        .rows()
        .iter()
        .filter(|r| r.image.is_placeholder())
        .count();
    let mut footer = format!(
        "Page {} of {} · {} row(s)",
        page.current_page,
        page.total_pages,
        view.rows().len()
    );
    if placeholders > 0 {
        footer.push_str(&format!(" · {placeholders} image(s) unavailable"));
    }
    println!("{}", footer.dimmed());

    Ok(())
}

/// Mark all feedback on an image as resolved
pub async fn cmd_feedback_resolve(
    ctx: &Context,
    image_id: &str,
    output: OutputOptions,
) -> Result<()> {
    let api = ctx.api()?;
    resolve_feedback(api.as_ref(), image_id).await?;

    CommandOutput::new(json!({
        "action": "resolve",
        "image_id": image_id,
        "success": true,
    }))
    .with_text(format!(
        "{} all feedback on {}",
        "Resolved".green(),
        image_id.cyan()
    ))
    .print(output)
}
