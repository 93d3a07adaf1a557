use owo_colors::OwoColorize;

use super::{Context, print_json};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::summary::{DashboardSummary, ImageTotals, format_percent};

/// Show the dashboard landing numbers
pub async fn cmd_summary(ctx: &Context, output: OutputOptions) -> Result<()> {
    let api = ctx.api()?;
    let summary = DashboardSummary::load(api.as_ref()).await;

    if output.json {
        return print_json(&serde_json::to_value(&summary)?);
    }

    for err in &summary.errors {
        eprintln!("{} {}", "warning:".yellow().bold(), err);
    }

    println!("{}", format_summary(&summary));
    Ok(())
}

fn format_summary(summary: &DashboardSummary) -> String {
    let mut text = String::new();

    text.push_str(&format!("{}\n", "Feedback Status".cyan().bold()));
    text.push_str(&format!(
        "  complete:   {}\n",
        summary.resolution.resolved_count
    ));
    text.push_str(&format!(
        "  incomplete: {}\n",
        summary.resolution.unresolved_count
    ));
    text.push_str(&format!("  total:      {}\n\n", summary.total_feedback()));

    push_totals(&mut text, "Real Images", &summary.real_images);
    text.push('\n');
    push_totals(&mut text, "AI Images", &summary.ai_images);

    text.trim_end().to_string()
}

fn push_totals(text: &mut String, title: &str, totals: &ImageTotals) {
    text.push_str(&format!("{}\n", title.cyan().bold()));
    text.push_str(&format!("  Total images: {}\n", totals.total));
    text.push_str(&format!(
        "  Percentage detected: {}\n",
        format_percent(totals.percentage_detected)
    ));
}
