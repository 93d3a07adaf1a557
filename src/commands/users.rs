use owo_colors::OwoColorize;
use serde_json::json;

use super::{Context, print_json};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::filter::{SortOrder, UserFilters};
use crate::users::{load_users, render};

/// Options for `users ls`
#[derive(Debug, Clone)]
pub struct UsersLsOptions {
    pub tags: Vec<String>,
    pub all: bool,
    pub sort_by: String,
    pub order: SortOrder,
}

impl UsersLsOptions {
    pub fn filters(&self) -> UserFilters {
        let mut filters = UserFilters::default().with_tags(self.tags.iter().cloned());
        filters.match_all = self.all;
        filters.sort_field = self.sort_by.clone();
        filters.sort_order = self.order;
        filters
    }
}

/// List users matching the selected tags
pub async fn cmd_users_ls(ctx: &Context, options: UsersLsOptions, output: OutputOptions) -> Result<()> {
    let filters = options.filters();
    let api = ctx.api()?;
    let load = load_users(api.as_ref(), &filters).await;

    if output.json {
        let error = load.error.as_ref().map(|e| {
            json!({
                "kind": e.kind(),
                "message": e.to_string(),
            })
        });
        return print_json(&json!({
            "filters": filters,
            "users": load.users,
            "error": error,
        }));
    }

    if let Some(err) = &load.error {
        eprintln!("{} {}", "warning:".yellow().bold(), err);
    }

    if filters.tags.is_empty() {
        println!("No tags selected. Pass --tag to choose users.");
        return Ok(());
    }

    if load.users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{}", render(&load.users)?);
    println!("{}", format!("{} user(s)", load.users.len()).dimmed());
    Ok(())
}
