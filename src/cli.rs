use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::filter::{
    Category, DEFAULT_FEEDBACK_SORT, DEFAULT_USER_SORT, Preset, ResolvedFilter, SortOrder,
};

#[derive(Parser)]
#[command(name = "heartflow-admin")]
#[command(about = "Admin console for the Heartflow image-detection service")]
#[command(version)]
pub struct Cli {
    /// Config file (default: $HEARTFLOW_ADMIN_CONFIG or the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options shared by commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse and resolve image feedback
    #[command(visible_alias = "fb")]
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },

    /// Browse users by tag
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Show feedback resolution and detection totals
    Summary {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum FeedbackAction {
    /// List one page of feedback
    Ls {
        /// Dashboard shortcut to start from: real, ai, complete, incomplete
        #[arg(long, value_enum)]
        preset: Option<Preset>,

        /// Image type: all, real, ai
        #[arg(short = 't', long = "type")]
        category: Option<Category>,

        /// Resolution state: yes, no, any
        #[arg(short, long)]
        resolved: Option<ResolvedFilter>,

        /// Field to sort by
        #[arg(long, default_value = DEFAULT_FEEDBACK_SORT)]
        sort_by: String,

        /// Sort order: asc, desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,

        /// Page number (clamped to the available pages)
        #[arg(short, long, default_value = "1")]
        page: NonZeroU32,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Mark all feedback on an image as resolved
    Resolve {
        /// Image ID
        image_id: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users carrying the given tags
    Ls {
        /// Tag to filter by (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Require every tag instead of any
        #[arg(long)]
        all: bool,

        /// Field to sort by
        #[arg(long, default_value = DEFAULT_USER_SORT)]
        sort_by: String,

        /// Sort order: asc, desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Set a configuration value (api.base_url, api.timeout)
    Set {
        key: String,
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Print the config file path
    Path,
}
