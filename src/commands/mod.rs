mod config;
mod feedback;
mod summary;
mod users;

pub use config::{cmd_config_path, cmd_config_set, cmd_config_show};
pub use feedback::{FeedbackLsOptions, cmd_feedback_ls, cmd_feedback_resolve};
pub use summary::cmd_summary;
pub use users::{UsersLsOptions, cmd_users_ls};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::api::HttpAdminApi;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;

/// Command output with a JSON form and an optional human-readable form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => println!("{text}"),
            _ => print_json(&self.json)?,
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolved config file path plus its loaded contents
pub struct Context {
    pub config_path: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = Config::resolve_path(explicit)?;
        let config = Config::load_from(&config_path)?;
        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn api(&self) -> Result<Arc<HttpAdminApi>> {
        HttpAdminApi::from_config(&self.config).map(Arc::new)
    }
}
