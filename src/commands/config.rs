//! Configuration commands.
//!
//! - `config show`: Display the effective configuration
//! - `config set`: Set a configuration value
//! - `config path`: Print the config file location

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Context};
use crate::cli::OutputOptions;
use crate::config::BASE_URL_ENV;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(ctx: &Context, output: OutputOptions) -> Result<()> {
    let config = &ctx.config;
    let effective_url = config.base_url_raw();
    let from_env = std::env::var(BASE_URL_ENV).is_ok_and(|v| !v.is_empty());
    let source = if from_env { "env" } else { "file" };

    let json_output = json!({
        "api": {
            "base_url": effective_url,
            "base_url_source": source,
            "timeout": config.api.timeout,
        },
        "config_file": ctx.config_path.to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    text.push_str(&format!("{}:\n", "api".cyan()));
    match effective_url {
        Some(url) if from_env => {
            text.push_str(&format!("  base_url: {url} {}\n", format!("(from {BASE_URL_ENV})").dimmed()));
        }
        Some(url) => text.push_str(&format!("  base_url: {url}\n")),
        None => text.push_str(&format!("  base_url: {}\n", "not configured".dimmed())),
    }
    text.push_str(&format!("  timeout: {}s\n\n", config.api.timeout));
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", ctx.config_path.display()).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Set a configuration value
pub fn cmd_config_set(ctx: &mut Context, key: &str, value: &str, output: OutputOptions) -> Result<()> {
    ctx.config.set(key, value)?;
    ctx.config.save_to(&ctx.config_path)?;

    let stored = ctx.config.get(key)?.unwrap_or_default();
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), stored))
    .print(output)
}

/// Print the config file path
pub fn cmd_config_path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.config_path.display());
    Ok(())
}
