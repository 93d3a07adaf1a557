use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

use heartflow_admin::cli::{Cli, Commands, ConfigAction, FeedbackAction, UsersAction};
use heartflow_admin::commands::{
    Context, FeedbackLsOptions, UsersLsOptions, cmd_config_path, cmd_config_set, cmd_config_show,
    cmd_feedback_ls, cmd_feedback_resolve, cmd_summary, cmd_users_ls,
};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("heartflow_admin=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = match Context::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Feedback { action } => match action {
            FeedbackAction::Ls {
                preset,
                category,
                resolved,
                sort_by,
                order,
                page,
                output,
            } => {
                let options = FeedbackLsOptions {
                    preset,
                    category,
                    resolved,
                    sort_by,
                    order,
                    page,
                };
                cmd_feedback_ls(&ctx, options, output).await
            }
            FeedbackAction::Resolve { image_id, output } => {
                cmd_feedback_resolve(&ctx, &image_id, output).await
            }
        },

        Commands::Users { action } => match action {
            UsersAction::Ls {
                tags,
                all,
                sort_by,
                order,
                output,
            } => {
                let options = UsersLsOptions {
                    tags,
                    all,
                    sort_by,
                    order,
                };
                cmd_users_ls(&ctx, options, output).await
            }
        },

        Commands::Summary { output } => cmd_summary(&ctx, output).await,

        Commands::Config { action } => match action {
            ConfigAction::Show { output } => cmd_config_show(&ctx, output),
            ConfigAction::Set { key, value, output } => {
                cmd_config_set(&mut ctx, &key, &value, output)
            }
            ConfigAction::Path => cmd_config_path(&ctx),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
