mod cmd;
mod config;
mod context;
mod domain;
mod draft_store;
mod error;
mod infra;
mod observability;
mod services;
mod ui;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::submit::{self, SubmitArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::files::FsAttachmentSource;
use crate::infra::http::HttpTicketClient;

#[derive(Parser)]
#[command(name = "soporte", author, version, about = "Support ticket intake client")]
struct Cli {
    /// Log state transitions and requests to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in a support ticket and send it to the ticket service.
    Submit(SubmitArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    observability::init_logging(cli.verbose);

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(())
        }
        Commands::Submit(args) => run_submit(args).await,
    }
}

async fn run_submit(args: SubmitArgs) -> AppResult<()> {
    let config = AppConfig::load()?;

    if config.api_url.is_none() {
        tracing::warn!("ticket API URL not configured; run `soporte config init` or set SOPORTE_API_URL");
    }

    let ticket_api = Arc::new(HttpTicketClient::new(
        config.api_url.clone(),
        config.timeout,
    )?);
    let context = AppContext::new(config, ticket_api, Arc::new(FsAttachmentSource));

    let summary = submit::run(&context, args).await?;
    tracing::debug!(ticket = %summary.id, "submission finished");

    Ok(())
}
