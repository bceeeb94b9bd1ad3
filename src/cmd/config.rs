use clap::{Args, Subcommand};

use crate::cmd::prompt::{PromptAction, prompt};
use crate::config::{AppConfig, DEFAULT_TIMEOUT_SECS, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration and the effective values.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring soporte.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        "Ticket API URL (e.g., https://api.example.com/tickets)",
        &mut cfg.api_url,
    )?;
    apply_prompt("Request timeout in seconds", &mut cfg.timeout_secs)?;
    apply_prompt(
        "Default source (web/email/phone/chat)",
        &mut cfg.default_source,
    )?;

    cfg.save()?;
    // Surface bad values now rather than on the next submit.
    AppConfig::load()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;
    let effective = AppConfig::load()?;

    println!("Configuration file: {}", path.display());
    println!("Ticket API URL: {}", display_value(&cfg.api_url));
    println!(
        "Timeout: {} (default {DEFAULT_TIMEOUT_SECS}s)",
        display_value(&cfg.timeout_secs)
    );
    println!("Default source: {}", display_value(&cfg.default_source));
    println!();
    println!(
        "Effective API URL: {}",
        display_value(&effective.api_url)
    );
    println!("Effective timeout: {}s", effective.timeout.as_secs());

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>) -> AppResult<()> {
    match prompt(field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}
