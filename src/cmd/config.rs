use clap::{Args, Subcommand};
use dialoguer::Input;

use crate::config::{AppConfig, DEFAULT_API_URL, StoredConfig, config_file_path, resolve_api_url};
use crate::error::AppResult;
use crate::infra::terminal::prompt_error;
use crate::session_store::SessionStore;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Interactively set the backend URL and default username.
    Init,
    /// Show the effective configuration and where it is stored.
    Show,
}

pub fn run(command: ConfigCommand, config: &AppConfig) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(config),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring helpdesk CLI.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        &format!("Backend URL (default {DEFAULT_API_URL})"),
        &mut cfg.api_base_url,
    )?;
    if let Some(url) = cfg.api_base_url.take() {
        cfg.api_base_url = Some(resolve_api_url(Some(url), None, None)?);
    }
    apply_prompt("Default username", &mut cfg.default_username)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show(config: &AppConfig) -> AppResult<()> {
    let stored = StoredConfig::load_from(&config.config_dir)?;
    let store = SessionStore::load(&config.config_dir, &config.api_base_url)?;

    println!("Configuration file: {}", config_file_path()?.display());
    println!("Backend URL: {}", config.api_base_url);
    println!("Stored backend URL: {}", display_value(&stored.api_base_url));
    println!(
        "Default username: {}",
        display_value(&config.default_username)
    );
    println!("Session file: {}", store.path().display());
    println!(
        "Session cookie: {}",
        if store.cookie().is_some() { "present" } else { "<none>" }
    );

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

fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let prompt = match current {
        Some(value) => format!("{field} [{value}] (Enter to keep, '-' to clear)"),
        None => format!("{field} (Enter to skip)"),
    };
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

#[derive(Debug, PartialEq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        match input.trim() {
            "" => PromptAction::Keep,
            "-" => PromptAction::Clear,
            value => PromptAction::Set(value.to_string()),
        }
    }
}
