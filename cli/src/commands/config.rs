//! `efs-stack config` — show and set configuration values.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;

use clap::Subcommand;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written, or the
/// key or value is invalid.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    app.renderer().render_config(&config, &path)?;
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    let config = config_service::set_value(&app.config_store, key, value)?;
    if app.is_json() {
        let path = app.config_store.path()?;
        app.renderer().render_config(&config, &path)?;
    } else {
        app.output.success(&format!("Set {key} = {value}"));
    }
    Ok(ExitCode::SUCCESS)
}
