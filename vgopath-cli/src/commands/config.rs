//! Configuration CLI commands.

use clap::Subcommand;
use vgopath::config::{config_file_path, ConfigFile};

use super::common::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration file settings
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Show => {
            print!("{}", render_settings(&load_config()?));
            Ok(())
        }
    }
}

/// One `key = value` line per setting.
fn render_settings(config: &ConfigFile) -> String {
    let binary = config
        .go
        .binary
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string());

    format!(
        "go.binary             = {}\n\
         link.skip_bin         = {}\n\
         link.skip_build_cache = {}\n\
         link.skip_modules     = {}\n",
        binary, config.link.skip_bin, config.link.skip_build_cache, config.link.skip_modules
    )
}
