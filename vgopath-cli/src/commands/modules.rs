//! Modules command - show what the resolver reports.

use std::path::PathBuf;

use vgopath::module::{filter_modules, list_modules};

use super::common::{load_config, resolve_resolver};
use crate::error::CliError;

/// Arguments for the modules command.
pub struct ModulesArgs {
    pub source: Option<PathBuf>,
    pub go: Option<PathBuf>,
    pub all: bool,
}

/// Run the modules command.
pub fn run(args: ModulesArgs) -> Result<(), CliError> {
    let config = load_config()?;
    let resolver = resolve_resolver(args.go, &config);
    let source = args.source.unwrap_or_else(|| PathBuf::from("."));

    let mut modules = list_modules(&source, &resolver).map_err(CliError::Modules)?;
    if !args.all {
        modules = filter_modules(modules);
    }

    for module in &modules {
        let version = if module.main {
            "(main)"
        } else if module.version.is_empty() {
            "-"
        } else {
            module.version.as_str()
        };
        let dir = if module.has_dir() {
            module.dir.display().to_string()
        } else {
            "(no directory)".to_string()
        };
        println!("{}  {}  {}", module.path, version, dir);
    }

    Ok(())
}
