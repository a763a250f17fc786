//! Settings shared across commands.

use std::path::PathBuf;

use vgopath::config::ConfigFile;
use vgopath::module::GoListCommand;

use crate::error::CliError;

/// Load the config file, surfacing parse errors.
pub fn load_config() -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load()?)
}

/// Resolver for the go binary given on the command line, else the config
/// file, else `go` from `PATH`.
pub fn resolve_resolver(cli_go: Option<PathBuf>, config: &ConfigFile) -> GoListCommand {
    cli_go
        .or_else(|| config.go.binary.clone())
        .map(GoListCommand::with_binary)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_go_binary_wins() {
        let mut config = ConfigFile::default();
        config.go.binary = Some(PathBuf::from("/from/config/go"));

        let resolver = resolve_resolver(Some(PathBuf::from("/from/cli/go")), &config);
        assert_eq!(resolver.binary(), Path::new("/from/cli/go"));

        let resolver = resolve_resolver(None, &config);
        assert_eq!(resolver.binary(), Path::new("/from/config/go"));

        let resolver = resolve_resolver(None, &ConfigFile::default());
        assert_eq!(resolver.binary(), Path::new("go"));
    }
}
