//! Link command - build the virtual GOPATH.

use std::path::PathBuf;

use tracing::debug;
use vgopath::config::{ConfigFile, MirrorConfig};

use super::common::load_config;
use crate::error::CliError;

/// Arguments for the link command.
pub struct LinkArgs {
    pub output: PathBuf,
    pub source: Option<PathBuf>,
    pub go: Option<PathBuf>,
    pub skip_bin: bool,
    pub skip_build_cache: bool,
    pub skip_modules: bool,
}

/// Run the link command.
pub fn run(args: LinkArgs) -> Result<(), CliError> {
    let config = load_config()?;
    let mirror = mirror_config(args, &config);
    let resolver = mirror.resolver();

    debug!(?mirror, go = %resolver.binary().display(), "Starting link");
    let summary = vgopath::run(&mirror, &resolver)?;
    debug!(?summary, "Link finished");

    Ok(())
}

/// Merge command-line arguments over the config file defaults.
fn mirror_config(args: LinkArgs, config: &ConfigFile) -> MirrorConfig {
    // Flags can only turn skipping on; the config file supplies the default
    let mut mirror = MirrorConfig::from_config_file(&args.output, config);
    mirror.skip_bin |= args.skip_bin;
    mirror.skip_build_cache |= args.skip_build_cache;
    mirror.skip_modules |= args.skip_modules;
    if let Some(source) = args.source {
        mirror = mirror.with_source_dir(source);
    }
    if let Some(go) = args.go {
        mirror = mirror.with_go_binary(go);
    }
    mirror
}
