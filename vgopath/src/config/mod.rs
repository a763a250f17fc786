//! Configuration for a mirroring run.
//!
//! [`MirrorConfig`] holds the options for one run. [`ConfigFile`] holds
//! persisted defaults read from `config.ini`; CLI flags override them.

mod file;

pub use file::{config_file_path, ConfigError, ConfigFile, GoSettings, LinkSettings};

use std::path::PathBuf;
use std::time::Duration;

use crate::module::{GoListCommand, DEFAULT_GO_BINARY, DEFAULT_SHUTDOWN_TIMEOUT};

/// Options for one mirroring run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Root of the virtual GOPATH. Created if missing.
    pub destination: PathBuf,

    /// Directory the resolver runs in.
    pub source_dir: PathBuf,

    /// go binary used by [`MirrorConfig::resolver`].
    pub go_binary: PathBuf,

    /// Do not link `bin`.
    pub skip_bin: bool,

    /// Do not link the build cache.
    pub skip_build_cache: bool,

    /// Do not list and link modules under `src`.
    pub skip_modules: bool,

    /// How long to wait for the resolver to exit when closing it.
    pub shutdown_timeout: Duration,
}

impl MirrorConfig {
    /// Mirror everything into `destination`, resolving from the current
    /// directory.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            source_dir: PathBuf::from("."),
            go_binary: PathBuf::from(DEFAULT_GO_BINARY),
            skip_bin: false,
            skip_build_cache: false,
            skip_modules: false,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Create a run config with the go binary and skip switches taken from
    /// the config file.
    pub fn from_config_file(destination: impl Into<PathBuf>, config: &ConfigFile) -> Self {
        let mut mirror = Self::new(destination);
        if let Some(binary) = &config.go.binary {
            mirror = mirror.with_go_binary(binary);
        }
        mirror
            .skip_bin(config.link.skip_bin)
            .skip_build_cache(config.link.skip_build_cache)
            .skip_modules(config.link.skip_modules)
    }

    /// Set the directory the resolver runs in.
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Set the go binary to run.
    pub fn with_go_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.go_binary = binary.into();
        self
    }

    pub fn skip_bin(mut self, skip: bool) -> Self {
        self.skip_bin = skip;
        self
    }

    pub fn skip_build_cache(mut self, skip: bool) -> Self {
        self.skip_build_cache = skip;
        self
    }

    pub fn skip_modules(mut self, skip: bool) -> Self {
        self.skip_modules = skip;
        self
    }

    /// Set the resolver shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// The `go` resolver for this run.
    pub fn resolver(&self) -> GoListCommand {
        GoListCommand::with_binary(&self.go_binary)
    }
}
