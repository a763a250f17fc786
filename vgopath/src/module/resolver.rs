//! Invocations of the external module resolver.
//!
//! The resolver is the `go` tool. [`ResolverCommand`] abstracts how its
//! processes are built so callers (and tests) can substitute another
//! producer of the same output format.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;

use super::error::{ReaderError, ReaderResult};

/// Default go binary, resolved through `PATH`.
pub const DEFAULT_GO_BINARY: &str = "go";

/// Builds resolver invocations for a working directory.
pub trait ResolverCommand: Send + Sync {
    /// Command that writes every module of the build graph as a stream of
    /// JSON objects to stdout.
    fn list_modules(&self, dir: &Path) -> Command;

    /// Command that writes the requested environment variables as a single
    /// JSON object to stdout.
    fn env(&self, dir: &Path, vars: &[&str]) -> Command;
}

/// `go list -m -json all` and `go env -json`.
#[derive(Debug, Clone)]
pub struct GoListCommand {
    go_binary: PathBuf,
}

impl GoListCommand {
    /// Use the `go` binary found on `PATH`.
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_GO_BINARY)
    }

    /// Use a specific go binary.
    pub fn with_binary(go_binary: impl Into<PathBuf>) -> Self {
        Self {
            go_binary: go_binary.into(),
        }
    }

    /// The go binary invoked.
    pub fn binary(&self) -> &Path {
        &self.go_binary
    }
}

impl Default for GoListCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverCommand for GoListCommand {
    fn list_modules(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.go_binary);
        cmd.args(["list", "-m", "-json", "all"]).current_dir(dir);
        cmd
    }

    fn env(&self, dir: &Path, vars: &[&str]) -> Command {
        let mut cmd = Command::new(&self.go_binary);
        cmd.args(["env", "-json"]).args(vars).current_dir(dir);
        cmd
    }
}

/// The subset of the go environment needed for the secondary roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GoEnv {
    #[serde(rename = "GOBIN", default)]
    pub gobin: String,

    #[serde(rename = "GOPATH", default)]
    pub gopath: String,

    #[serde(rename = "GOCACHE", default)]
    pub gocache: String,
}

impl GoEnv {
    const VARS: [&'static str; 3] = ["GOBIN", "GOPATH", "GOCACHE"];

    /// Query the environment through the resolver, running in `dir`.
    pub fn query(resolver: &dyn ResolverCommand, dir: &Path) -> ReaderResult<Self> {
        let mut cmd = resolver.env(dir, &Self::VARS);
        let program = cmd.get_program().to_string_lossy().into_owned();

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ReaderError::Spawn { program, error: e })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReaderError::Failed {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(ReaderError::Decode)
    }

    /// Directory installed binaries go to: `GOBIN`, or `bin` under the
    /// first `GOPATH` entry.
    pub fn bin_dir(&self) -> Option<PathBuf> {
        if !self.gobin.is_empty() {
            return Some(PathBuf::from(&self.gobin));
        }

        env::split_paths(&self.gopath)
            .find(|p| !p.as_os_str().is_empty())
            .map(|p| p.join("bin"))
    }

    /// The build cache directory, if set.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        (!self.gocache.is_empty()).then(|| PathBuf::from(&self.gocache))
    }
}
