//! Module records as reported by the resolver.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One resolved module.
///
/// Field names follow the `go list -m -json` output. Keys other than the
/// four below are ignored when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleRecord {
    /// Slash-delimited module path (e.g. `github.com/foo/bar`).
    pub path: String,

    /// Directory holding the module content. Empty for modules the
    /// resolver knows about but has no source for.
    #[serde(default)]
    pub dir: PathBuf,

    /// Opaque version string.
    #[serde(default)]
    pub version: String,

    /// Whether this is the main (workspace) module.
    #[serde(default)]
    pub main: bool,
}

impl ModuleRecord {
    /// Create a record with the given path and directory.
    pub fn new(path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dir: dir.into(),
            ..Default::default()
        }
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Mark this record as the main module.
    pub fn as_main(mut self) -> Self {
        self.main = true;
        self
    }

    /// Whether the module has a backing directory on disk.
    pub fn has_dir(&self) -> bool {
        !self.dir.as_os_str().is_empty()
    }

    /// The module directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Drop modules without a backing directory, preserving order.
pub fn filter_modules(modules: Vec<ModuleRecord>) -> Vec<ModuleRecord> {
    modules.into_iter().filter(ModuleRecord::has_dir).collect()
}
