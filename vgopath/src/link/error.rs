//! Error types for materializing the tree on disk.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for link operations.
pub type LinkResult<T> = Result<T, LinkError>;

/// A single failed filesystem operation.
#[derive(Debug, Error)]
pub enum FsError {
    /// Failed to remove a stale entry.
    #[error("failed to remove {}: {error}", .path.display())]
    Remove {
        path: PathBuf,
        error: io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {error}", .path.display())]
    CreateDir {
        path: PathBuf,
        error: io::Error,
    },

    /// Failed to list a module directory.
    #[error("failed to read directory {}: {error}", .path.display())]
    ReadDir {
        path: PathBuf,
        error: io::Error,
    },

    /// Failed to create a symlink.
    #[error("failed to symlink {} -> {}: {error}", .link.display(), .target.display())]
    Symlink {
        target: PathBuf,
        link: PathBuf,
        error: io::Error,
    },
}

/// A filesystem failure located in the module tree.
///
/// Each recursion level prepends its segment, so the error names the full
/// module path of the subtree that failed.
#[derive(Debug, Error)]
#[error("[path {}]: {error}", .segments.join("/"))]
pub struct LinkError {
    segments: Vec<String>,
    error: FsError,
}

impl LinkError {
    /// Prefix the location with an enclosing segment.
    pub fn within(mut self, segment: &str) -> Self {
        self.segments.insert(0, segment.to_string());
        self
    }

    /// Slash-separated tree path where the failure happened.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// The underlying filesystem failure.
    pub fn fs_error(&self) -> &FsError {
        &self.error
    }
}

impl From<FsError> for LinkError {
    fn from(error: FsError) -> Self {
        Self {
            segments: Vec::new(),
            error,
        }
    }
}
