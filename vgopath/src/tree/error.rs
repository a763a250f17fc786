//! Error types for path tree construction.

use thiserror::Error;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised while building the module path tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A module was reported with an empty path.
    #[error("invalid empty module path")]
    EmptyPath,

    /// A module path contains an empty segment (e.g. `a//b` or `a/`).
    #[error("invalid module path {path:?}: empty path segment")]
    EmptySegment { path: String },

    /// A module path contains a `.` or `..` segment, which would escape its
    /// slot in the tree once linked.
    #[error("invalid module path {path:?}: {segment:?} path segment")]
    InvalidSegment { path: String, segment: String },

    /// Two modules claim the same path.
    #[error("module {path} already exists")]
    Duplicate { path: String },
}
