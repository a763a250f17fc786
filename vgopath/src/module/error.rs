//! Error types for module discovery.
//!
//! Messages embed the underlying error, so none of these expose it again
//! through `source()`.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Result type for resolver and reader operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Errors raised while running the resolver or decoding its output.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The resolver process could not be started.
    #[error("failed to start {program}: {error}")]
    Spawn {
        program: String,
        error: io::Error,
    },

    /// The resolver was started without a stdout pipe.
    #[error("resolver stdout is not piped")]
    MissingStdout,

    /// The resolver exited unsuccessfully (only checked for one-shot calls).
    #[error("resolver exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    /// Malformed record in the resolver output.
    #[error("failed to decode module record: {0}")]
    Decode(serde_json::Error),

    /// A read was attempted after a decode error.
    #[error("module stream abandoned after a decode error")]
    Abandoned,
}

/// Fatal error from a batched read, with the number of slots filled before
/// the failure.
#[derive(Debug, Error)]
#[error("{error} (after {count} records)")]
pub struct PullError {
    pub count: usize,
    pub error: ReaderError,
}

/// Errors raised when shutting the resolver process down.
///
/// Cloneable so repeated closes can hand back the first outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CloseError {
    /// Sending the termination signal failed.
    #[error("failed to signal resolver process {pid}: {reason}")]
    Signal { pid: u32, reason: String },

    /// Waiting for the process failed.
    #[error("failed to wait for resolver process {pid}: {reason}")]
    Wait { pid: u32, reason: String },

    /// The process did not exit within the shutdown timeout. It may still be
    /// running.
    #[error("resolver process {pid} failed to terminate in time ({timeout:?})")]
    Timeout { pid: u32, timeout: Duration },
}
