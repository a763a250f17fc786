//! CLI error type.

use thiserror::Error;
use vgopath::config::ConfigError;
use vgopath::module::ReaderError;
use vgopath::PipelineError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("listing modules: {0}")]
    Modules(ReaderError),

    #[error("failed to install logger: {0}")]
    Logging(String),
}
