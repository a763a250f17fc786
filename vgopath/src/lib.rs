//! vgopath - a virtual GOPATH for Go module workspaces
//!
//! Builds a legacy `GOPATH`-style tree from the module graph reported by
//! `go list -m -json all`, so tools that expect `$GOPATH/src/<import path>`
//! work against a module-based project. The tree consists of directories
//! and symlinks into the real module directories; no file content is copied.
//!
//! # Stages
//!
//! 1. [`module`]: run the resolver and stream module records from it
//! 2. [`module::filter_modules`]: drop modules without a directory
//! 3. [`tree`]: arrange module paths into per-segment trees
//! 4. [`link`]: realize the trees under `<dest>/src`
//!
//! [`pipeline::run`] wires the stages together.

pub mod config;
pub mod link;
pub mod module;
pub mod pipeline;
pub mod tree;

pub use pipeline::{run, PipelineError, RunSummary};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
