//! CLI command implementations.

pub mod common;
pub mod config;
pub mod link;
pub mod modules;
