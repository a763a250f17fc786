//! Filesystem materialization of the module tree.
//!
//! Everything here creates directories and symlinks only; module content is
//! never copied or modified.

mod error;
mod materializer;
mod roots;

pub use error::{FsError, LinkError, LinkResult};
pub use materializer::{materialize, LinkStats};
pub use roots::{link_root, reset_modules_dir, BIN_DIR, BUILD_CACHE_DIR, MODULES_DIR};
