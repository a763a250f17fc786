//! Top-level entries of the virtual GOPATH.
//!
//! Besides `src/` (the module tree), the destination carries single
//! symlinks to the go binary directory and the build cache.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::FsError;
use super::materializer::{remove_existing, replace_with_symlink};

/// Directory holding the materialized module tree.
pub const MODULES_DIR: &str = "src";

/// Symlink to the go binary directory.
pub const BIN_DIR: &str = "bin";

/// Symlink to the go build cache.
pub const BUILD_CACHE_DIR: &str = "cache";

/// Replace `dest/name` with a symlink to `target`.
pub fn link_root(dest: &Path, name: &str, target: &Path) -> Result<PathBuf, FsError> {
    let link = dest.join(name);
    replace_with_symlink(target, &link)?;
    debug!(link = %link.display(), target = %target.display(), "Linked root");
    Ok(link)
}

/// Recreate `dest/src` as an empty directory.
pub fn reset_modules_dir(dest: &Path) -> Result<PathBuf, FsError> {
    let dir = dest.join(MODULES_DIR);
    remove_existing(&dir)?;
    fs::create_dir(&dir).map_err(|e| FsError::CreateDir {
        path: dir.clone(),
        error: e,
    })?;
    Ok(dir)
}
