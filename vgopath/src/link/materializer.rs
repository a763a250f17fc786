//! Materializing the module tree as directories and symlinks.
//!
//! For each node at `dir/segment`:
//!
//! - a collapsible leaf becomes one symlink to the module directory
//! - any other node becomes a real directory; if it owns a module, every
//!   top-level entry of the module directory is symlinked into it, then the
//!   children are linked inside it
//!
//! Stale entries are removed first, so running twice over the same
//! destination yields the same result. Nothing is rolled back on failure.
//!
//! ```text
//! dst/github.com/foo/
//! ├── bar/                 (module github.com/foo/bar, has children)
//! │   ├── go.mod -> /mod/github.com/foo/bar@v1.0.0/go.mod
//! │   ├── bar.go -> /mod/github.com/foo/bar@v1.0.0/bar.go
//! │   └── v2 -> /mod/github.com/foo/bar/v2@v2.1.0
//! └── baz -> /mod/github.com/foo/baz@v0.4.0
//! ```

use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::Path;

use tracing::trace;

use crate::tree::Node;

use super::error::{FsError, LinkResult};

/// Counts of what a materialization created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Real directories created.
    pub directories: usize,
    /// Symlinks created, module entries included.
    pub symlinks: usize,
}

/// Realize `nodes` under `dir`.
///
/// `dir` must exist. Fails on the first filesystem error, naming the module
/// path of the subtree where it happened.
pub fn materialize(dir: &Path, nodes: &[Node]) -> LinkResult<LinkStats> {
    let mut stats = LinkStats::default();
    for node in nodes {
        link_node(dir, node, &mut stats)?;
    }
    Ok(stats)
}

fn link_node(parent: &Path, node: &Node, stats: &mut LinkStats) -> LinkResult<()> {
    let dst = parent.join(&node.segment);
    link_node_at(&dst, node, stats).map_err(|e| e.within(&node.segment))
}

fn link_node_at(dst: &Path, node: &Node, stats: &mut LinkStats) -> LinkResult<()> {
    remove_existing(dst)?;

    if let (Some(module), true) = (&node.module, node.children.is_empty()) {
        create_symlink(module.dir(), dst)?;
        stats.symlinks += 1;
        trace!(module = %module.path, dst = %dst.display(), "Linked module");
        return Ok(());
    }

    fs::create_dir(dst).map_err(|e| FsError::CreateDir {
        path: dst.to_path_buf(),
        error: e,
    })?;
    stats.directories += 1;

    if let Some(module) = &node.module {
        stats.symlinks += link_entries(module.dir(), dst)?;
        trace!(module = %module.path, dst = %dst.display(), "Linked module entries");
    }

    for child in &node.children {
        link_node(dst, child, stats)?;
    }

    Ok(())
}

/// Symlink every top-level entry of `src` into `dst`, returning the count.
fn link_entries(src: &Path, dst: &Path) -> Result<usize, FsError> {
    let read_dir_error = |e: io::Error| FsError::ReadDir {
        path: src.to_path_buf(),
        error: e,
    };

    let mut count = 0;
    for entry in fs::read_dir(src).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        create_symlink(&entry.path(), &dst.join(entry.file_name()))?;
        count += 1;
    }

    Ok(count)
}

/// Remove whatever is at `path`. Symlinks are unlinked, never followed.
///
/// A missing entry is not an error.
pub(crate) fn remove_existing(path: &Path) -> Result<(), FsError> {
    let remove_error = |e: io::Error| FsError::Remove {
        path: path.to_path_buf(),
        error: e,
    };

    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(remove_error(e)),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(remove_error(e)),
        _ => Ok(()),
    }
}

pub(crate) fn create_symlink(target: &Path, link: &Path) -> Result<(), FsError> {
    symlink(target, link).map_err(|e| FsError::Symlink {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        error: e,
    })
}

/// Replace whatever is at `link` with a symlink to `target`.
pub(crate) fn replace_with_symlink(target: &Path, link: &Path) -> Result<(), FsError> {
    remove_existing(link)?;
    create_symlink(target, link)
}
