//! The mirroring run: list modules, build the tree, link it, link the
//! secondary roots.
//!
//! ```text
//! <dest>/
//! ├── src/      module tree (see [`crate::link::materialize`])
//! ├── bin   ->  $GOBIN or $GOPATH[0]/bin
//! └── cache ->  $GOCACHE
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::MirrorConfig;
use crate::link::{self, FsError, LinkError, LinkStats};
use crate::module::{self, GoEnv, ModuleReader, ReaderError, ResolverCommand};
use crate::tree::{self, TreeError};

// Stage names used in error messages
const BIN_ROOT: &str = "binary root";
const BUILD_CACHE_ROOT: &str = "build cache";

/// Errors from a mirroring run, tagged with the failing stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("preparing destination: {0}")]
    Destination(FsError),

    #[error("resolving source directory {}: {error}", .path.display())]
    SourceDir {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("listing modules: {0}")]
    Listing(ReaderError),

    #[error("building module tree: {0}")]
    Tree(TreeError),

    #[error("linking modules: {0}")]
    Link(LinkError),

    #[error("reading go environment: {0}")]
    GoEnv(ReaderError),

    #[error("linking {root}: {reason}")]
    MissingRoot { root: &'static str, reason: String },

    #[error("linking {root}: {error}")]
    Root {
        root: &'static str,
        error: FsError,
    },
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Modules listed by the resolver, before filtering.
    pub modules_listed: usize,
    /// Modules linked under `src`.
    pub modules_linked: usize,
    /// Directories and symlinks created for the module tree.
    pub link_stats: LinkStats,
    /// `bin` link, when created.
    pub bin_link: Option<PathBuf>,
    /// Build cache link, when created.
    pub build_cache_link: Option<PathBuf>,
}

/// Build the virtual GOPATH described by `config`.
pub fn run(
    config: &MirrorConfig,
    resolver: &dyn ResolverCommand,
) -> Result<RunSummary, PipelineError> {
    let dest = &config.destination;
    fs::create_dir_all(dest).map_err(|e| {
        PipelineError::Destination(FsError::CreateDir {
            path: dest.clone(),
            error: e,
        })
    })?;

    let source_dir =
        fs::canonicalize(&config.source_dir).map_err(|e| PipelineError::SourceDir {
            path: config.source_dir.clone(),
            error: e,
        })?;

    let mut summary = RunSummary::default();

    if config.skip_modules {
        debug!("Skipping module mirroring");
    } else {
        link_modules(config, &source_dir, resolver, &mut summary)?;
    }

    if config.skip_bin && config.skip_build_cache {
        return Ok(summary);
    }

    let env = GoEnv::query(resolver, &source_dir).map_err(PipelineError::GoEnv)?;

    if config.skip_bin {
        debug!("Skipping binary root");
    } else {
        let target = env.bin_dir().ok_or_else(|| PipelineError::MissingRoot {
            root: BIN_ROOT,
            reason: "neither GOBIN nor GOPATH is set".to_string(),
        })?;
        summary.bin_link = Some(link_root(dest, link::BIN_DIR, BIN_ROOT, &target)?);
    }

    if config.skip_build_cache {
        debug!("Skipping build cache");
    } else {
        let target = env.cache_dir().ok_or_else(|| PipelineError::MissingRoot {
            root: BUILD_CACHE_ROOT,
            reason: "GOCACHE is not set".to_string(),
        })?;
        summary.build_cache_link = Some(link_root(
            dest,
            link::BUILD_CACHE_DIR,
            BUILD_CACHE_ROOT,
            &target,
        )?);
    }

    Ok(summary)
}

fn link_modules(
    config: &MirrorConfig,
    source_dir: &Path,
    resolver: &dyn ResolverCommand,
    summary: &mut RunSummary,
) -> Result<(), PipelineError> {
    let modules = ModuleReader::spawn(source_dir, resolver)
        .and_then(|reader| {
            reader
                .with_shutdown_timeout(config.shutdown_timeout)
                .into_modules()
        })
        .map_err(PipelineError::Listing)?;
    summary.modules_listed = modules.len();

    let modules = module::filter_modules(modules);
    summary.modules_linked = modules.len();

    let forest = tree::build_forest(modules).map_err(PipelineError::Tree)?;
    debug!(roots = forest.len(), "Built module tree");

    let src = link::reset_modules_dir(&config.destination).map_err(PipelineError::Destination)?;
    summary.link_stats = link::materialize(&src, &forest).map_err(PipelineError::Link)?;

    info!(
        dest = %src.display(),
        modules = summary.modules_linked,
        skipped = summary.modules_listed - summary.modules_linked,
        directories = summary.link_stats.directories,
        symlinks = summary.link_stats.symlinks,
        "Linked modules"
    );

    Ok(())
}

fn link_root(
    dest: &Path,
    name: &str,
    root: &'static str,
    target: &Path,
) -> Result<PathBuf, PipelineError> {
    link::link_root(dest, name, target).map_err(|e| PipelineError::Root { root, error: e })
}
