//! Error taxonomy shared by every pipeline stage.
//!
//! Each failure carries the [`Stage`] it happened in and the path it concerns,
//! so callers can tell a missing `_next/` apart from a missing `_app-*` bundle
//! without matching on log text.

use crate::config::ConfigError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading or validating the adapter configuration.
    Config,
    /// Finding the build-specific directory under `_next/`.
    ResolveChunkId,
    /// Moving underscore-prefixed paths, including page bundle discovery.
    Rename,
    /// Walking the tree and rewriting file content.
    Rewrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::ResolveChunkId => "resolve chunk id",
            Stage::Rename => "rename",
            Stage::Rewrite => "rewrite",
        };
        f.write_str(name)
    }
}

/// Any failure that aborts a run.
#[derive(Error, Debug)]
pub enum AdaptError {
    /// A listing, read, write, rename or walk failed at `path`.
    #[error("{stage}: IO error at {}: {source}", path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A required dynamically named entry is missing from `dir`.
    #[error("{stage}: no {what} found in {}", dir.display())]
    NotFound {
        stage: Stage,
        what: String,
        dir: PathBuf,
    },
    /// More than one entry in `dir` matches; `matches` lists them sorted.
    #[error("{stage}: {what} is ambiguous in {}: {}", dir.display(), matches.join(", "))]
    Ambiguous {
        stage: Stage,
        what: String,
        dir: PathBuf,
        matches: Vec<String>,
    },
    /// The configuration could not be loaded or is invalid.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

impl AdaptError {
    /// Stage the failure happened in.
    pub fn stage(&self) -> Stage {
        match self {
            AdaptError::Io { stage, .. }
            | AdaptError::NotFound { stage, .. }
            | AdaptError::Ambiguous { stage, .. } => *stage,
            AdaptError::Config(_) => Stage::Config,
        }
    }

    /// Path the failure concerns: the file for IO errors, the searched
    /// directory for discovery errors.
    pub fn path(&self) -> Option<&Path> {
        match self {
            AdaptError::Io { path, .. } => Some(path),
            AdaptError::NotFound { dir, .. } | AdaptError::Ambiguous { dir, .. } => Some(dir),
            AdaptError::Config(_) => None,
        }
    }
}

/// Adapter for `map_err`: wrap an `io::Error` with its stage and path.
pub(crate) fn io_at(stage: Stage, path: &Path) -> impl FnOnce(io::Error) -> AdaptError + '_ {
    move |source| AdaptError::Io {
        stage,
        path: path.to_path_buf(),
        source,
    }
}
