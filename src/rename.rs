//! Ordered un-prefixing of well-known paths.
//!
//! Stage 2 of the pipeline. Performs a fixed sequence of filesystem moves and
//! records, for each one, the literal text substitution that keeps references
//! to it consistent:
//!
//! ```text
//! 1. _next/                                  → next/
//! 2. next/static/<chunk id>/_buildManifest.js → …/buildManifest.js
//! 3. next/static/<chunk id>/_ssgManifest.js   → …/ssgManifest.js
//! 4. next/static/chunks/pages/_app-<hash>.js  → …/app-<hash>.js
//! 5. next/static/chunks/pages/_error-<hash>.js → …/error-<hash>.js
//! ```
//!
//! Order is load-bearing: steps 2–5 address paths under the already renamed
//! `next/` directory, and page bundles are discovered only once their step is
//! reached. The first failure aborts; nothing is rolled back, so a failure
//! part-way through leaves some renames applied.
//!
//! The [`SubstitutionTable`] can only be grown from inside this module, one
//! entry per successful rename, and is handed out whole once every rename has
//! completed.

use crate::config::{AdaptConfig, strip_underscore};
use crate::error::{AdaptError, Stage, io_at};
use crate::resolve::{find_chunk_id, find_prefixed_entry};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One literal old-fragment → new-fragment replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

/// Ordered substitutions, one per completed rename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: Vec<Substitution>,
}

impl SubstitutionTable {
    pub(crate) fn record(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.push(Substitution {
            from: from.into(),
            to: to.into(),
        });
    }

    pub fn entries(&self) -> &[Substitution] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A filesystem move, performed or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Everything the rename stage produced.
#[derive(Debug)]
pub struct RenameOutcome {
    /// Moves in the order they were performed.
    pub renames: Vec<Rename>,
    /// Frozen substitution table for the rewrite stage.
    pub table: SubstitutionTable,
}

/// Performs moves relative to the target root and records what succeeded.
struct Recorder<'a> {
    root: &'a Path,
    renames: Vec<Rename>,
    table: SubstitutionTable,
}

impl<'a> Recorder<'a> {
    fn new(root: &'a Path) -> Self {
        Self {
            root,
            renames: Vec::new(),
            table: SubstitutionTable::default(),
        }
    }

    /// Move `from` to `to` (both relative to the root); on success record
    /// `substitution` as the text replacement covering the move.
    fn apply(&mut self, from: &str, to: &str, substitution: Substitution) -> Result<(), AdaptError> {
        let rename = Rename {
            from: self.root.join(from),
            to: self.root.join(to),
        };
        fs::rename(&rename.from, &rename.to).map_err(io_at(Stage::Rename, &rename.from))?;
        debug!("renamed {} → {}", rename.from.display(), rename.to.display());
        self.table.record(substitution.from, substitution.to);
        self.renames.push(rename);
        Ok(())
    }

    /// Move a relative path and substitute that same relative path.
    fn apply_relative(&mut self, from: String, to: String) -> Result<(), AdaptError> {
        let substitution = Substitution {
            from: from.clone(),
            to: to.clone(),
        };
        self.apply(&from, &to, substitution)
    }

    fn finish(self) -> RenameOutcome {
        RenameOutcome {
            renames: self.renames,
            table: self.table,
        }
    }
}

/// Perform every rename in order and return the frozen substitution table.
pub fn rename_paths(
    root: &Path,
    chunk_id: &str,
    config: &AdaptConfig,
) -> Result<RenameOutcome, AdaptError> {
    let layout = &config.layout;
    let next = layout.renamed_next_dir();
    let mut recorder = Recorder::new(root);

    recorder.apply(
        &layout.next_dir,
        next,
        Substitution {
            from: format!("/{}/", layout.next_dir),
            to: format!("/{next}/"),
        },
    )?;

    let chunk_dir = format!("{next}/{}/{chunk_id}", layout.static_dir);
    for manifest in &config.rename.manifests {
        recorder.apply_relative(
            format!("{chunk_dir}/{manifest}"),
            format!("{chunk_dir}/{}", strip_underscore(manifest)),
        )?;
    }

    let pages_dir = format!("{next}/{}", layout.pages_dir);
    let pages_path = root.join(&pages_dir);
    for prefix in &config.rename.page_prefixes {
        let page = find_prefixed_entry(&pages_path, prefix, Stage::Rename)?;
        recorder.apply_relative(
            format!("{pages_dir}/{page}"),
            format!("{pages_dir}/{}", strip_underscore(&page)),
        )?;
    }

    Ok(recorder.finish())
}

/// Work out, without touching the disk, the renames [`rename_paths`] would
/// perform on an untouched export.
///
/// Every source is checked up front, so a layout problem anywhere in the
/// sequence is reported before anything has moved.
pub fn plan_renames(root: &Path, config: &AdaptConfig) -> Result<Vec<Rename>, AdaptError> {
    let layout = &config.layout;
    let next = layout.renamed_next_dir();
    let chunk_id = find_chunk_id(root, layout)?;
    let original = root.join(&layout.next_dir);
    let renamed = root.join(next);

    let mut plan = vec![Rename {
        from: original.clone(),
        to: renamed.clone(),
    }];

    let original_chunk_dir = original.join(&layout.static_dir).join(&chunk_id);
    let renamed_chunk_dir = renamed.join(&layout.static_dir).join(&chunk_id);
    for manifest in &config.rename.manifests {
        require_entry(&original_chunk_dir, manifest)?;
        plan.push(Rename {
            from: renamed_chunk_dir.join(manifest),
            to: renamed_chunk_dir.join(strip_underscore(manifest)),
        });
    }

    let original_pages = original.join(&layout.pages_dir);
    let renamed_pages = renamed.join(&layout.pages_dir);
    for prefix in &config.rename.page_prefixes {
        let page = find_prefixed_entry(&original_pages, prefix, Stage::Rename)?;
        plan.push(Rename {
            from: renamed_pages.join(&page),
            to: renamed_pages.join(strip_underscore(&page)),
        });
    }

    Ok(plan)
}

fn require_entry(dir: &Path, name: &str) -> Result<(), AdaptError> {
    let path = dir.join(name);
    match fs::symlink_metadata(&path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AdaptError::NotFound {
            stage: Stage::Rename,
            what: format!("`{name}`"),
            dir: dir.to_path_buf(),
        }),
        Err(e) => Err(io_at(Stage::Rename, &path)(e)),
    }
}
