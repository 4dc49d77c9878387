//! The whole transformation, stage by stage.

use crate::config::AdaptConfig;
use crate::error::AdaptError;
use crate::rename::{Rename, SubstitutionTable, plan_renames, rename_paths};
use crate::resolve::find_chunk_id;
use crate::rewrite::rewrite_references;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a successful run.
#[derive(Debug)]
pub struct AdaptReport {
    pub chunk_id: String,
    /// Moves in the order they were performed.
    pub renames: Vec<Rename>,
    /// Substitutions applied to `.html`/`.js` content.
    pub table: SubstitutionTable,
    /// Files whose content changed, in walk order.
    pub rewritten: Vec<PathBuf>,
}

/// Un-prefix the export at `root` in place.
///
/// `on_rewrite` is called with each file path as soon as it has been
/// rewritten. The first failure aborts the run; renames already performed
/// are not undone, and running again on the output fails because `_next/` is
/// gone.
pub fn adapt<F>(root: &Path, config: &AdaptConfig, on_rewrite: F) -> Result<AdaptReport, AdaptError>
where
    F: FnMut(&Path),
{
    config.validate()?;

    info!("Resolving chunk id in {}", root.join(&config.layout.next_dir).display());
    let chunk_id = find_chunk_id(root, &config.layout)?;

    info!("Renaming paths (chunk id {chunk_id})");
    let outcome = rename_paths(root, &chunk_id, config)?;

    info!("Rewriting references in {}", root.display());
    let rewritten = rewrite_references(
        root,
        &outcome.table,
        &config.rewrite.extensions,
        on_rewrite,
    )?;

    info!(
        "Done: {} paths renamed, {} files rewritten",
        outcome.renames.len(),
        rewritten.len()
    );
    Ok(AdaptReport {
        chunk_id,
        renames: outcome.renames,
        table: outcome.table,
        rewritten,
    })
}

/// Validate the export at `root` and return the renames [`adapt`] would
/// perform, without modifying anything.
pub fn check(root: &Path, config: &AdaptConfig) -> Result<Vec<Rename>, AdaptError> {
    config.validate()?;
    info!("Checking {}", root.display());
    plan_renames(root, config)
}
