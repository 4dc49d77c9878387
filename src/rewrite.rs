//! In-place rewriting of references to renamed paths.
//!
//! Stage 3 of the pipeline. Walks the whole export and, for every `.html` and
//! `.js` file, applies the substitution table as literal global replacements.
//! Files are handled as raw bytes, so anything the exporter wrote survives
//! untouched apart from the replaced fragments.
//!
//! ## Application Order
//!
//! Substitutions are applied one after another in table order, not in a single
//! combined pass. A reference like
//!
//! ```text
//! /_next/static/ABCDEF12/_buildManifest.js
//! ```
//!
//! contains both the `/_next/` key and the `next/static/ABCDEF12/_buildManifest.js`
//! key. Applied in sequence, either order yields
//! `/next/static/ABCDEF12/buildManifest.js`; a single leftmost-match pass would
//! consume `/_next/` and leave `_buildManifest.js` behind.
//!
//! Files whose content does not change are never written.

use crate::error::{AdaptError, Stage, io_at};
use crate::rename::SubstitutionTable;
use regex::bytes::{NoExpand, Regex};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Compiled form of a [`SubstitutionTable`].
struct Replacer {
    rules: Vec<(Regex, Vec<u8>)>,
}

impl Replacer {
    fn new(table: &SubstitutionTable) -> Self {
        let rules = table
            .entries()
            .iter()
            .map(|s| {
                // An escaped literal is always a valid pattern
                let pattern =
                    Regex::new(&regex::escape(&s.from)).expect("escaped literal is a valid regex");
                (pattern, s.to.clone().into_bytes())
            })
            .collect();
        Self { rules }
    }

    /// Apply every rule in order. Returns `None` when nothing matched.
    fn apply(&self, content: &[u8]) -> Option<Vec<u8>> {
        let mut current = content.to_vec();
        let mut changed = false;
        for (pattern, replacement) in &self.rules {
            if pattern.is_match(&current) {
                current = pattern
                    .replace_all(&current, NoExpand(replacement.as_slice()))
                    .into_owned();
                changed = true;
            }
        }
        (changed && current.as_slice() != content).then_some(current)
    }
}

/// Whether the file name ends with `.<ext>` for one of `extensions`.
///
/// Compared on raw name bytes, so names that are not valid UTF-8 still match.
fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().map(|n| n.as_encoded_bytes()) else {
        return false;
    };
    extensions.iter().any(|ext| {
        let ext = ext.as_bytes();
        name.len() > ext.len()
            && name.ends_with(ext)
            && name[name.len() - ext.len() - 1] == b'.'
    })
}

/// Rewrite every matching file under `root`, calling `on_rewrite` with each
/// path right after it has been written.
///
/// Returns the rewritten paths in walk order. The first read, write or walk
/// failure aborts.
pub fn rewrite_references<F>(
    root: &Path,
    table: &SubstitutionTable,
    extensions: &[String],
    mut on_rewrite: F,
) -> Result<Vec<PathBuf>, AdaptError>
where
    F: FnMut(&Path),
{
    let replacer = Replacer::new(table);
    let mut rewritten = Vec::new();
    let mut scanned = 0usize;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            AdaptError::Io {
                stage: Stage::Rewrite,
                path,
                source: io::Error::from(e),
            }
        })?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }
        scanned += 1;

        let path = entry.path();
        let content = fs::read(path).map_err(io_at(Stage::Rewrite, path))?;
        if let Some(updated) = replacer.apply(&content) {
            fs::write(path, updated).map_err(io_at(Stage::Rewrite, path))?;
            on_rewrite(path);
            rewritten.push(path.to_path_buf());
        }
    }

    debug!(
        "scanned {scanned} files, {} unchanged",
        scanned - rewritten.len()
    );
    Ok(rewritten)
}
