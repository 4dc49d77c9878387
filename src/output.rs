//! CLI output formatting.
//!
//! Standard output carries results only: one rewritten file path per line
//! during a run, or the rename plan with `--check`. Progress and errors go
//! through `tracing` to stderr so the path list stays pipeable.
//!
//! ## Run
//!
//! ```text
//! out/index.html
//! out/next/static/ABCDEF12/buildManifest.js
//! ```
//!
//! ## Check
//!
//! ```text
//! Renames
//! 001 _next → next
//! 002 next/static/ABCDEF12/_buildManifest.js → next/static/ABCDEF12/buildManifest.js
//! ...
//! ```
//!
//! Each output has a `format_*` function (pure, returns strings) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::rename::Rename;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Display `path` relative to `root` when it lies inside it.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// A rewritten file, exactly as it was visited.
pub fn format_rewritten(path: &Path) -> String {
    path.display().to_string()
}

pub fn print_rewritten(path: &Path) {
    println!("{}", format_rewritten(path));
}

/// The planned renames, numbered in execution order, relative to `root`.
pub fn format_plan(plan: &[Rename], root: &Path) -> Vec<String> {
    let mut lines = vec!["Renames".to_string()];
    lines.extend(plan.iter().enumerate().map(|(i, rename)| {
        format!(
            "{} {} → {}",
            format_index(i + 1),
            relative(&rename.from, root),
            relative(&rename.to, root)
        )
    }));
    lines
}

pub fn print_plan(plan: &[Rename], root: &Path) {
    for line in format_plan(plan, root) {
        println!("{}", line);
    }
}
