//! # next-unscore
//!
//! Post-processes a static Next.js export so it can be served from hosts
//! that reject or hide underscore-prefixed paths (GitHub Pages with Jekyll,
//! some object stores and CDNs).
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Resolve   _next/            →  chunk id          (read-only discovery)
//! 2. Rename    _next/, manifests,  →  substitution table (ordered moves)
//!              _app-*, _error-*
//! 3. Rewrite   *.html, *.js      →  rewritten files   (literal replacement)
//! ```
//!
//! Stages run strictly in order and the first error aborts the run. The
//! substitution table only leaves the rename stage once every move has
//! happened, so no reference is rewritten to a path that does not exist yet.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | Stage 1: finds the chunk-ID directory and hash-suffixed page bundles |
//! | [`rename`] | Stage 2: ordered renames, the [`rename::SubstitutionTable`], dry-run plans |
//! | [`rewrite`] | Stage 3: walks the tree and rewrites `.html`/`.js` references in place |
//! | [`pipeline`] | Runs the stages in order ([`pipeline::adapt`], [`pipeline::check`]) |
//! | [`config`] | Well-known names, optional TOML overrides, validation |
//! | [`error`] | [`error::AdaptError`], tagged with the [`error::Stage`] that failed |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Shot, No Rollback
//!
//! The tool mutates the export in place and is not idempotent: a second run
//! fails because `_next/` no longer exists. A failure part-way through the
//! rename stage leaves the moves made so far in place. Re-export and run again.
//!
//! ## Literal Bytes, Not Syntax
//!
//! References are rewritten by plain literal replacement over raw bytes. No
//! HTML or JavaScript is parsed and no encoding is assumed.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod rename;
pub mod resolve;
pub mod rewrite;

pub use config::AdaptConfig;
pub use error::{AdaptError, Stage};
pub use pipeline::{AdaptReport, adapt, check};

#[cfg(test)]
pub(crate) mod test_helpers;
