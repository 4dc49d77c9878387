//! Discovery of dynamically named entries.
//!
//! The exporter embeds content-derived identifiers in some names: the chunk-ID
//! directory under `_next/` and the hash suffix of page bundles such as
//! `_app-556f37b589d6ac62.js`. Their exact values are unknowable in advance,
//! so they are found by listing the parent directory.
//!
//! Listings are sorted by name before any decision is made, so results never
//! depend on the order the filesystem happens to return entries in.

use crate::config::LayoutConfig;
use crate::error::{AdaptError, Stage, io_at};
use std::fs;
use std::path::Path;

/// Sorted UTF-8 entry names of `dir`. Non-UTF-8 names cannot match any of the
/// ASCII patterns we look for and are skipped.
fn list_names(dir: &Path, stage: Stage) -> Result<Vec<String>, AdaptError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_at(stage, dir))? {
        let entry = entry.map_err(io_at(stage, dir))?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Find the build-specific chunk-ID directory name under `<root>/<next_dir>`.
///
/// The chunk ID is the first entry (by name) that is not the static directory
/// and whose name is at least `chunk_id_min_len` bytes long.
pub fn find_chunk_id(root: &Path, layout: &LayoutConfig) -> Result<String, AdaptError> {
    let next_dir = root.join(&layout.next_dir);
    list_names(&next_dir, Stage::ResolveChunkId)?
        .into_iter()
        .find(|name| *name != layout.static_dir && name.len() >= layout.chunk_id_min_len)
        .ok_or_else(|| AdaptError::NotFound {
            stage: Stage::ResolveChunkId,
            what: "chunk id directory".into(),
            dir: next_dir,
        })
}

/// Find the single entry in `dir` whose name starts with `prefix`.
///
/// Zero matches is `NotFound`; more than one is `Ambiguous` rather than an
/// arbitrary pick.
pub fn find_prefixed_entry(dir: &Path, prefix: &str, stage: Stage) -> Result<String, AdaptError> {
    let mut matches: Vec<String> = list_names(dir, stage)?
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .collect();
    let what = format!("entry starting with `{prefix}`");
    match matches.len() {
        0 => Err(AdaptError::NotFound {
            stage,
            what,
            dir: dir.to_path_buf(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(AdaptError::Ambiguous {
            stage,
            what,
            dir: dir.to_path_buf(),
            matches,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn next_dir_with(entries: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let next = tmp.path().join("_next");
        fs::create_dir_all(&next).unwrap();
        for entry in entries {
            fs::create_dir_all(next.join(entry)).unwrap();
        }
        tmp
    }

    #[test]
    fn chunk_id_skips_static() {
        let tmp = next_dir_with(&["static", "ABCDEF12"]);
        let id = find_chunk_id(tmp.path(), &LayoutConfig::default()).unwrap();
        assert_eq!(id, "ABCDEF12");
    }

    #[test]
    fn chunk_id_skips_short_names() {
        // Exactly six bytes is not long enough
        let tmp = next_dir_with(&["abcdef", "data", "static", "x7Kq9mNp2"]);
        let id = find_chunk_id(tmp.path(), &LayoutConfig::default()).unwrap();
        assert_eq!(id, "x7Kq9mNp2");
    }

    #[test]
    fn chunk_id_seven_bytes_is_enough() {
        let tmp = next_dir_with(&["static", "abcdefg"]);
        let id = find_chunk_id(tmp.path(), &LayoutConfig::default()).unwrap();
        assert_eq!(id, "abcdefg");
    }

    #[test]
    fn chunk_id_first_by_name_wins() {
        let tmp = next_dir_with(&["static", "zzzzzzzz", "BBBBBBBB", "aaaaaaaa"]);
        let id = find_chunk_id(tmp.path(), &LayoutConfig::default()).unwrap();
        assert_eq!(id, "BBBBBBBB");
    }

    #[test]
    fn chunk_id_respects_configured_static_dir() {
        let tmp = next_dir_with(&["static", "assets-x"]);
        let layout = LayoutConfig {
            static_dir: "assets-x".into(),
            ..LayoutConfig::default()
        };
        assert!(matches!(
            find_chunk_id(tmp.path(), &layout),
            Err(AdaptError::NotFound { .. })
        ));
    }

    #[test]
    fn chunk_id_not_found_when_only_static() {
        let tmp = next_dir_with(&["static", "short"]);
        let err = find_chunk_id(tmp.path(), &LayoutConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AdaptError::NotFound {
                stage: Stage::ResolveChunkId,
                ..
            }
        ));
        assert_eq!(err.path(), Some(tmp.path().join("_next").as_path()));
    }

    #[test]
    fn chunk_id_io_error_when_next_missing() {
        let tmp = TempDir::new().unwrap();
        let err = find_chunk_id(tmp.path(), &LayoutConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AdaptError::Io {
                stage: Stage::ResolveChunkId,
                ..
            }
        ));
    }

    #[test]
    fn chunk_id_io_error_when_next_is_a_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("_next"), "not a directory").unwrap();
        let err = find_chunk_id(tmp.path(), &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, AdaptError::Io { .. }));
    }

    #[test]
    fn prefixed_entry_single_match() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("_app-556f37b589d6ac62.js"), "").unwrap();
        fs::write(tmp.path().join("index-0a1b2c.js"), "").unwrap();
        let name = find_prefixed_entry(tmp.path(), "_app-", Stage::Rename).unwrap();
        assert_eq!(name, "_app-556f37b589d6ac62.js");
    }

    #[test]
    fn prefixed_entry_requires_prefix_not_substring() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("my_app-1.js"), "").unwrap();
        let err = find_prefixed_entry(tmp.path(), "_app-", Stage::Rename).unwrap_err();
        assert!(matches!(err, AdaptError::NotFound { .. }));
    }

    #[test]
    fn prefixed_entry_ambiguous() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("_app-bbb.js"), "").unwrap();
        fs::write(tmp.path().join("_app-aaa.js"), "").unwrap();
        let err = find_prefixed_entry(tmp.path(), "_app-", Stage::Rename).unwrap_err();
        match err {
            AdaptError::Ambiguous { matches, .. } => {
                assert_eq!(matches, vec!["_app-aaa.js", "_app-bbb.js"]);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn prefixed_entry_missing_dir_is_io() {
        let tmp = TempDir::new().unwrap();
        let err =
            find_prefixed_entry(&tmp.path().join("pages"), "_app-", Stage::Rename).unwrap_err();
        assert!(matches!(
            err,
            AdaptError::Io {
                stage: Stage::Rename,
                ..
            }
        ));
    }
}
