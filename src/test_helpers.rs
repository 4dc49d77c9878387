//! Shared test utilities for the next-unscore test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let before = snapshot_tree(tmp.path());
//! check(tmp.path(), &AdaptConfig::default()).unwrap();
//! assert_eq!(snapshot_tree(tmp.path()), before);
//! ```

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Chunk-ID directory name used throughout `fixtures/export/`.
pub const FIXTURE_CHUNK_ID: &str = "ABCDEF12";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/export/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/export");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Tree inspection
// =========================================================================

/// Every file under `root`, keyed by relative path, with its content.
pub fn snapshot_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, std::fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Hex SHA-256 of a file's content.
pub fn file_sha256(path: &Path) -> String {
    let bytes = std::fs::read(path).unwrap();
    format!("{:x}", Sha256::digest(&bytes))
}

/// Assert `dir/name` exists and its underscore-prefixed original does not.
pub fn assert_file_renamed(root: &Path, dir: &str, name: &str) {
    let dir = root.join(dir);
    assert!(
        dir.join(name).is_file(),
        "expected {} to exist",
        dir.join(name).display()
    );
    let original = dir.join(format!("_{name}"));
    assert!(
        !original.exists(),
        "expected {} to be gone",
        original.display()
    );
}
