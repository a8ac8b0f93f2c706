//! Shared test utilities for the docsify-helper test suite.
//!
//! Provides fixture setup, in-memory entry builders, and lookups over
//! scan results.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let entries = scan(tmp.path(), &SidebarConfig::default()).unwrap();
//!
//! let guide = find_entry(&entries, "guide");
//! assert!(guide.is_dir);
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::scan::Entry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
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

/// Create each `/`-separated relative path under `root`, with parents.
pub fn write_files(root: &Path, paths: &[&str]) {
    for rel in paths {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, format!("# {rel}\n")).unwrap();
    }
}

/// Fixed generation time: 2024-05-01 09:30:00.
pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

// =========================================================================
// Entry builders (no filesystem)
// =========================================================================

fn entry(relative_path: &str, is_dir: bool) -> Entry {
    let segments: Vec<&str> = relative_path.split('/').collect();
    Entry {
        name: segments[segments.len() - 1].to_string(),
        path: PathBuf::from("/docs").join(relative_path),
        relative_path: relative_path.to_string(),
        is_dir,
        depth: segments.len() - 1,
        modified: None,
        size: None,
    }
}

pub fn file_entry(relative_path: &str) -> Entry {
    entry(relative_path, false)
}

pub fn dir_entry(relative_path: &str) -> Entry {
    entry(relative_path, true)
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// All relative paths in list order.
pub fn relative_paths(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.relative_path.as_str()).collect()
}

/// Find an entry by relative path. Panics if not found.
pub fn find_entry<'a>(entries: &'a [Entry], relative_path: &str) -> &'a Entry {
    entries
        .iter()
        .find(|e| e.relative_path == relative_path)
        .unwrap_or_else(|| {
            let available = relative_paths(entries);
            panic!("entry '{relative_path}' not found. Available: {available:?}")
        })
}

/// Non-empty lines of a rendered sidebar after the `[HOME](/)` link.
///
/// Content without the home link (a bare body) is returned whole.
pub fn body_lines(content: &str) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines
        .iter()
        .position(|l| *l == "[HOME](/)")
        .map_or(0, |i| i + 1);
    lines[start..]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.to_string())
        .collect()
}
