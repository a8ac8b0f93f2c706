//! Docs tree scanning.
//!
//! Stage 1 of the sidebar pipeline. Walks the docs directory and produces
//! a flat, ordered list of [`Entry`] values: one per Markdown file and,
//! when folders are shown, one per directory.
//!
//! ## Rules
//!
//! - Only files whose name ends in `.md` (any case) are kept. Everything
//!   else that is not a directory is skipped silently, symlinks included.
//! - Exclusion happens before descending: an excluded folder contributes
//!   neither itself nor anything below it, whatever `show_folders` says.
//! - With `show_folders = false` folders are still walked, they just do
//!   not become entries. Their Markdown files still appear.
//! - With `recursive = false` only direct children of the root are listed.
//! - Any read failure aborts the scan. Partial results are never returned.
//!
//! ## Example
//!
//! ```text
//! docs/                     relative_path        depth
//! ├── 01-intro.md           01-intro.md          0
//! ├── guide.md              guide.md             0
//! └── api/                  api                  0
//!     ├── endpoints.md      api/endpoints.md     1
//!     └── v2/               api/v2               1
//!         └── auth.md       api/v2/auth.md       2
//! ```
//!
//! The list is sorted by [`order::sort_entries`](crate::order::sort_entries)
//! before it is returned.

use crate::config::SidebarConfig;
use crate::exclude::ExcludeSet;
use crate::naming::strip_md_extension;
use crate::order;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Docs directory not found: {path}")]
    NotFound { path: PathBuf },
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    fn from_walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        let message = err.to_string();
        match err.into_io_error() {
            Some(io) => Self::io(path, io),
            None => Self::Walk { path, message },
        }
    }
}

/// One scanned filesystem node.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Base name of the file or directory.
    pub name: String,
    /// Absolute (or root-joined) filesystem path.
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub relative_path: String,
    pub is_dir: bool,
    /// Segment count of `relative_path` minus one.
    pub depth: usize,
    /// Modification time. Files only.
    pub modified: Option<SystemTime>,
    /// Size in bytes. Files only.
    pub size: Option<u64>,
}

impl Entry {
    /// Path segments of `relative_path`.
    pub fn segments(&self) -> Vec<&str> {
        self.relative_path.split('/').collect()
    }
}

/// Scan `root` and return the ordered entry list.
pub fn scan(root: &Path, config: &SidebarConfig) -> Result<Vec<Entry>, ScanError> {
    let excludes = ExcludeSet::new(&config.exclude);
    scan_with(root, config, &excludes)
}

/// Like [`scan`], with exclusion rules compiled by the caller.
pub fn scan_with(
    root: &Path,
    config: &SidebarConfig,
    excludes: &ExcludeSet,
) -> Result<Vec<Entry>, ScanError> {
    let mut entries = collect_entries(root, config, excludes)?;
    order::sort_entries(&mut entries, config.sort_by);
    Ok(entries)
}

/// Walk the tree and collect included entries in traversal order.
pub fn collect_entries(
    root: &Path,
    config: &SidebarConfig,
    excludes: &ExcludeSet,
) -> Result<Vec<Entry>, ScanError> {
    let root_meta = fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
    if !root_meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    if !config.recursive {
        walker = walker.max_depth(1);
    }

    // filter_entry prunes excluded folders before they are descended into.
    let iter = walker.into_iter().filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !excludes.is_excluded(&relative_path(root, entry.path()), &name)
    });

    let mut entries = Vec::new();
    for entry_result in iter {
        let entry = entry_result.map_err(|e| ScanError::from_walk(root, e))?;
        let file_type = entry.file_type();
        let name = entry.file_name().to_string_lossy().to_string();

        if file_type.is_dir() {
            if !config.show_folders {
                continue;
            }
        } else if !(file_type.is_file() && is_markdown(&name)) {
            continue;
        }

        entries.push(Entry {
            relative_path: relative_path(root, entry.path()),
            path: entry.path().to_path_buf(),
            is_dir: file_type.is_dir(),
            depth: entry.depth() - 1,
            name,
            modified: None,
            size: None,
        });
    }

    // Stat files in parallel; collection order is untouched.
    entries
        .par_iter_mut()
        .filter(|e| !e.is_dir)
        .try_for_each(|e| {
            let meta = fs::metadata(&e.path).map_err(|err| ScanError::io(&e.path, err))?;
            e.modified = meta.modified().ok();
            e.size = Some(meta.len());
            Ok::<(), ScanError>(())
        })?;

    tracing::debug!(
        root = %root.display(),
        entries = entries.len(),
        rules = excludes.rules().len(),
        "scan collected entries"
    );
    Ok(entries)
}

/// Whether a file name has the Markdown suffix (`.md`, any case).
pub fn is_markdown(name: &str) -> bool {
    strip_md_extension(name).len() != name.len()
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortBy;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn defaults() -> SidebarConfig {
        SidebarConfig {
            exclude: vec!["_sidebar.md".to_string()],
            ..SidebarConfig::default()
        }
    }

    #[test]
    fn only_markdown_files_are_kept() {
        let tmp = TempDir::new().unwrap();
        write_files(
            tmp.path(),
            &["a.md", "b.MD", "c.txt", "d.markdown", "image.png", ".md"],
        );

        let entries = scan(tmp.path(), &defaults()).unwrap();
        assert_eq!(relative_paths(&entries), vec![".md", "a.md", "b.MD"]);
    }

    #[test]
    fn depth_matches_segment_count() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &["top.md", "api/endpoints.md", "api/v2/auth.md"]);

        let entries = scan(tmp.path(), &defaults()).unwrap();
        for e in &entries {
            assert_eq!(e.depth, e.segments().len() - 1, "{}", e.relative_path);
        }
        assert_eq!(find_entry(&entries, "api/v2/auth.md").depth, 2);
        assert_eq!(find_entry(&entries, "api/v2").depth, 1);
        assert!(find_entry(&entries, "api/v2").is_dir);
    }

    #[test]
    fn file_metadata_recorded_for_files_only() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &["guide/intro.md"]);
        std::fs::write(tmp.path().join("guide/intro.md"), "hello").unwrap();

        let entries = scan(tmp.path(), &defaults()).unwrap();
        let file = find_entry(&entries, "guide/intro.md");
        assert_eq!(file.size, Some(5));
        assert!(file.modified.is_some());

        let dir = find_entry(&entries, "guide");
        assert_eq!(dir.size, None);
        assert_eq!(dir.modified, None);
    }

    #[test]
    fn relative_paths_are_unique_and_relative() {
        let tmp = setup_fixtures();
        let entries = scan(tmp.path(), &defaults()).unwrap();

        let mut seen = std::collections::HashSet::new();
        for e in &entries {
            assert!(!e.relative_path.starts_with('/'));
            assert!(!e.relative_path.contains('\\'));
            assert!(seen.insert(e.relative_path.clone()), "duplicate {}", e.relative_path);
        }
    }

    #[test]
    fn excluded_directory_prunes_subtree() {
        let tmp = TempDir::new().unwrap();
        write_files(
            tmp.path(),
            &["keep.md", "drafts/a.md", "drafts/deep/b.md", "guide/c.md"],
        );

        for show_folders in [true, false] {
            for recursive in [true, false] {
                let config = SidebarConfig {
                    exclude: vec!["drafts".to_string()],
                    show_folders,
                    recursive,
                    sort_by: SortBy::Name,
                };
                let entries = scan(tmp.path(), &config).unwrap();
                assert!(
                    entries.iter().all(|e| !e.relative_path.starts_with("drafts")),
                    "show_folders={show_folders} recursive={recursive}: {:?}",
                    relative_paths(&entries)
                );
            }
        }
    }

    #[test]
    fn wildcard_exclusion_on_nested_names() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &["notes.md", "guide/todo.draft.md", "guide/real.md"]);

        let config = SidebarConfig {
            exclude: vec!["*.draft.md".to_string()],
            ..SidebarConfig::default()
        };
        let entries = scan(tmp.path(), &config).unwrap();
        assert_eq!(
            relative_paths(&entries),
            vec!["guide", "notes.md", "guide/real.md"]
        );
    }

    #[test]
    fn hidden_folders_excluded_by_default_rules() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &["a.md", ".git/HEAD.md", "node_modules/pkg/readme.md"]);

        let entries = scan(tmp.path(), &SidebarConfig::default()).unwrap();
        assert_eq!(relative_paths(&entries), vec!["a.md"]);
    }

    #[test]
    fn show_folders_false_still_lists_nested_files() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &["guide/setup/install.md"]);

        let config = SidebarConfig {
            show_folders: false,
            ..defaults()
        };
        let entries = scan(tmp.path(), &config).unwrap();
        assert_eq!(relative_paths(&entries), vec!["guide/setup/install.md"]);
        assert_eq!(entries[0].depth, 2);
    }

    #[test]
    fn non_recursive_lists_direct_children_only() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &["a.md", "guide/b.md"]);

        let config = SidebarConfig {
            recursive: false,
            ..defaults()
        };
        let entries = scan(tmp.path(), &config).unwrap();
        assert_eq!(relative_paths(&entries), vec!["guide", "a.md"]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("missing"), &defaults());
        assert!(matches!(result, Err(ScanError::NotFound { .. })));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.md");
        std::fs::write(&file, "x").unwrap();
        let result = scan(&file, &defaults());
        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }

    #[test]
    fn repeated_scans_are_identical() {
        let tmp = setup_fixtures();
        for sort_by in [SortBy::Name, SortBy::Date, SortBy::Size] {
            let config = SidebarConfig {
                sort_by,
                ..defaults()
            };
            let first = scan(tmp.path(), &config).unwrap();
            let second = scan(tmp.path(), &config).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn fixture_scan_finds_expected_entries() {
        let tmp = setup_fixtures();
        let entries = scan(tmp.path(), &SidebarConfig::default()).unwrap();
        let names = relative_paths(&entries);

        assert!(names.contains(&"01-intro.md"));
        assert!(names.contains(&"guide"));
        assert!(names.contains(&"guide/03-advanced/tuning.md"));
        // Default rules drop the generated file and README.
        assert!(!names.contains(&"_sidebar.md"));
        assert!(!names.contains(&"README.md"));
        assert!(!names.iter().any(|n| n.ends_with(".txt")));
    }

    #[test]
    fn is_markdown_suffix_only() {
        assert!(is_markdown("a.md"));
        assert!(is_markdown("A.Md"));
        assert!(!is_markdown("a.mdx"));
        assert!(!is_markdown("md"));
    }
}
