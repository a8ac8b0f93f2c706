//! Sidebar generation pipeline.
//!
//! One call runs every stage in order and owns everything it builds:
//!
//! ```text
//! docs_dir ─scan─▶ Vec<Entry> ─build_tree─▶ SidebarNode ─render─▶ String ─write─▶ _sidebar.md
//! ```
//!
//! Nothing is shared between calls, so generating for two different docs
//! roots at the same time is safe. The output file is written through a
//! temporary file in the output directory and renamed into place: either
//! the complete sidebar lands or the previous file is left untouched. A
//! scan failure writes nothing.

use crate::config::{SidebarConfig, SiteConfig};
use crate::render::render_sidebar;
use crate::scan::{self, Entry, ScanError};
use crate::tree::{SidebarNode, build_tree};
use chrono::{Local, NaiveDateTime};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the generated navigation file.
pub const SIDEBAR_FILENAME: &str = "_sidebar.md";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// In-memory result of the scan → structure → render stages.
#[derive(Debug, Clone)]
pub struct Sidebar {
    /// Ordered entries as scanned.
    pub entries: Vec<Entry>,
    pub tree: SidebarNode,
    /// Rendered `_sidebar.md` content.
    pub content: String,
}

impl Sidebar {
    pub fn file_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_dir).count()
    }

    pub fn folder_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_dir).count()
    }
}

/// What a successful generation reports back.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub output_path: PathBuf,
    pub file_count: usize,
    pub folder_count: usize,
    /// Ordered entries, kept for reporting.
    pub entries: Vec<Entry>,
}

/// Scan, structure and render without touching the output directory.
pub fn build_sidebar(
    docs_dir: &Path,
    config: &SidebarConfig,
    generated_at: NaiveDateTime,
) -> Result<Sidebar, ScanError> {
    let entries = scan::scan(docs_dir, config)?;
    let tree = build_tree(&entries);
    let content = render_sidebar(&tree, generated_at);
    Ok(Sidebar {
        entries,
        tree,
        content,
    })
}

/// Generate `_sidebar.md` for `config`, stamped with the current local time.
pub fn generate(config: &SiteConfig) -> Result<GenerateResult, GenerateError> {
    generate_at(config, Local::now().naive_local())
}

/// Generate `_sidebar.md` with an explicit timestamp.
pub fn generate_at(
    config: &SiteConfig,
    generated_at: NaiveDateTime,
) -> Result<GenerateResult, GenerateError> {
    tracing::info!(docs_dir = %config.docs_dir.display(), "generating sidebar");
    let sidebar = build_sidebar(&config.docs_dir, &config.sidebar, generated_at)?;
    let output_path = write_sidebar(&config.output_dir, &sidebar.content)?;

    let result = GenerateResult {
        output_path,
        file_count: sidebar.file_count(),
        folder_count: sidebar.folder_count(),
        entries: sidebar.entries,
    };
    tracing::info!(
        path = %result.output_path.display(),
        files = result.file_count,
        folders = result.folder_count,
        "wrote sidebar"
    );
    Ok(result)
}

/// Atomically replace `<output_dir>/_sidebar.md` with `content`.
///
/// An existing sidebar keeps its permissions. A new one is created
/// world-readable (`0o644` before umask on Unix).
pub fn write_sidebar(output_dir: &Path, content: &str) -> Result<PathBuf, GenerateError> {
    let output_path = output_dir.join(SIDEBAR_FILENAME);
    let write_err = |source: std::io::Error| GenerateError::Write {
        path: output_path.clone(),
        source,
    };

    std::fs::create_dir_all(output_dir).map_err(write_err)?;
    let previous = std::fs::metadata(&output_path).ok().map(|m| m.permissions());

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(output_dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    if let Some(permissions) = previous {
        tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&output_path).map_err(|e| write_err(e.error))?;
    Ok(output_path)
}
