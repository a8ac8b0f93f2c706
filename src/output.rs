//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Folders
//!     api
//!     api/v2
//!
//! Files
//!     01-intro.md (0.1KB, 2024-05-01 09:30)
//!     api/endpoints.md (1.2KB, 2024-04-28 17:02)
//!
//! Excluded
//!     _sidebar.md
//!     node_modules
//!
//! Settings
//!     show_folders: true
//!     recursive: true
//!     sort_by: name
//!
//! Sidebar → docs/_sidebar.md
//! Listed 2 files, 2 folders
//! ```
//!
//! ## Check / Deploy
//!
//! ```text
//! git environment ok (git)
//! Commit: docs: update 2024-05-01 09:30:00
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::{SidebarConfig, SiteConfig};
use crate::deploy::DeployReport;
use crate::generate::GenerateResult;
use crate::scan::Entry;
use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Size in kilobytes with one decimal.
fn format_size(bytes: u64) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}

/// Local `YYYY-MM-DD HH:MM`.
fn format_modified(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// One file line: relative path plus size and mtime when known.
fn file_line(entry: &Entry) -> String {
    let details: Vec<String> = entry
        .size
        .map(format_size)
        .into_iter()
        .chain(entry.modified.map(format_modified))
        .collect();
    if details.is_empty() {
        format!("{}{}", indent(1), entry.relative_path)
    } else {
        format!(
            "{}{} ({})",
            indent(1),
            entry.relative_path,
            details.join(", ")
        )
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the scan inventory: folders, files, exclusion rules, settings.
pub fn format_scan_output(entries: &[Entry], sidebar: &SidebarConfig) -> Vec<String> {
    let mut lines = Vec::new();

    let folders: Vec<&Entry> = entries.iter().filter(|e| e.is_dir).collect();
    if !folders.is_empty() {
        lines.push("Folders".to_string());
        for folder in folders {
            lines.push(format!("{}{}", indent(1), folder.relative_path));
        }
        lines.push(String::new());
    }

    lines.push("Files".to_string());
    let files: Vec<&Entry> = entries.iter().filter(|e| !e.is_dir).collect();
    if files.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for file in files {
        lines.push(file_line(file));
    }

    if !sidebar.exclude.is_empty() {
        lines.push(String::new());
        lines.push("Excluded".to_string());
        for rule in &sidebar.exclude {
            lines.push(format!("{}{}", indent(1), rule));
        }
    }

    lines.push(String::new());
    lines.push("Settings".to_string());
    lines.push(format!("{}show_folders: {}", indent(1), sidebar.show_folders));
    lines.push(format!("{}recursive: {}", indent(1), sidebar.recursive));
    lines.push(format!("{}sort_by: {}", indent(1), sidebar.sort_by));

    lines
}

/// Format the closing summary of a generate run.
pub fn format_generate_summary(result: &GenerateResult) -> Vec<String> {
    let files = match result.file_count {
        1 => "1 file".to_string(),
        n => format!("{n} files"),
    };
    let folders = match result.folder_count {
        1 => "1 folder".to_string(),
        n => format!("{n} folders"),
    };
    vec![
        format!("Sidebar \u{2192} {}", result.output_path.display()),
        format!("Listed {files}, {folders}"),
    ]
}

/// Print the scan inventory and summary to stdout.
pub fn print_generate_output(result: &GenerateResult, sidebar: &SidebarConfig) {
    for line in format_scan_output(&result.entries, sidebar) {
        println!("{}", line);
    }
    println!();
    for line in format_generate_summary(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Check / Deploy
// ============================================================================

pub fn format_deploy_report(report: &DeployReport) -> Vec<String> {
    let mut lines = vec![report.message.clone()];
    if let Some(message) = &report.commit_message {
        lines.push(format!("Commit: {}", message));
    }
    if let Some(output) = report.output.as_deref().filter(|o| !o.is_empty()) {
        lines.extend(output.lines().map(|l| format!("{}{}", indent(1), l)));
    }
    lines
}

pub fn print_deploy_report(report: &DeployReport) {
    for line in format_deploy_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Config
// ============================================================================

/// Effective configuration as pretty-printed JSON.
pub fn format_config(config: &SiteConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(config)
}
