//! Display labels for sidebar entries.
//!
//! Files and folders are often named with an ordinal prefix to force an
//! order on disk (`01-intro.md`, `2. setup.md`, `03 - api`). The sidebar
//! shows them without the prefix:
//!
//! - `01-getting_started` → "Getting started"
//! - `2. setup` → "Setup"
//! - `api` → "Api"
//! - `My Notes` → "My Notes" (only the first character is touched)
//!
//! Sorting never looks at labels; it always uses the raw file name.

/// Result of parsing an entry name like `01-getting_started`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Ordinal digits if the name starts with `digits` followed by `.` or `-`.
    pub ordinal: Option<String>,
    /// Name with the ordinal prefix removed, otherwise untouched.
    pub name: String,
    /// Label shown in the sidebar.
    pub display_title: String,
}

/// Parse an entry name (file stem or folder name).
///
/// The ordinal prefix is `digits`, optional whitespace, `.` or `-`, optional
/// whitespace. A bare number (`2024`) or digits followed by anything else
/// (`3d-models`) is not a prefix.
pub fn parse_entry_name(name: &str) -> ParsedName {
    let (ordinal, rest) = match split_ordinal(name) {
        Some((digits, rest)) => (Some(digits.to_string()), rest),
        None => (None, name),
    };
    let display_title = capitalize_first(rest.replace(['_', '-'], " ").trim());
    ParsedName {
        ordinal,
        name: rest.to_string(),
        display_title,
    }
}

/// Sidebar label for a Markdown file name: `.md` dropped, then [`parse_entry_name`].
///
/// Falls back to the stem when stripping leaves nothing (`01-.md`).
pub fn file_label(file_name: &str) -> String {
    let stem = strip_md_extension(file_name);
    let parsed = parse_entry_name(stem);
    if parsed.display_title.is_empty() {
        stem.to_string()
    } else {
        parsed.display_title
    }
}

/// Sidebar label for a folder name.
pub fn folder_label(dir_name: &str) -> String {
    let parsed = parse_entry_name(dir_name);
    if parsed.display_title.is_empty() {
        dir_name.to_string()
    } else {
        parsed.display_title
    }
}

/// Remove a trailing `.md` in any letter case.
pub fn strip_md_extension(file_name: &str) -> &str {
    let len = file_name.len();
    if len >= 3
        && file_name.is_char_boundary(len - 3)
        && file_name[len - 3..].eq_ignore_ascii_case(".md")
    {
        &file_name[..len - 3]
    } else {
        file_name
    }
}

fn split_ordinal(name: &str) -> Option<(&str, &str)> {
    let digits_end = name
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    if digits_end == 0 {
        return None;
    }
    let after_digits = name[digits_end..].trim_start();
    let rest = after_digits
        .strip_prefix('.')
        .or_else(|| after_digits.strip_prefix('-'))?;
    Some((&name[..digits_end], rest.trim_start()))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
