//! Markdown rendering of the sidebar tree.
//!
//! ## Output Format
//!
//! ```text
//! <!-- Generated by docsify-helper. Do not edit by hand. -->
//! <!-- Generated at: 2024-05-01 09:30:00 -->
//!
//! [HOME](/)
//!
//! - [Intro](01-intro.md)
//! - [Guide](guide.md)
//! - **Api**
//!   - [Endpoints](api/endpoints.md)
//!   - **V2**
//!     - [Auth](api/v2/auth.md)
//! ```
//!
//! At each level the folder's own files come first, in scan order, then
//! its subfolders sorted by name. Indentation is two spaces per level.
//! Link targets percent-encode each path segment on its own and join them
//! with `/`.
//!
//! Rendering is pure: the timestamp is an argument, so the same tree and
//! the same timestamp always give the same bytes.

use crate::naming::{file_label, folder_label};
use crate::order::compare_names;
use crate::tree::SidebarNode;
use chrono::NaiveDateTime;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// First line of every generated sidebar.
pub const GENERATED_MARKER: &str = "<!-- Generated by docsify-helper. Do not edit by hand. -->";

/// Timestamp format used in the header comment.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Bytes left unescaped in a link segment: ASCII alphanumerics and
/// `- _ . ! ~ * ' ( )`, the same set a browser's `encodeURIComponent` keeps.
const LINK_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Render the complete `_sidebar.md` content.
pub fn render_sidebar(tree: &SidebarNode, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_MARKER);
    out.push('\n');
    out.push_str(&format!(
        "<!-- Generated at: {} -->\n",
        generated_at.format(TIMESTAMP_FORMAT)
    ));
    out.push('\n');
    out.push_str("[HOME](/)\n\n");
    out.push_str(&render_body(tree));
    out
}

/// Render the link list only, without the header.
pub fn render_body(tree: &SidebarNode) -> String {
    let mut out = String::new();
    render_node(tree, 0, &mut out);
    out
}

fn render_node(node: &SidebarNode, level: usize, out: &mut String) {
    let indent = indent(level);

    for file in &node.files {
        out.push_str(&format!(
            "{indent}- [{}]({})\n",
            file_label(&file.name),
            encode_link_path(&file.relative_path)
        ));
    }

    let mut folders: Vec<&SidebarNode> = node.children.values().collect();
    folders.sort_by(|a, b| compare_names(&a.name, &b.name));

    for folder in folders {
        out.push_str(&format!("{indent}- **{}**\n", folder_label(&folder.name)));
        render_node(folder, level + 1, out);
    }
}

/// Two spaces per depth level.
fn indent(level: usize) -> String {
    "  ".repeat(level)
}

/// Percent-encode each `/`-separated segment independently.
///
/// `guide/My Notes.md` → `guide/My%20Notes.md`
pub fn encode_link_path(relative_path: &str) -> String {
    relative_path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, LINK_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
