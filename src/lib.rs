//! # docsify-helper
//!
//! Generates the `_sidebar.md` navigation file for a [docsify](https://docsify.js.org)
//! site from a directory of Markdown files, and deploys the result with git
//! or Cloudflare Pages. The docs directory is the data source: files become
//! links, folders become bold headings, and numeric filename prefixes
//! control order without showing up in labels.
//!
//! # Architecture: One Pipeline
//!
//! ```text
//! 1. Scan       docs/        →  Vec<Entry>     (filtered, ordered filesystem listing)
//! 2. Structure  Vec<Entry>   →  SidebarNode    (nested tree keyed by path segment)
//! 3. Render     SidebarNode  →  String         (Markdown link list)
//! 4. Write      String       →  _sidebar.md    (atomic replace)
//! ```
//!
//! Each stage is a plain function over owned data. Only the first and last
//! touch the filesystem, so ordering, structure and rendering are tested
//! without a docs tree on disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the docs directory and produces the flat entry list |
//! | [`exclude`] | Literal and wildcard exclusion rules |
//! | [`order`] | Depth, folder-first, sort key, then name ordering |
//! | [`tree`] | Folds the entry list into the sidebar hierarchy |
//! | [`naming`] | Display labels from file and folder names |
//! | [`render`] | Markdown output with percent-encoded links |
//! | [`generate`] | Runs the pipeline and writes `_sidebar.md` |
//! | [`deploy`] | git and Cloudflare Pages deployment |
//! | [`config`] | `docsify-helper.toml` loading, merging and validation |
//! | [`output`] | CLI report formatting |
//!
//! # Labels and Ordering
//!
//! `01-intro.md` is listed as `Intro` and links to `01-intro.md`. The prefix
//! only affects position: entries sort by name, and digits sort before
//! letters. See [`naming::parse_entry_name`] for the exact rules.

pub mod config;
pub mod deploy;
pub mod exclude;
pub mod generate;
pub mod naming;
pub mod order;
pub mod output;
pub mod render;
pub mod scan;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
