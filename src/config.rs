//! Tool configuration module.
//!
//! Handles loading, validating, and merging the `docsify-helper.toml` file.
//! The user file is sparse: it is merged key-by-key on top of the stock
//! defaults, so it only needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! docs_dir = "./docs"        # Directory scanned for Markdown files
//! output_dir = "./docs"      # Directory receiving _sidebar.md
//!
//! [sidebar]
//! exclude = ["_sidebar.md", "README.md", ".git", "node_modules"]
//! show_folders = true        # Emit bold headings for folders
//! recursive = true           # Descend into subdirectories
//! sort_by = "name"           # name | date | size
//!
//! [deployment]
//! kind = "git"               # git | cloudflare
//!
//! [deployment.git]
//! executable_path = ""       # Empty = `git` from PATH
//! remote_url = ""            # Push only happens when set
//! branch = "main"
//! commit_message = "docs: update {{date}}"
//!
//! [deployment.cloudflare]
//! wrangler_path = ""         # Empty = `wrangler` from PATH
//! project_name = ""
//! account_id = ""
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "docsify-helper.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full tool configuration.
///
/// All fields have defaults; unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory scanned for Markdown files.
    pub docs_dir: PathBuf,
    /// Directory that receives `_sidebar.md` (created if missing).
    pub output_dir: PathBuf,
    /// Sidebar generation policy.
    pub sidebar: SidebarConfig,
    /// Deployment target settings.
    pub deployment: DeploymentConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("./docs"),
            output_dir: PathBuf::from("./docs"),
            sidebar: SidebarConfig::default(),
            deployment: DeploymentConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate that the required paths are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.docs_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("docs_dir must not be empty".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// How the sidebar is built from the docs tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// Exclusion patterns: literal (exact or substring) or wildcard (`*`, `?`).
    pub exclude: Vec<String>,
    /// Record directories as entries and render them as bold headings.
    pub show_folders: bool,
    /// Descend into subdirectories. When false only the root is listed.
    pub recursive: bool,
    /// Tertiary sort key applied after depth and type.
    pub sort_by: SortBy,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            exclude: [
                "_sidebar.md",
                "README.md",
                ".DS_Store",
                "Thumbs.db",
                ".git",
                "node_modules",
                ".obsidian",
                ".vscode",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            show_folders: true,
            recursive: true,
            sort_by: SortBy::Name,
        }
    }
}

/// Tertiary ordering key for scanned entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Name comparison.
    #[default]
    Name,
    /// Modification time, newest first.
    Date,
    /// File size, largest first.
    Size,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Name => "name",
            SortBy::Date => "date",
            SortBy::Size => "size",
        })
    }
}

/// Which deployment executor runs after generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentKind {
    #[default]
    Git,
    Cloudflare,
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeploymentKind::Git => "git",
            DeploymentKind::Cloudflare => "cloudflare",
        })
    }
}

/// Deployment settings for both supported targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploymentConfig {
    pub kind: DeploymentKind,
    pub git: GitConfig,
    pub cloudflare: CloudflareConfig,
}

/// Git push deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Path to the git executable. Empty means `git` from `PATH`.
    pub executable_path: String,
    /// Remote URL. The push step is skipped when empty.
    pub remote_url: String,
    /// Branch pushed to `origin`.
    pub branch: String,
    /// Commit message template. Supports `{{date}}`, `{{dateShort}}`,
    /// `{{time}}` and `{{timestamp}}`.
    pub commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            executable_path: String::new(),
            remote_url: String::new(),
            branch: "main".to_string(),
            commit_message: "docs: update {{date}}".to_string(),
        }
    }
}

/// Cloudflare Pages deployment through the `wrangler` CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudflareConfig {
    /// Path to the wrangler executable. Empty means `wrangler` from `PATH`.
    pub wrangler_path: String,
    pub project_name: String,
    pub account_id: String,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   `exclude` list in the user file replaces the default list.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, merged over stock defaults.
///
/// A missing file is [`ConfigError::NotFound`]; callers decide whether an
/// absent file means "use defaults".
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    let config = resolve_config(stock_defaults_value()?, Some(overlay))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write the stock config to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, stock_config_toml())?;
    Ok(())
}

/// Returns a fully-commented stock config file with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# docsify-helper configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory scanned for Markdown files.
docs_dir = "./docs"

# Directory that receives the generated _sidebar.md (created if missing).
output_dir = "./docs"

# ---------------------------------------------------------------------------
# Sidebar generation
# ---------------------------------------------------------------------------
[sidebar]
# Entries matching any rule are skipped, and excluded folders are not
# descended into. A rule without wildcards matches an exact name or any
# path containing it; `*` and `?` make it a case-insensitive wildcard.
exclude = [
    "_sidebar.md",
    "README.md",
    ".DS_Store",
    "Thumbs.db",
    ".git",
    "node_modules",
    ".obsidian",
    ".vscode",
]

# Render folders as bold headings.
show_folders = true

# Descend into subdirectories.
recursive = true

# Ordering inside each level: "name", "date" (newest first) or "size"
# (largest first). Folders always come before files.
sort_by = "name"

# ---------------------------------------------------------------------------
# Deployment
# ---------------------------------------------------------------------------
[deployment]
# "git" commits and pushes output_dir; "cloudflare" runs wrangler pages deploy.
kind = "git"

[deployment.git]
# Leave empty to use `git` from PATH.
executable_path = ""
# Push to origin only happens when this is set.
remote_url = ""
branch = "main"
# Placeholders: {{date}}, {{dateShort}}, {{time}}, {{timestamp}}
commit_message = "docs: update {{date}}"

[deployment.cloudflare]
# Leave empty to use `wrangler` from PATH.
wrangler_path = ""
project_name = ""
account_id = ""
"##
}
