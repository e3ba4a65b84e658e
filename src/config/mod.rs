//! Profile configuration (`.dfm.toml`) parsing.
//!
//! A profile is usable with no config file at all; `.dfm.toml` at the
//! profile root refines it: extra mapping rules, nested modules, lifecycle
//! hooks, and sync behavior.

pub mod paths;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Basename of the profile config file.
pub const CONFIG_FILE: &str = ".dfm.toml";

/// When a profile (or module) is linked relative to its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Linked before the parent's own files.
    Before,
    /// Linked after the parent's own files (the default).
    #[default]
    After,
    /// Never linked; still synced.
    None,
}

/// A single mapping rule as written in `.dfm.toml`.
///
/// `match` is a regular expression tested against the path relative to the
/// profile root. The first rule that matches decides the file's fate.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingSpec {
    /// Pattern matched against the profile-relative path.
    #[serde(rename = "match")]
    pub pattern: String,
    /// Omit matching paths entirely.
    #[serde(default)]
    pub skip: bool,
    /// Link the containing directory as a single unit.
    #[serde(default)]
    pub link_as_dir: bool,
    /// Redirect matching paths under this directory instead of `$HOME`.
    #[serde(default)]
    pub dest: Option<PathBuf>,
    /// Restrict the rule to these operating systems (case-insensitive).
    #[serde(default)]
    pub target_os: Vec<String>,
}

/// A hook as written in `.dfm.toml`: either a plain shell string or a
/// structured `{ interpreter, script }` table.
///
/// Any other shape is a decode error, not a silent skip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HookSpec {
    /// `"./install.sh --force"` — run via `sh -c`.
    Shell(String),
    /// `{ interpreter = "python3", script = "setup.py" }`.
    Script {
        interpreter: String,
        script: String,
    },
}

/// Hooks keyed by lifecycle event name.
pub type HookMap = BTreeMap<String, Vec<HookSpec>>;

/// A nested module: a profile linked and synced as part of its parent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleSpec {
    /// Clone URL; used to materialise the module when `location` is absent.
    #[serde(default, alias = "repository")]
    pub repo: Option<String>,
    /// Explicit working-tree location (defaults to the modules directory).
    #[serde(default)]
    pub location: Option<PathBuf>,
    /// Branch used by the sync reconciler.
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub link_mode: LinkMode,
    #[serde(default)]
    pub pull_only: bool,
    #[serde(default)]
    pub mappings: Vec<MappingSpec>,
    #[serde(default)]
    pub hooks: HookMap,
    /// Modules may nest further modules.
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

/// The `.dfm.toml` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    /// Subdirectory inside the profile treated as the dotfile root.
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
    /// Branch used by the sync reconciler (defaults to the checked-out branch).
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub link_mode: LinkMode,
    /// Sync never commits or pushes; it only pulls.
    #[serde(default)]
    pub pull_only: bool,
    /// Ask for a commit message interactively when syncing dirty profiles.
    #[serde(default)]
    pub prompt_for_commit_message: bool,
    #[serde(default)]
    pub mappings: Vec<MappingSpec>,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    #[serde(default)]
    pub hooks: HookMap,
}

impl ProfileConfig {
    /// Load the config file from a profile location.
    ///
    /// A missing `.dfm.toml` yields the default config — every directory is
    /// a valid profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(location: &Path) -> Result<Self, ConfigError> {
        let file = location.join(CONFIG_FILE);
        let contents = match std::fs::read_to_string(&file) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io { path: file, source: e }),
        };

        toml::from_str(&contents).map_err(|e| ConfigError::Invalid {
            file,
            message: e.to_string(),
        })
    }
}
