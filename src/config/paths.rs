//! Application directories.
//!
//! dfm keeps its own data under the XDG base directories: profiles and
//! modules under the config home, the state file under the state home.
//! Resolution is done from environment variables directly; the pure
//! `*_from` helpers exist so the fallback logic is testable without
//! mutating the process environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The user's home directory.
///
/// # Errors
///
/// Returns an error if `HOME` (or `USERPROFILE` on Windows) is not set.
pub fn home() -> Result<PathBuf, ConfigError> {
    let var = if cfg!(windows) {
        std::env::var_os("USERPROFILE").or_else(|| std::env::var_os("HOME"))
    } else {
        std::env::var_os("HOME")
    };
    var.map(PathBuf::from).ok_or_else(|| ConfigError::Invalid {
        file: PathBuf::from("<environment>"),
        message: "HOME environment variable is not set".to_string(),
    })
}

/// `$XDG_CONFIG_HOME`, defaulting to `~/.config`.
#[must_use]
pub fn xdg_config_home(home: &Path) -> PathBuf {
    config_home_from(std::env::var_os("XDG_CONFIG_HOME"), home)
}

/// `$XDG_STATE_HOME`, defaulting to `~/.local/state`.
#[must_use]
pub fn xdg_state_home(home: &Path) -> PathBuf {
    state_home_from(std::env::var_os("XDG_STATE_HOME"), home)
}

/// Directory holding named profiles (`<config home>/dfm/profiles`).
#[must_use]
pub fn profiles_dir(home: &Path) -> PathBuf {
    xdg_config_home(home).join("dfm").join("profiles")
}

/// Directory holding cloned modules (`<config home>/dfm/modules`).
#[must_use]
pub fn modules_dir(home: &Path) -> PathBuf {
    xdg_config_home(home).join("dfm").join("modules")
}

/// The process-wide state file (`<state home>/dfm/state.json`).
#[must_use]
pub fn state_file(home: &Path) -> PathBuf {
    xdg_state_home(home).join("dfm").join("state.json")
}

fn config_home_from(xdg: Option<OsString>, home: &Path) -> PathBuf {
    match xdg {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home.join(".config"),
    }
}

fn state_home_from(xdg: Option<OsString>, home: &Path) -> PathBuf {
    match xdg {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home.join(".local").join("state"),
    }
}
