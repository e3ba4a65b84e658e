//! Top-level subcommand orchestration.
//!
//! Each command receives the detected [`Env`] and the explicit [`State`]
//! object; nothing here reads or writes ambient globals. `main` persists
//! the state once the command returns.

pub mod add;
pub mod clean;
pub mod clone;
pub mod init;
pub mod link;
pub mod list;
pub mod run_hook;
pub mod sync;
pub mod where_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::ConfigError;
use crate::profiles::{Env, Profile};
use crate::state::State;

/// Resolve and load the profile a command should operate on: an explicit
/// name or path when given, otherwise the current profile from state.
///
/// # Errors
///
/// Returns an error if no profile can be resolved or loading fails.
pub fn resolve_profile(name: Option<&str>, state: &State, env: &Env) -> Result<Profile> {
    let location = match name {
        Some(name) => named_profile_location(name, env)?,
        None => state.require_current()?.to_path_buf(),
    };
    Profile::load(&location, env)
}

/// Turn a profile argument into a location: an existing directory path is
/// used as-is, anything else is looked up in the profiles directory.
fn named_profile_location(name: &str, env: &Env) -> Result<PathBuf, ConfigError> {
    let as_path = Path::new(name);
    if as_path.is_dir() {
        return Ok(as_path.to_path_buf());
    }
    let candidate = env.profiles_dir.join(name);
    if candidate.is_dir() {
        return Ok(candidate);
    }
    Err(ConfigError::UnknownProfile(name.to_string()))
}
