use anyhow::Result;

use crate::cli::SyncOpts;
use crate::profiles::{Env, SyncOptions};
use crate::state::State;

/// Run the sync command against the current profile.
///
/// # Errors
///
/// Returns an error if no profile is current, a hook fails, or any git
/// invocation exits non-zero.
pub fn run(opts: &SyncOpts, env: &Env, state: &State) -> Result<()> {
    let profile = super::resolve_profile(None, state, env)?;
    tracing::debug!("syncing profile {}", profile.name());

    profile.sync(&SyncOptions {
        message: opts.message.clone(),
        skip_modules: opts.skip_modules,
    })
}
