use anyhow::Result;

use crate::cli::RunHookOpts;
use crate::profiles::Env;
use crate::state::State;

/// Run a named hook of the current profile.
///
/// # Errors
///
/// Returns an error if no profile is current or the hook fails.
pub fn run(opts: &RunHookOpts, dry_run: bool, env: &Env, state: &State) -> Result<()> {
    let profile = super::resolve_profile(None, state, env)?;
    profile.run_hook(&opts.name, dry_run)
}
