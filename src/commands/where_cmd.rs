use anyhow::Result;

use crate::profiles::Env;
use crate::state::State;

/// Run the where command: print the current profile's location.
///
/// # Errors
///
/// Returns an error if no profile is current or it cannot be loaded.
pub fn run(env: &Env, state: &State) -> Result<()> {
    let profile = super::resolve_profile(None, state, env)?;
    println!("{}", profile.where_location().display());
    Ok(())
}
