use anyhow::{Result, bail};

use crate::cli::InitOpts;
use crate::exec;
use crate::profiles::Env;
use crate::state::State;

/// Run the init command: create an empty profile directory, `git init`
/// it, and make it the current profile.
///
/// # Errors
///
/// Returns an error if the profile already exists or git fails.
pub fn run(opts: &InitOpts, dry_run: bool, env: &Env, state: &mut State) -> Result<()> {
    let location = env.profiles_dir.join(&opts.name);
    if location.exists() {
        bail!("profile '{}' already exists at {}", opts.name, location.display());
    }

    if dry_run {
        println!("would create profile at {}", location.display());
        return Ok(());
    }

    std::fs::create_dir_all(&location)?;
    let status = exec::interactive(&location, "git", &["init"])?;
    if !status.success() {
        bail!("git init failed in {}", location.display());
    }

    state.current_profile = Some(location.clone());
    println!("Created profile at {}", location.display());
    Ok(())
}
