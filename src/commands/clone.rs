use anyhow::{Result, bail};

use crate::cli::CloneOpts;
use crate::exec;
use crate::profiles::{Env, LinkOptions, Profile};
use crate::state::State;

/// Run the clone command: clone a repository into the profiles directory
/// and make it the current profile, optionally linking it right away.
///
/// # Errors
///
/// Returns an error if the destination exists, git fails, or the
/// follow-up link fails.
pub fn run(opts: &CloneOpts, dry_run: bool, env: &Env, state: &mut State) -> Result<()> {
    let name = opts
        .name
        .clone()
        .unwrap_or_else(|| crate::profiles::repo_basename(&opts.url));
    let profiles_dir = env.profiles_dir.clone();
    let location = profiles_dir.join(&name);

    if location.exists() {
        bail!("profile '{name}' already exists at {}", location.display());
    }

    if dry_run {
        println!("would clone {} into {}", opts.url, location.display());
        return Ok(());
    }

    std::fs::create_dir_all(&profiles_dir)?;
    let location_str = location.display().to_string();
    let status = exec::interactive(
        &profiles_dir,
        "git",
        &["clone", &opts.url, location_str.as_str()],
    )?;
    if !status.success() {
        bail!("git clone {} failed", opts.url);
    }

    state.current_profile = Some(location.clone());

    if opts.link {
        let profile = Profile::load(&location, env)?;
        let report = profile.link(env, LinkOptions::default())?;
        let conflicts = report.conflicts().count();
        if conflicts > 0 {
            bail!("cloned, but {conflicts} link target(s) were blocked");
        }
    }
    Ok(())
}
