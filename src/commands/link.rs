use anyhow::{Result, bail};

use crate::cli::LinkOpts;
use crate::profiles::{Env, LinkOptions};
use crate::state::State;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if the profile cannot be loaded, a hook or filesystem
/// operation fails, or any link target was blocked (conflicts make the
/// whole command exit non-zero even though the other links were created).
pub fn run(opts: &LinkOpts, dry_run: bool, env: &Env, state: &mut State) -> Result<()> {
    let profile = super::resolve_profile(opts.profile.as_deref(), state, env)?;
    tracing::debug!("linking profile {} from {}", profile.name(), profile.location().display());

    let report = profile.link(
        env,
        LinkOptions {
            overwrite: opts.overwrite,
            dry_run,
        },
    )?;

    let conflicts = report.conflicts().count();
    let linked = report.linked_sources().len();
    tracing::info!("{linked} links processed, {conflicts} blocked");

    // The profile becomes current only after a fully clean run.
    if !dry_run && conflicts == 0 {
        state.current_profile = Some(profile.location().to_path_buf());
    }

    if conflicts > 0 {
        bail!("{conflicts} link target(s) blocked; rerun with --overwrite to replace them");
    }
    Ok(())
}
