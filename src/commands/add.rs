use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::AddOpts;
use crate::profiles::{Env, LinkOptions};
use crate::state::State;

/// Run the add command: move files from the home directory into the
/// current profile, then re-link so symlinks take their place.
///
/// # Errors
///
/// Returns an error if a file is outside the home directory, the move
/// fails, or the subsequent link fails.
pub fn run(opts: &AddOpts, dry_run: bool, env: &Env, state: &State) -> Result<()> {
    let profile = super::resolve_profile(None, state, env)?;

    for file in &opts.files {
        let abs = dunce::canonicalize(file)
            .with_context(|| format!("resolving {}", file.display()))?;
        let rel = abs.strip_prefix(&env.home).with_context(|| {
            format!(
                "{} is not under the home directory, cannot add it",
                abs.display()
            )
        })?;

        let dest = profile.dotfiles_root().join(strip_leading_dot(rel));
        if dry_run {
            println!("would move {} -> {}", abs.display(), dest.display());
            continue;
        }

        tracing::debug!("moving {} -> {}", abs.display(), dest.display());
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        move_into_profile(&abs, &dest)?;
    }

    let report = profile.link(env, LinkOptions {
        overwrite: false,
        dry_run,
    })?;
    if !report.is_clean() {
        anyhow::bail!("added files moved, but some link targets were blocked");
    }
    Ok(())
}

/// Strip the leading dot from the first path segment, the inverse of the
/// planner's dot rule: `.bashrc` is stored as `bashrc`, `.config/foo` as
/// `config/foo`.
fn strip_leading_dot(rel: &Path) -> PathBuf {
    let mut components = rel.components();
    let Some(first) = components.next() else {
        return rel.to_path_buf();
    };
    let name = first.as_os_str().to_string_lossy();
    let head = name.strip_prefix('.').unwrap_or(&name).to_string();
    let mut out = PathBuf::from(head);
    out.push(components.as_path());
    out
}

/// Move a file, falling back to copy+remove when rename crosses a
/// filesystem boundary.
fn move_into_profile(from: &Path, to: &Path) -> Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) if from.is_file() => {
            std::fs::copy(from, to)
                .with_context(|| format!("copying {} to {}", from.display(), to.display()))?;
            std::fs::remove_file(from)
                .with_context(|| format!("removing {}", from.display()))?;
            Ok(())
        }
        Err(e) => {
            Err(e).with_context(|| format!("moving {} to {}", from.display(), to.display()))
        }
    }
}
