use std::path::Path;

use anyhow::{Context as _, Result};

use crate::profiles::Env;

/// Run the clean command: remove dead symlinks directly under `$HOME` and
/// `$XDG_CONFIG_HOME` that point into the managed dfm directory.
///
/// Links pointing anywhere else are left alone, even when broken — they
/// are not ours to remove.
///
/// # Errors
///
/// Returns an error if a directory cannot be read or a dead link cannot
/// be removed.
pub fn run(dry_run: bool, env: &Env) -> Result<()> {
    let managed_root = env.xdg_config.join("dfm");

    for dir in [&env.home, &env.xdg_config] {
        clean_dead_links(dir, &managed_root, dry_run)?;
    }
    Ok(())
}

/// Remove broken symlinks in `dir` (non-recursive) whose recorded target
/// is under `managed_root` and no longer exists.
fn clean_dead_links(dir: &Path, managed_root: &Path, dry_run: bool) -> Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", dir.display())),
    };

    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        let Ok(meta) = path.symlink_metadata() else {
            continue;
        };
        if !meta.is_symlink() {
            continue;
        }

        let dest = std::fs::read_link(&path)
            .with_context(|| format!("reading link {}", path.display()))?;
        let dest = if dest.is_absolute() {
            dest
        } else {
            dir.join(dest)
        };

        if !dest.starts_with(managed_root) || dest.exists() {
            continue;
        }

        if dry_run {
            println!("would remove dead link {}", path.display());
            continue;
        }
        println!("Removing {}", path.display());
        std::fs::remove_file(&path)
            .with_context(|| format!("removing {}", path.display()))?;
    }
    Ok(())
}
