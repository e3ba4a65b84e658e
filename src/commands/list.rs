use anyhow::{Context as _, Result};

use crate::profiles::Env;
use crate::state::State;

/// Run the list command: print the profiles in the profiles directory,
/// marking the current one.
///
/// # Errors
///
/// Returns an error if the profiles directory exists but cannot be read.
pub fn run(env: &Env, state: &State) -> Result<()> {
    let dir = env.profiles_dir.clone();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", dir.display())),
    };

    let mut names: Vec<(String, bool)> = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        if !entry.path().is_dir() {
            continue;
        }
        let current = state.current_profile.as_deref() == Some(entry.path().as_path());
        names.push((entry.file_name().to_string_lossy().into_owned(), current));
    }
    names.sort();

    for (name, current) in names {
        if current {
            println!("{name} (current)");
        } else {
            println!("{name}");
        }
    }
    Ok(())
}
