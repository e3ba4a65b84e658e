//! Lifecycle hook execution.
//!
//! Hooks are named lists of commands from `.dfm.toml`, run with the
//! profile location as working directory and inherited stdio. Link and
//! sync bracket themselves with `before_*`/`after_*` events; any other
//! name can be run on demand with `dfm run-hook`.

use std::path::Path;

use crate::config::{HookMap, HookSpec};
use crate::error::HookError;
use crate::exec;

/// Run every hook registered under `name`, in order, stopping at the
/// first failure.
///
/// An event with no hooks is a no-op; hooks are a pre-condition gate only
/// when they exist.
///
/// # Errors
///
/// Returns an error if a hook is malformed, cannot be spawned, or exits
/// non-zero.
pub fn run(hooks: &HookMap, name: &str, dir: &Path, dry_run: bool) -> Result<(), HookError> {
    let Some(specs) = hooks.get(name) else {
        tracing::debug!("no hook defined for: {name}");
        return Ok(());
    };

    for spec in specs {
        let (program, args) = command_line(name, spec)?;
        if dry_run {
            println!("would run hook {name}: {program} {}", args.join(" "));
            continue;
        }

        tracing::debug!("running hook {name}: {program} {args:?}");
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let status = exec::interactive(dir, &program, &arg_refs).map_err(|e| HookError::Spawn {
            name: name.to_string(),
            source: e,
        })?;

        if !status.success() {
            return Err(HookError::Failed {
                name: name.to_string(),
                status: status.code().unwrap_or(-1),
            });
        }
    }

    Ok(())
}

/// Turn a hook spec into a program and argument list.
fn command_line(name: &str, spec: &HookSpec) -> Result<(String, Vec<String>), HookError> {
    match spec {
        HookSpec::Shell(command) => {
            if cfg!(windows) {
                Ok(("cmd".to_string(), vec!["/C".to_string(), command.clone()]))
            } else {
                Ok(("sh".to_string(), vec!["-c".to_string(), command.clone()]))
            }
        }
        HookSpec::Script {
            interpreter,
            script,
        } => {
            let mut parts = shell_words::split(interpreter).map_err(|e| HookError::Malformed {
                name: name.to_string(),
                message: format!("interpreter '{interpreter}': {e}"),
            })?;
            if parts.is_empty() {
                return Err(HookError::Malformed {
                    name: name.to_string(),
                    message: "interpreter is empty".to_string(),
                });
            }
            let program = parts.remove(0);
            parts.push(script.clone());
            Ok((program, parts))
        }
    }
}
