//! The sync reconciler: absorb remote history and publish local edits,
//! one profile at a time, without ever resolving content conflicts itself.
//!
//! The cycle per profile is: dirty check, commit (when dirty), rebase
//! pull, push (only when the profile was dirty). Pulling happens even for
//! clean profiles so the working tree stays current; clean profiles are
//! never pushed. Git failures are human-actionable (conflicts, auth) and
//! surface immediately — nothing is retried.

use std::io::Write as _;

use anyhow::Result;

use super::Profile;
use crate::error::GitError;
use crate::exec;

/// Commit message used when none is supplied and prompting is off.
const DEFAULT_COMMIT_MESSAGE: &str = "Update dotfiles";

/// Options for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Commit message for local changes; wins over prompting.
    pub message: Option<String>,
    /// Reconcile only this profile, not its modules.
    pub skip_modules: bool,
}

impl Profile {
    /// Reconcile this profile (and, by default, its modules) with its
    /// remote.
    ///
    /// # Errors
    ///
    /// Returns an error if a hook fails or any git invocation exits
    /// non-zero.
    pub fn sync(&self, opts: &SyncOptions) -> Result<()> {
        self.run_hook_internal("before_sync", false)?;

        if self.pull_only {
            tracing::debug!("profile {} is pull-only", self.name);
            self.pull()?;
        } else {
            self.commit_pull_push(opts)?;
        }

        self.run_hook_internal("after_sync", false)?;

        if !opts.skip_modules {
            for module in &self.modules {
                module.sync(opts)?;
            }
        }

        Ok(())
    }

    /// Whether the working tree has uncommitted changes.
    ///
    /// # Errors
    ///
    /// Returns an error if `git status` fails.
    pub fn is_dirty(&self) -> Result<bool, GitError> {
        let result = self.git_captured(&["status", "--porcelain"])?;
        Ok(!result.stdout.trim().is_empty())
    }

    /// The branch used for pull and push: the configured branch, else
    /// whatever HEAD currently names.
    ///
    /// # Errors
    ///
    /// Returns an error if `git rev-parse` fails.
    pub fn branch(&self) -> Result<String, GitError> {
        if let Some(branch) = &self.branch {
            return Ok(branch.clone());
        }
        let result = self.git_captured(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(result.stdout.trim().to_string())
    }

    fn commit_pull_push(&self, opts: &SyncOptions) -> Result<()> {
        tracing::debug!("syncing {}", self.location.display());

        let dirty = self.is_dirty()?;
        tracing::debug!("working tree dirty: {dirty}");

        if dirty {
            // Show the user what is about to be committed; informational
            // only, not an input gate.
            self.git_interactive(&["--no-pager", "diff"])?;

            let message = resolve_commit_message(
                opts.message.clone(),
                self.prompt_for_commit_message,
                prompt_on_stdin,
            )?;
            tracing::debug!("commit message: {message}");

            self.git_interactive(&["add", "--all"])?;
            self.git_interactive(&["commit", "-m", &message])?;
        }

        // Pull even when nothing changed locally, so the tree stays
        // current with the remote.
        self.pull()?;

        if dirty {
            self.push()?;
        }

        Ok(())
    }

    fn pull(&self) -> Result<(), GitError> {
        if !self.has_origin()? {
            tracing::debug!(
                "{} has no origin remote, skipping pull",
                self.location.display()
            );
            return Ok(());
        }
        let branch = self.branch()?;
        tracing::debug!("pulling {} from origin/{branch}", self.location.display());
        self.git_interactive(&["pull", "--rebase", "origin", &branch])
    }

    fn push(&self) -> Result<(), GitError> {
        if !self.has_origin()? {
            tracing::debug!(
                "{} has no origin remote, skipping push",
                self.location.display()
            );
            return Ok(());
        }
        let branch = self.branch()?;
        self.git_interactive(&["push", "origin", &branch])
    }

    fn has_origin(&self) -> Result<bool, GitError> {
        let result = self.git_captured(&["remote"])?;
        Ok(result.stdout.lines().any(|line| line.trim() == "origin"))
    }

    /// Run git in the profile's working tree, capturing output.
    fn git_captured(&self, args: &[&str]) -> Result<exec::ExecResult, GitError> {
        let result = exec::run_in_unchecked(&self.location, "git", args)
            .map_err(|e| GitError::Exec(std::io::Error::other(e.to_string())))?;
        if result.success {
            Ok(result)
        } else {
            Err(self.command_failed(args, result.code, result.stderr.trim().to_string()))
        }
    }

    /// Run git in the profile's working tree with inherited stdio, so
    /// diffs, rebase progress, and auth prompts reach the user directly.
    fn git_interactive(&self, args: &[&str]) -> Result<(), GitError> {
        let status = exec::interactive(&self.location, "git", args).map_err(GitError::Exec)?;
        if status.success() {
            Ok(())
        } else {
            Err(self.command_failed(args, status.code(), "see git output above".to_string()))
        }
    }

    fn command_failed(&self, args: &[&str], code: Option<i32>, stderr: String) -> GitError {
        GitError::CommandFailed {
            args: args.join(" "),
            dir: self.location.clone(),
            code: code.unwrap_or(-1),
            stderr,
        }
    }
}

/// Pick the commit message: explicit wins, then the interactive prompt
/// when the profile asks for one, then the fixed default.
fn resolve_commit_message(
    explicit: Option<String>,
    prompt_configured: bool,
    prompt: impl FnOnce() -> std::io::Result<String>,
) -> std::io::Result<String> {
    if let Some(message) = explicit {
        return Ok(message);
    }
    if prompt_configured {
        let answer = prompt()?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
    Ok(DEFAULT_COMMIT_MESSAGE.to_string())
}

fn prompt_on_stdin() -> std::io::Result<String> {
    print!("Commit message: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}
