//! Link orchestration: planner output driven through the executor with
//! conflict collection and module ordering.

use anyhow::Result;

use super::planner;
use super::{Env, Profile};
use crate::config::LinkMode;
use crate::error::LinkError;
use crate::resources::symlink::LinkResource;
use crate::resources::{Resource as _, TargetState};

/// Options for a link run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkOptions {
    /// Replace pre-existing regular files at link targets.
    pub overwrite: bool,
    /// Report intended actions without touching the filesystem.
    pub dry_run: bool,
}

/// What happened to one planned link.
#[derive(Debug)]
pub enum LinkStatus {
    /// Symlink created (or replaced).
    Linked,
    /// Target was already the desired symlink; left untouched.
    AlreadyLinked,
    /// Dry run; would have linked.
    WouldLink,
    /// Target blocked by an existing file or directory; other links
    /// proceeded.
    Conflict(LinkError),
}

/// One planned link and its outcome.
#[derive(Debug)]
pub struct LinkOutcome {
    pub action: LinkResource,
    pub status: LinkStatus,
}

/// The collected outcomes of a link run, in execution order.
///
/// Execution order is observable: module profiles marked `before` appear
/// ahead of the parent's own actions, `after` modules behind them.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub outcomes: Vec<LinkOutcome>,
}

impl LinkReport {
    /// Conflicts recorded during the run.
    pub fn conflicts(&self) -> impl Iterator<Item = &LinkError> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            LinkStatus::Conflict(e) => Some(e),
            _ => None,
        })
    }

    /// True when no conflicts were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts().next().is_none()
    }

    /// Sources of all non-conflict outcomes, in execution order.
    #[must_use]
    pub fn linked_sources(&self) -> Vec<&std::path::Path> {
        self.outcomes
            .iter()
            .filter(|o| !matches!(o.status, LinkStatus::Conflict(_)))
            .map(|o| o.action.source.as_path())
            .collect()
    }

    fn extend(&mut self, other: Self) {
        self.outcomes.extend(other.outcomes);
    }
}

impl Profile {
    /// Link this profile into the environment's home directory.
    ///
    /// Runs `before_link`, links `before` modules, the profile's own files
    /// (unless its link mode is `none`), then `after` modules and
    /// `after_link`. Target conflicts are collected in the report and do
    /// not stop the run; every other error aborts immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if a hook fails, the profile tree cannot be
    /// walked, or a filesystem mutation fails.
    pub fn link(&self, env: &Env, opts: LinkOptions) -> Result<LinkReport> {
        self.run_hook_internal("before_link", opts.dry_run)?;

        let mut report = LinkReport::default();

        for module in self.modules_with_mode(LinkMode::Before) {
            report.extend(module.link(env, opts)?);
        }

        if self.link_mode == LinkMode::None {
            tracing::debug!("not linking profile {} (link mode none)", self.name);
        } else {
            tracing::debug!("linking profile {}", self.name);
            let actions = planner::plan(&self.dotfiles_root(), &self.mappings, &env.home, env.os)?;
            for action in actions {
                let status = apply_action(&action, opts)?;
                report.outcomes.push(LinkOutcome { action, status });
            }
        }

        for module in self.modules_with_mode(LinkMode::After) {
            report.extend(module.link(env, opts)?);
        }

        self.run_hook_internal("after_link", opts.dry_run)?;

        Ok(report)
    }

    fn modules_with_mode(&self, mode: LinkMode) -> impl Iterator<Item = &Self> {
        self.modules.iter().filter(move |m| m.link_mode == mode)
    }
}

/// Drive one action through the executor under the run's policy.
///
/// Conflicts come back as a status, not an error; real I/O failures
/// propagate.
fn apply_action(action: &LinkResource, opts: LinkOptions) -> Result<LinkStatus, LinkError> {
    match action.current_state()? {
        TargetState::Correct => {
            tracing::debug!("already linked: {}", action.description());
            Ok(LinkStatus::AlreadyLinked)
        }
        TargetState::Missing | TargetState::WrongSymlink(_) => do_apply(action, opts),
        TargetState::Occupied => {
            if opts.overwrite {
                do_apply(action, opts)
            } else {
                let err = LinkError::TargetExists(action.target.clone());
                tracing::warn!("{err}");
                Ok(LinkStatus::Conflict(err))
            }
        }
        TargetState::Directory => {
            let err = LinkError::IsDirectory(action.target.clone());
            tracing::warn!("{err}");
            Ok(LinkStatus::Conflict(err))
        }
    }
}

fn do_apply(action: &LinkResource, opts: LinkOptions) -> Result<LinkStatus, LinkError> {
    if opts.dry_run {
        println!("{}", action.description());
        return Ok(LinkStatus::WouldLink);
    }
    tracing::debug!("{}", action.description());
    action.apply()?;
    Ok(LinkStatus::Linked)
}
