//! Domain-specific error types for the dotfile engine.
//!
//! Internal modules return typed errors ([`ConfigError`], [`LinkError`],
//! [`HookError`], [`GitError`]) while command handlers at the CLI boundary
//! convert them to [`anyhow::Error`] via the standard `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from loading a profile or the process state file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The profile config file contains a syntax or shape error.
    #[error("invalid profile config {}: {message}", file.display())]
    Invalid { file: PathBuf, message: String },

    /// No profile is selected and none was named on the command line.
    #[error("no current profile; run `dfm link <profile>` or `dfm clone` first")]
    NoCurrentProfile,

    /// The named profile does not exist in the profiles directory.
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    /// An I/O error occurred while reading a config or state file.
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that arise while planning or applying symlinks.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The link target exists and is a regular file; refused without `--overwrite`.
    #[error("{} exists and is not a symlink, refusing to remove", .0.display())]
    TargetExists(PathBuf),

    /// The link target is a real directory; never removed automatically.
    #[error("{} is a directory, refusing to remove", .0.display())]
    IsDirectory(PathBuf),

    /// The profile tree could not be walked.
    #[error("walking {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filesystem mutation (remove, mkdir, symlink) failed.
    #[error("linking {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LinkError {
    /// Whether this error is a per-action conflict that the link loop
    /// records and continues past, rather than aborting the whole run.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::TargetExists(_) | Self::IsDirectory(_))
    }
}

/// Errors that arise from lifecycle hooks.
#[derive(Error, Debug)]
pub enum HookError {
    /// The hook spec decoded but cannot be turned into a command line.
    #[error("hook '{name}' is malformed: {message}")]
    Malformed { name: String, message: String },

    /// The hook process exited non-zero.
    #[error("hook '{name}' failed with exit status {status}")]
    Failed { name: String, status: i32 },

    /// The hook process could not be spawned.
    #[error("hook '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from git subprocess invocations during sync.
#[derive(Error, Debug)]
pub enum GitError {
    /// A git command exited non-zero; stderr is surfaced verbatim.
    #[error("git {args} in {} failed (exit {code}): {stderr}", dir.display())]
    CommandFailed {
        args: String,
        dir: PathBuf,
        code: i32,
        stderr: String,
    },

    /// Git itself could not be executed.
    #[error("failed to execute git: {0}")]
    Exec(#[from] std::io::Error),
}
