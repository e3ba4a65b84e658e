//! Link-target inspection and mutation primitives (check + apply pattern).
pub mod fs;
pub mod symlink;

use crate::error::LinkError;

/// What currently occupies a link target, probed without following symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    /// Nothing at the target path.
    Missing,
    /// A symlink already pointing at the desired source.
    Correct,
    /// A symlink pointing somewhere else; always safe to replace.
    WrongSymlink(std::path::PathBuf),
    /// A regular (or other non-symlink) file; replaced only with overwrite.
    Occupied,
    /// A real directory; never removed automatically.
    Directory,
}

/// A checkable, appliable link target.
///
/// The state check and the mutation are split so that the link engine can
/// enforce policy (overwrite, dry-run, conflict collection) between them.
pub trait Resource {
    /// Human-readable description, `target -> source`.
    fn description(&self) -> String;

    /// Probe the target with an lstat-equivalent.
    ///
    /// # Errors
    ///
    /// Returns an error if the target's metadata cannot be read for a
    /// reason other than absence.
    fn current_state(&self) -> Result<TargetState, LinkError>;

    /// Replace whatever is at the target (symlink or file, not a
    /// directory) with the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if removal, parent creation, or the final
    /// mutation fails.
    fn apply(&self) -> Result<(), LinkError>;
}
