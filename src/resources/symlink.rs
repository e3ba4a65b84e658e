//! The symlink link-target resource.
use std::path::{Path, PathBuf};

use super::{Resource, TargetState};
use crate::error::LinkError;

/// A planned symlink: `target` should end up pointing at `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResource {
    /// Absolute path inside the profile's dotfile directory.
    pub source: PathBuf,
    /// Absolute path where the symlink should exist.
    pub target: PathBuf,
}

impl LinkResource {
    /// Create a new link resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Resource for LinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<TargetState, LinkError> {
        let meta = match self.target.symlink_metadata() {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(TargetState::Missing);
            }
            Err(e) => {
                return Err(LinkError::Io {
                    path: self.target.clone(),
                    source: e,
                });
            }
        };

        if meta.is_symlink() {
            let existing = std::fs::read_link(&self.target).map_err(|e| LinkError::Io {
                path: self.target.clone(),
                source: e,
            })?;
            if paths_equal(&existing, &self.source) {
                return Ok(TargetState::Correct);
            }
            return Ok(TargetState::WrongSymlink(existing));
        }

        if meta.is_dir() {
            return Ok(TargetState::Directory);
        }

        Ok(TargetState::Occupied)
    }

    fn apply(&self) -> Result<(), LinkError> {
        super::fs::remove_existing(&self.target)?;
        super::fs::ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)
    }
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    s.strip_prefix(r"\\?\")
        .map_or_else(|| p.to_path_buf(), PathBuf::from)
}

/// Create a symlink at `target` pointing to `source`.
fn create_symlink(source: &Path, target: &Path) -> Result<(), LinkError> {
    platform_symlink(source, target).map_err(|e| LinkError::Io {
        path: target.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn platform_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn platform_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, target)
    } else {
        std::os::windows::fs::symlink_file(source, target)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn description_shows_target_then_source() {
        let res = LinkResource::new(PathBuf::from("/profile/bashrc"), PathBuf::from("/home/u/.bashrc"));
        assert_eq!(res.description(), "/home/u/.bashrc -> /profile/bashrc");
    }

    #[test]
    fn state_missing_when_target_absent() {
        let dir = tempfile::tempdir().unwrap();
        let res = LinkResource::new(dir.path().join("src"), dir.path().join("absent"));
        assert_eq!(res.current_state().unwrap(), TargetState::Missing);
    }

    #[test]
    fn state_occupied_for_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        std::fs::write(&target, "content").unwrap();
        let res = LinkResource::new(dir.path().join("src"), target);
        assert_eq!(res.current_state().unwrap(), TargetState::Occupied);
    }

    #[test]
    fn state_directory_for_real_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let res = LinkResource::new(dir.path().join("src"), target);
        assert_eq!(res.current_state().unwrap(), TargetState::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn state_correct_when_link_points_at_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::os::unix::fs::symlink(&source, &target).unwrap();
        let res = LinkResource::new(source, target);
        assert_eq!(res.current_state().unwrap(), TargetState::Correct);
    }

    #[cfg(unix)]
    #[test]
    fn state_wrong_symlink_when_link_points_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let other = dir.path().join("other");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::fs::write(&other, "y").unwrap();
        std::os::unix::fs::symlink(&other, &target).unwrap();
        let res = LinkResource::new(source, target);
        assert!(matches!(
            res.current_state().unwrap(),
            TargetState::WrongSymlink(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn state_handles_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        std::os::unix::fs::symlink("/nonexistent", &target).unwrap();
        let res = LinkResource::new(dir.path().join("src"), target);
        assert!(matches!(
            res.current_state().unwrap(),
            TargetState::WrongSymlink(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn apply_creates_link_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::write(&source, "x").unwrap();
        let target = dir.path().join("nested").join("deep").join("target");
        let res = LinkResource::new(source.clone(), target.clone());
        res.apply().unwrap();
        assert_eq!(std::fs::read_link(&target).unwrap(), source);
    }

    #[cfg(unix)]
    #[test]
    fn apply_replaces_existing_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let other = dir.path().join("other");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::fs::write(&other, "y").unwrap();
        std::os::unix::fs::symlink(&other, &target).unwrap();
        let res = LinkResource::new(source.clone(), target.clone());
        res.apply().unwrap();
        assert_eq!(std::fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn paths_equal_plain() {
        assert!(paths_equal(Path::new("/a/b"), Path::new("/a/b")));
        assert!(!paths_equal(Path::new("/a/b"), Path::new("/a/c")));
    }

    #[test]
    fn paths_equal_with_unc_prefix() {
        let a = PathBuf::from(r"\\?\C:\dots\bashrc");
        let b = PathBuf::from(r"C:\dots\bashrc");
        assert!(paths_equal(&a, &b));
    }
}
