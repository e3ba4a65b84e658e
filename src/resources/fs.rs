//! File-system helpers shared by resource `apply()` implementations.
use std::path::Path;

use crate::error::LinkError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary. Created directories are owner-only (`0o700`)
/// on Unix; link targets can live under private trees like `~/.ssh`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), LinkError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        builder.mode(0o700);
    }
    builder.create(parent).map_err(|e| LinkError::Io {
        path: parent.to_path_buf(),
        source: e,
    })
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
/// Does nothing if `path` does not exist. Never removes real directories;
/// callers must rule those out first.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<(), LinkError> {
    let meta = match path.symlink_metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(LinkError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    // On Windows a directory symlink must be removed with remove_dir.
    let result = if cfg!(windows) && is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    };

    result.map_err(|e| LinkError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Whether metadata describes a directory-like entry. On Windows,
/// `symlink_metadata().is_dir()` is `false` for directory symlinks, so the
/// raw `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt as _;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
