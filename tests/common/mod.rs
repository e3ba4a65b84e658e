// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed world (fake home directory plus
// profile directories) so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dfm::platform::Os;
use dfm::profiles::{Env, Profile};

/// An isolated test world backed by a [`tempfile::TempDir`]: a fake home
/// directory and a place for profile working trees.
pub struct TestWorld {
    pub root: tempfile::TempDir,
}

impl TestWorld {
    /// Create a new world with an empty home directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("home")).expect("create home dir");
        Self { root }
    }

    /// The fake home directory.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// The environment profiles link into: fake home, XDG config under
    /// it, profiles and modules beside it.
    pub fn env(&self) -> Env {
        Env {
            home: self.home(),
            xdg_config: self.home().join(".config"),
            profiles_dir: self.root.path().join("profiles"),
            modules_dir: self.root.path().join("modules"),
            os: Os::current(),
        }
    }

    /// Create (or return) a profile directory with the given name.
    ///
    /// The path is canonicalised so that assertions against link sources
    /// match what `Profile::load` resolves (temp dirs may sit behind
    /// symlinks, e.g. `/tmp` on macOS).
    pub fn profile_dir(&self, name: &str) -> PathBuf {
        let dir = self.root.path().join("profiles").join(name);
        std::fs::create_dir_all(&dir).expect("create profile dir");
        dunce::canonicalize(&dir).expect("canonicalize profile dir")
    }

    /// Write a file (and its parents) inside a profile.
    pub fn write_file(&self, profile: &str, rel: &str, contents: &str) {
        write_under(&self.profile_dir(profile), rel, contents);
    }

    /// Write the profile's `.dfm.toml`.
    pub fn write_config(&self, profile: &str, contents: &str) {
        write_under(&self.profile_dir(profile), ".dfm.toml", contents);
    }

    /// Load a profile by name.
    pub fn load_profile(&self, name: &str) -> Profile {
        Profile::load(&self.profile_dir(name), &self.env()).expect("load profile")
    }
}

/// Write `contents` to `base/rel`, creating intermediate directories.
pub fn write_under(base: &Path, rel: &str, contents: &str) {
    let path = base.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(path, contents).expect("write file");
}
