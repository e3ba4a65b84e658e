//! Profiles: version-controlled dotfile directories and their modules.
//!
//! A [`Profile`] wraps a filesystem location, its compiled mapping rules,
//! its hooks, and zero or more nested module profiles. It is assembled
//! once at load time and never mutated afterwards; `link` and `sync` only
//! touch disk.

pub mod hooks;
pub mod link;
pub mod mappings;
pub mod planner;
pub mod sync;

pub use link::{LinkOptions, LinkReport};
pub use sync::SyncOptions;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{HookMap, LinkMode, MappingSpec, ModuleSpec, ProfileConfig, paths};
use crate::error::{ConfigError, GitError};
use crate::exec;
use crate::platform::Os;
use mappings::Mapping;

/// The environment a profile links into: target roots, profile and
/// module storage, and the running OS.
#[derive(Debug, Clone)]
pub struct Env {
    pub home: PathBuf,
    pub xdg_config: PathBuf,
    pub profiles_dir: PathBuf,
    pub modules_dir: PathBuf,
    pub os: Os,
}

impl Env {
    /// Detect the environment from `HOME` and the XDG variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn detect() -> Result<Self, ConfigError> {
        let home = paths::home()?;
        Ok(Self {
            xdg_config: paths::xdg_config_home(&home),
            profiles_dir: paths::profiles_dir(&home),
            modules_dir: paths::modules_dir(&home),
            os: Os::current(),
            home,
        })
    }
}

/// A named dotfile profile: a git working tree projected into `$HOME`.
#[derive(Debug)]
pub struct Profile {
    name: String,
    location: PathBuf,
    root_dir: Option<PathBuf>,
    link_mode: LinkMode,
    pull_only: bool,
    branch: Option<String>,
    prompt_for_commit_message: bool,
    mappings: Vec<Mapping>,
    hooks: HookMap,
    modules: Vec<Profile>,
}

impl Profile {
    /// Load a profile from its location, reading `.dfm.toml` when present
    /// and instantiating module profiles (cloning the ones that are not on
    /// disk yet).
    ///
    /// # Errors
    ///
    /// Returns an error if the location does not exist, the config file is
    /// invalid, or a module cannot be materialised.
    pub fn load(location: &Path, env: &Env) -> Result<Self> {
        let location = dunce::canonicalize(location).map_err(|e| ConfigError::Io {
            path: location.to_path_buf(),
            source: e,
        })?;
        let cfg = ProfileConfig::load(&location)?;
        tracing::debug!("loaded profile config from {}", location.display());

        Self::assemble(
            location,
            cfg.root_dir,
            cfg.link_mode,
            cfg.pull_only,
            cfg.branch,
            cfg.prompt_for_commit_message,
            &cfg.mappings,
            cfg.hooks,
            &cfg.modules,
            env,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        location: PathBuf,
        root_dir: Option<PathBuf>,
        link_mode: LinkMode,
        pull_only: bool,
        branch: Option<String>,
        prompt_for_commit_message: bool,
        mapping_specs: &[MappingSpec],
        hooks: HookMap,
        module_specs: &[ModuleSpec],
        env: &Env,
    ) -> Result<Self> {
        let name = location
            .file_name()
            .map_or_else(|| location.display().to_string(), |n| n.to_string_lossy().into_owned());

        let modules = module_specs
            .iter()
            .map(|spec| Self::from_module(spec, env))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            mappings: mappings::merged(mapping_specs, &env.xdg_config),
            location,
            root_dir,
            link_mode,
            pull_only,
            branch,
            prompt_for_commit_message,
            hooks,
            modules,
        })
    }

    /// Instantiate a module profile from its inline spec, cloning its
    /// repository if the location does not exist yet.
    fn from_module(spec: &ModuleSpec, env: &Env) -> Result<Self> {
        let location = module_location(spec, env)?;
        ensure_exists(&location, spec.repo.as_deref())?;

        Self::assemble(
            location,
            None,
            spec.link_mode,
            spec.pull_only,
            spec.branch.clone(),
            false,
            &spec.mappings,
            spec.hooks.clone(),
            &spec.modules,
            env,
        )
    }

    /// The profile's name (basename of its location).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The profile's working-tree location.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// The directory actually walked by the planner: `location`, adjusted
    /// by the configured `root_dir`.
    #[must_use]
    pub fn dotfiles_root(&self) -> PathBuf {
        self.root_dir
            .as_ref()
            .map_or_else(|| self.location.clone(), |sub| self.location.join(sub))
    }

    /// Nested module profiles, in config order.
    #[must_use]
    pub fn modules(&self) -> &[Self] {
        &self.modules
    }

    /// Run a named hook (user-defined or lifecycle) in the profile
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the hook is malformed or exits non-zero.
    pub fn run_hook(&self, name: &str, dry_run: bool) -> Result<()> {
        hooks::run(&self.hooks, name, &self.location, dry_run)?;
        Ok(())
    }

    /// The profile location, bracketed by the `before_where`/`after_where`
    /// hooks. Hook failures are logged, not fatal; `where` is a query.
    #[must_use]
    pub fn where_location(&self) -> &Path {
        for event in ["before_where", "after_where"] {
            if let Err(e) = hooks::run(&self.hooks, event, &self.location, false) {
                tracing::warn!("{e}");
            }
        }
        &self.location
    }

    pub(crate) fn run_hook_internal(&self, name: &str, dry_run: bool) -> Result<()> {
        hooks::run(&self.hooks, name, &self.location, dry_run)?;
        Ok(())
    }
}

/// Resolve where a module lives on disk.
fn module_location(spec: &ModuleSpec, env: &Env) -> Result<PathBuf, ConfigError> {
    if let Some(location) = &spec.location {
        return Ok(expand_home(location, &env.home));
    }
    if let Some(repo) = &spec.repo {
        return Ok(env.modules_dir.join(repo_basename(repo)));
    }
    Err(ConfigError::Invalid {
        file: PathBuf::from(".dfm.toml"),
        message: "module needs a location or a repo".to_string(),
    })
}

/// Clone `repo` into `location` when the location does not exist yet.
fn ensure_exists(location: &Path, repo: Option<&str>) -> Result<()> {
    if location.exists() {
        return Ok(());
    }

    let Some(repo) = repo else {
        return Err(ConfigError::Invalid {
            file: PathBuf::from(".dfm.toml"),
            message: format!(
                "module location {} does not exist and has no repo to clone",
                location.display()
            ),
        }
        .into());
    };

    let parent = location.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
        path: parent.to_path_buf(),
        source: e,
    })?;

    tracing::info!("cloning {repo} into {}", location.display());
    let location_str = location.display().to_string();
    let status = exec::interactive(parent, "git", &["clone", repo, location_str.as_str()])
        .map_err(GitError::Exec)?;
    if !status.success() {
        return Err(GitError::CommandFailed {
            args: format!("clone {repo}"),
            dir: parent.to_path_buf(),
            code: status.code().unwrap_or(-1),
            stderr: "see git output above".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path, home: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    home.join(rest)
}

/// Derive a directory name from a clone URL: the last path segment with
/// any `.git` suffix removed.
pub(crate) fn repo_basename(repo: &str) -> String {
    let tail = repo
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(repo);
    tail.trim_end_matches(".git").to_string()
}
