//! Mapping rules: pattern-based placement decisions for profile files.
//!
//! Every path in a profile is matched, in order, against a list of rules;
//! the first rule that matches decides the file's fate. Rules never
//! combine. Paths are matched relative to the profile root, with `/`
//! separators on every platform.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::MappingSpec;
use crate::platform::Os;

/// The fate of a profile path, decided by the first matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Omit the path; directories are not descended into.
    Skip,
    /// Link the containing directory as a single unit.
    LinkAsDir,
    /// Place the path under this directory instead of `$HOME`.
    Translate(PathBuf),
    /// Place the path under `$HOME` by convention.
    Default,
}

/// A compiled mapping rule.
#[derive(Debug, Clone)]
pub struct Mapping {
    pattern: String,
    /// `None` when the pattern failed to compile; such a rule never matches.
    regex: Option<Regex>,
    skip: bool,
    link_as_dir: bool,
    dest: Option<PathBuf>,
    target_os: Vec<String>,
}

impl Mapping {
    fn new(pattern: &str) -> Self {
        let regex = match Regex::new(pattern) {
            Ok(r) => Some(r),
            Err(e) => {
                // A broken user pattern must not abort linking; it just
                // never matches.
                tracing::warn!("cannot compile mapping pattern '{pattern}': {e}");
                None
            }
        };
        Self {
            pattern: pattern.to_string(),
            regex,
            skip: false,
            link_as_dir: false,
            dest: None,
            target_os: Vec::new(),
        }
    }

    fn skip(pattern: &str) -> Self {
        Self {
            skip: true,
            ..Self::new(pattern)
        }
    }

    fn translate(pattern: &str, dest: PathBuf) -> Self {
        Self {
            dest: Some(dest),
            ..Self::new(pattern)
        }
    }

    /// Compile a user-supplied rule from `.dfm.toml`.
    #[must_use]
    pub fn from_spec(spec: &MappingSpec) -> Self {
        Self {
            skip: spec.skip,
            link_as_dir: spec.link_as_dir,
            dest: spec.dest.clone(),
            target_os: spec.target_os.clone(),
            ..Self::new(&spec.pattern)
        }
    }

    /// The source pattern, for diagnostics.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the rule is in effect on the given OS.
    fn applies_on(&self, os: Os) -> bool {
        self.target_os.is_empty() || self.target_os.iter().any(|name| os.matches(name))
    }

    /// Whether the rule matches a profile-relative path.
    fn matches(&self, rel_path: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(rel_path))
    }

    /// The disposition this rule assigns to a matching path.
    #[must_use]
    pub fn disposition(&self) -> Disposition {
        if self.skip {
            Disposition::Skip
        } else if self.link_as_dir {
            Disposition::LinkAsDir
        } else if let Some(dest) = &self.dest {
            Disposition::Translate(dest.clone())
        } else {
            Disposition::Default
        }
    }
}

/// Resolve the disposition for a profile-relative path.
///
/// Rules are consulted in order; a rule whose `target_os` filter does not
/// match `os` is treated as non-matching. The first match wins. Paths that
/// match no rule fall through to [`Disposition::Default`].
#[must_use]
pub fn resolve(rel_path: &str, rules: &[Mapping], os: Os) -> Disposition {
    rules
        .iter()
        .find(|rule| rule.applies_on(os) && rule.matches(rel_path))
        .map_or(Disposition::Default, Mapping::disposition)
}

/// The built-in rules every profile ships with: repository bookkeeping is
/// skipped, and the `config`/`.config` subtree is redirected to the XDG
/// config directory.
#[must_use]
pub fn defaults(xdg_config: &Path) -> Vec<Mapping> {
    vec![
        Mapping::skip(r"(^|/)\.git(/|$)"),
        Mapping::skip(r"(^|/)\.gitignore$"),
        Mapping::skip(r"(^|/)README(\.md|\.txt|\.rst|\.org)?$"),
        Mapping::skip(r"(^|/)LICENSE(\.md|\.txt)?$"),
        Mapping::skip(r"(^|/)\.dfm\.toml$"),
        Mapping::translate(r"^\.?config(/|$)", xdg_config.to_path_buf()),
    ]
}

/// Compile user rules and append the built-ins.
///
/// User rules come first so that, under first-match-wins, a profile can
/// override a built-in (e.g. re-enable linking `.gitignore`).
#[must_use]
pub fn merged(user: &[MappingSpec], xdg_config: &Path) -> Vec<Mapping> {
    let mut rules: Vec<Mapping> = user.iter().map(Mapping::from_spec).collect();
    rules.extend(defaults(xdg_config));
    rules
}
