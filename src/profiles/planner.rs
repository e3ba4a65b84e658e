//! The symlink planner: walks a profile tree and produces link actions.
//!
//! The walk is depth-first with entries sorted by name in each directory,
//! so the plan is reproducible regardless of filesystem iteration order.
//! Descent is rule-driven: `Skip` and `LinkAsDir` stop it, `Translate` on a
//! directory rebases the target root for the whole subtree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::mappings::{self, Disposition, Mapping};
use crate::config::CONFIG_FILE;
use crate::error::LinkError;
use crate::platform::Os;
use crate::resources::symlink::LinkResource;

/// Plan the symlinks for a profile rooted at `root`.
///
/// `home` is the default target root; XDG and custom redirections are
/// carried by `Translate` rules. Returns actions in deterministic walk
/// order.
///
/// # Errors
///
/// Returns an error if a directory in the profile cannot be read.
pub fn plan(
    root: &Path,
    rules: &[Mapping],
    home: &Path,
    os: Os,
) -> Result<Vec<LinkResource>, LinkError> {
    let mut walk = Walk {
        root,
        rules,
        home,
        os,
        actions: Vec::new(),
        linked_dirs: HashSet::new(),
    };
    walk.dir(root, root, home)?;
    Ok(walk.actions)
}

struct Walk<'a> {
    root: &'a Path,
    rules: &'a [Mapping],
    home: &'a Path,
    os: Os,
    actions: Vec<LinkResource>,
    /// Directories already emitted for `LinkAsDir`; repeats collapse.
    linked_dirs: HashSet<PathBuf>,
}

impl Walk<'_> {
    /// Walk one directory. `subtree_root` and `target_root` travel
    /// together: paths are made relative to `subtree_root` and placed under
    /// `target_root`; a `Translate` directory restarts both.
    fn dir(
        &mut self,
        dir: &Path,
        subtree_root: &Path,
        target_root: &Path,
    ) -> Result<(), LinkError> {
        let mut entries: Vec<std::fs::DirEntry> = std::fs::read_dir(dir)
            .map_err(|e| walk_err(dir, e))?
            .collect::<Result<_, _>>()
            .map_err(|e| walk_err(dir, e))?;
        entries.sort_by_key(std::fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name();
            if name == ".git" || name == CONFIG_FILE {
                continue;
            }

            let path = entry.path();
            let Some(rel) = relative_slash(&path, self.root) else {
                continue;
            };
            let is_dir = entry.file_type().map_err(|e| walk_err(&path, e))?.is_dir();

            match mappings::resolve(&rel, self.rules, self.os) {
                Disposition::Skip => {}
                Disposition::LinkAsDir => {
                    if is_dir {
                        self.link_dir_once(&path, subtree_root, target_root);
                    } else {
                        match path.parent() {
                            Some(parent) if parent != self.root => {
                                self.link_dir_once(parent, subtree_root, target_root);
                            }
                            _ => {
                                // A file at the profile root has no linkable
                                // containing directory; fall back to a plain
                                // file link.
                                tracing::warn!(
                                    "link_as_dir matched top-level file {rel}, linking it directly"
                                );
                                self.emit(&path, subtree_root, target_root);
                            }
                        }
                    }
                }
                Disposition::Translate(dest) => {
                    if *target_root == dest {
                        // Already inside this translated subtree (nested
                        // paths keep matching the rule); keep walking
                        // without rebasing again.
                        if is_dir {
                            self.dir(&path, subtree_root, target_root)?;
                        } else {
                            self.emit(&path, subtree_root, target_root);
                        }
                    } else if is_dir {
                        self.dir(&path, &path, &dest)?;
                    } else if let Ok(rel_t) = path.strip_prefix(subtree_root) {
                        // Inside a translated subtree names are preserved
                        // verbatim.
                        self.actions
                            .push(LinkResource::new(path.clone(), dest.join(rel_t)));
                    }
                }
                Disposition::Default => {
                    if is_dir {
                        self.dir(&path, subtree_root, target_root)?;
                    } else {
                        self.emit(&path, subtree_root, target_root);
                    }
                }
            }
        }
        Ok(())
    }

    /// Emit a link action for a file or directory under the current
    /// subtree.
    fn emit(&mut self, path: &Path, subtree_root: &Path, target_root: &Path) {
        let Ok(rel) = path.strip_prefix(subtree_root) else {
            return;
        };
        let target = if target_root == self.home {
            target_root.join(dot_first_segment(rel))
        } else {
            target_root.join(rel)
        };
        self.actions
            .push(LinkResource::new(path.to_path_buf(), target));
    }

    fn link_dir_once(&mut self, dir: &Path, subtree_root: &Path, target_root: &Path) {
        if self.linked_dirs.insert(dir.to_path_buf()) {
            self.emit(dir, subtree_root, target_root);
        }
    }
}

fn walk_err(path: &Path, source: std::io::Error) -> LinkError {
    LinkError::Walk {
        path: path.to_path_buf(),
        source,
    }
}

/// Path relative to `root`, `/`-separated on every platform, for rule
/// matching.
fn relative_slash(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Dot-prefix the first segment of a home-relative path unless it already
/// has one: `bashrc` becomes `.bashrc`, `ssh/config` becomes
/// `.ssh/config`, `.vimrc` stays as is.
fn dot_first_segment(rel: &Path) -> PathBuf {
    let mut components = rel.components();
    let Some(first) = components.next() else {
        return rel.to_path_buf();
    };
    let name = first.as_os_str().to_string_lossy();
    let head = if name.starts_with('.') {
        name.into_owned()
    } else {
        format!(".{name}")
    };
    let mut out = PathBuf::from(head);
    out.push(components.as_path());
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::MappingSpec;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    fn user_rule(pattern: &str) -> MappingSpec {
        MappingSpec {
            pattern: pattern.to_string(),
            skip: false,
            link_as_dir: false,
            dest: None,
            target_os: Vec::new(),
        }
    }

    /// Render a plan with the profile root elided, for stable assertions.
    fn render(actions: &[LinkResource], root: &Path) -> String {
        actions
            .iter()
            .map(|a| {
                format!(
                    "{} -> {}",
                    relative_slash(&a.source, root).unwrap(),
                    a.target.display()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn default_mappings_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "bashrc");
        touch(root, ".gitignore");
        touch(root, "config/nvim/init.vim");

        let home = Path::new("/home/u");
        let rules = mappings::merged(&[], Path::new("/home/u/.config"));
        let actions = plan(root, &rules, home, Os::current()).unwrap();

        insta::assert_snapshot!(render(&actions, root), @r"
        bashrc -> /home/u/.bashrc
        config/nvim/init.vim -> /home/u/.config/nvim/init.vim
        ");
    }

    #[test]
    fn link_as_dir_collapses_to_one_action() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "scripts/a.sh");
        touch(root, "scripts/b.sh");

        let mut rule = user_rule("^scripts/");
        rule.link_as_dir = true;
        let rules = mappings::merged(&[rule], Path::new("/home/u/.config"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].source, root.join("scripts"));
        assert_eq!(actions[0].target, PathBuf::from("/home/u/.scripts"));
    }

    #[test]
    fn link_as_dir_matching_the_directory_itself() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "scripts/a.sh");

        let mut rule = user_rule("^scripts(/|$)");
        rule.link_as_dir = true;
        let rules = mappings::merged(&[rule], Path::new("/home/u/.config"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].target, PathBuf::from("/home/u/.scripts"));
    }

    #[test]
    fn skip_beats_translate_when_listed_first() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "notes/todo.txt");

        let mut skip = user_rule("^notes/");
        skip.skip = true;
        let mut translate = user_rule("^notes/");
        translate.dest = Some(PathBuf::from("/elsewhere"));
        let rules = mappings::merged(&[skip, translate], Path::new("/xdg"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert!(actions.is_empty(), "skipped path must never be linked");
    }

    #[test]
    fn translate_rebases_a_directory_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "config/git/config");

        let rules = mappings::merged(&[], Path::new("/home/u/.config"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(actions.len(), 1);
        // The `config/` segment is consumed by the rebase, and the name is
        // preserved verbatim inside the translated subtree.
        assert_eq!(
            actions[0].target,
            PathBuf::from("/home/u/.config/git/config")
        );
    }

    #[test]
    fn deeply_nested_config_paths_keep_their_structure() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "config/nvim/lua/opts.lua");
        touch(root, "config/nvim/init.vim");

        let rules = mappings::merged(&[], Path::new("/home/u/.config"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        let targets: Vec<_> = actions.iter().map(|a| a.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                PathBuf::from("/home/u/.config/nvim/init.vim"),
                PathBuf::from("/home/u/.config/nvim/lua/opts.lua"),
            ]
        );
    }

    #[test]
    fn translate_on_a_file_preserves_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "units/dfm.timer");

        let mut rule = user_rule(r"\.timer$");
        rule.dest = Some(PathBuf::from("/etc/systemd/user"));
        let rules = mappings::merged(&[rule], Path::new("/xdg"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].target,
            PathBuf::from("/etc/systemd/user/units/dfm.timer")
        );
    }

    #[test]
    fn nested_default_files_dot_the_first_segment() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "ssh/config");

        let rules = mappings::merged(&[], Path::new("/xdg"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].target, PathBuf::from("/home/u/.ssh/config"));
    }

    #[test]
    fn already_dotted_names_are_not_double_dotted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, ".vimrc");

        let rules = mappings::merged(&[], Path::new("/xdg"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].target, PathBuf::from("/home/u/.vimrc"));
    }

    #[test]
    fn git_dir_and_config_file_are_never_planned() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, ".git/HEAD");
        touch(root, ".git/objects/aa/bb");
        touch(root, ".dfm.toml");
        touch(root, "bashrc");

        let rules = mappings::merged(&[], Path::new("/xdg"));
        let actions = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].source, root.join("bashrc"));
    }

    #[test]
    fn plan_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        // Created in non-sorted order on purpose.
        touch(root, "zshrc");
        touch(root, "bashrc");
        touch(root, "profile");

        let rules = mappings::merged(&[], Path::new("/xdg"));
        let first = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();
        let second = plan(root, &rules, Path::new("/home/u"), Os::current()).unwrap();

        assert_eq!(first, second);
        let names: Vec<_> = first
            .iter()
            .map(|a| a.source.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["bashrc", "profile", "zshrc"]);
    }

    #[test]
    fn unreadable_root_is_a_walk_error() {
        let missing = Path::new("/nonexistent/profile/root");
        let rules = mappings::merged(&[], Path::new("/xdg"));
        let err = plan(missing, &rules, Path::new("/home/u"), Os::current()).unwrap_err();
        assert!(matches!(err, LinkError::Walk { .. }));
    }

    #[test]
    fn dot_first_segment_cases() {
        assert_eq!(dot_first_segment(Path::new("bashrc")), PathBuf::from(".bashrc"));
        assert_eq!(
            dot_first_segment(Path::new("ssh/config")),
            PathBuf::from(".ssh/config")
        );
        assert_eq!(dot_first_segment(Path::new(".vimrc")), PathBuf::from(".vimrc"));
    }
}
