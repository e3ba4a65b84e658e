use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Version string baked in by `build.rs`, falling back to the crate
/// version for builds outside a git checkout.
pub const VERSION: &str = match option_env!("DFM_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for the dotfile manager.
#[derive(Parser, Debug)]
#[command(
    name = "dfm",
    about = "Profile-based dotfile manager",
    version = VERSION
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link a profile's files into the home directory
    Link(LinkOpts),
    /// Commit, pull, and push the current profile
    Sync(SyncOpts),
    /// Move files into the current profile and re-link
    Add(AddOpts),
    /// Run a named hook of the current profile
    RunHook(RunHookOpts),
    /// Remove dead managed symlinks
    Clean,
    /// Create a new empty profile
    Init(InitOpts),
    /// Clone a profile repository
    Clone(CloneOpts),
    /// List known profiles
    List,
    /// Print the current profile's location
    Where,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// Profile name (or path); defaults to the current profile
    pub profile: Option<String>,

    /// Replace existing regular files at link targets
    #[arg(long)]
    pub overwrite: bool,
}

/// Options for the `sync` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SyncOpts {
    /// Sync only this profile, not its modules
    #[arg(long)]
    pub skip_modules: bool,

    /// Commit message for local changes
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Options for the `add` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AddOpts {
    /// Files to move into the profile
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Options for the `run-hook` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RunHookOpts {
    /// Hook name to run
    pub name: String,
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InitOpts {
    /// Name of the new profile
    pub name: String,
}

/// Options for the `clone` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CloneOpts {
    /// Repository URL to clone
    pub url: String,

    /// Directory name for the profile (defaults to the repo name)
    #[arg(long)]
    pub name: Option<String>,

    /// Link the profile immediately after cloning
    #[arg(long)]
    pub link: bool,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_link_with_profile() {
        let cli = Cli::parse_from(["dfm", "link", "work"]);
        let Command::Link(opts) = cli.command else {
            panic!("expected link command");
        };
        assert_eq!(opts.profile.as_deref(), Some("work"));
        assert!(!opts.overwrite);
    }

    #[test]
    fn parse_link_overwrite() {
        let cli = Cli::parse_from(["dfm", "link", "--overwrite"]);
        let Command::Link(opts) = cli.command else {
            panic!("expected link command");
        };
        assert!(opts.profile.is_none());
        assert!(opts.overwrite);
    }

    #[test]
    fn parse_sync_message() {
        let cli = Cli::parse_from(["dfm", "sync", "-m", "update vim config"]);
        let Command::Sync(opts) = cli.command else {
            panic!("expected sync command");
        };
        assert_eq!(opts.message.as_deref(), Some("update vim config"));
        assert!(!opts.skip_modules);
    }

    #[test]
    fn parse_sync_skip_modules() {
        let cli = Cli::parse_from(["dfm", "sync", "--skip-modules"]);
        let Command::Sync(opts) = cli.command else {
            panic!("expected sync command");
        };
        assert!(opts.skip_modules);
    }

    #[test]
    fn parse_add_requires_files() {
        assert!(Cli::try_parse_from(["dfm", "add"]).is_err());
        let cli = Cli::parse_from(["dfm", "add", ".bashrc", ".vimrc"]);
        let Command::Add(opts) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(opts.files.len(), 2);
    }

    #[test]
    fn parse_run_hook() {
        let cli = Cli::parse_from(["dfm", "run-hook", "install-packages"]);
        let Command::RunHook(opts) = cli.command else {
            panic!("expected run-hook command");
        };
        assert_eq!(opts.name, "install-packages");
    }

    #[test]
    fn parse_clone_with_name_and_link() {
        let cli = Cli::parse_from([
            "dfm",
            "clone",
            "https://example.com/u/dots.git",
            "--name",
            "work",
            "--link",
        ]);
        let Command::Clone(opts) = cli.command else {
            panic!("expected clone command");
        };
        assert_eq!(opts.name.as_deref(), Some("work"));
        assert!(opts.link);
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["dfm", "-v", "-n", "link"]);
        assert!(cli.verbose);
        assert!(cli.dry_run);
    }

    #[test]
    fn parse_list_and_where() {
        assert!(matches!(
            Cli::parse_from(["dfm", "list"]).command,
            Command::List
        ));
        assert!(matches!(
            Cli::parse_from(["dfm", "where"]).command,
            Command::Where
        ));
    }
}
