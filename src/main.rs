use anyhow::Result;
use clap::Parser;

use dfm::cli::{Cli, Command};
use dfm::config::paths;
use dfm::profiles::Env;
use dfm::state::State;
use dfm::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init(args.verbose);

    let env = Env::detect()?;
    let state_path = paths::state_file(&env.home);
    let mut state = State::load(&state_path)?;

    let result = match &args.command {
        Command::Link(opts) => commands::link::run(opts, args.dry_run, &env, &mut state),
        Command::Sync(opts) => commands::sync::run(opts, &env, &state),
        Command::Add(opts) => commands::add::run(opts, args.dry_run, &env, &state),
        Command::RunHook(opts) => commands::run_hook::run(opts, args.dry_run, &env, &state),
        Command::Clean => commands::clean::run(args.dry_run, &env),
        Command::Init(opts) => commands::init::run(opts, args.dry_run, &env, &mut state),
        Command::Clone(opts) => commands::clone::run(opts, args.dry_run, &env, &mut state),
        Command::List => commands::list::run(&env, &state),
        Command::Where => commands::where_cmd::run(&env, &state),
    };

    // State is saved even when the command failed; a partially linked
    // profile selection is still the user's selection.
    state.save(&state_path)?;
    result
}
