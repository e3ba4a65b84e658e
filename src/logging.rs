//! Tracing subscriber initialisation.
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Diagnostics go to stderr so that command output (plans, profile lists,
/// `where`) stays clean on stdout. `--verbose` lowers the default level to
/// debug; `DFM_LOG` overrides both.
pub fn init(verbose: bool) {
    let default = if verbose { "dfm=debug" } else { "dfm=info" };
    let filter = EnvFilter::try_from_env("DFM_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
