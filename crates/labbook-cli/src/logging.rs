use std::error::Error;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Maps `-v`/`-q` to a level: 0=INFO, 1=DEBUG, 2+=TRACE, quiet=ERROR.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), Box<dyn Error>> {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|err| err as Box<dyn Error>)?;
    Ok(())
}
