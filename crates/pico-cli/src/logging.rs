use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `PICO_LOG=debug`
pub const LOG_ENV: &str = "PICO_LOG";

/// Initializes `tracing` logging to stderr.
///
/// The filter is read from [`LOG_ENV`] and defaults to errors only, since
/// warnings are already part of the conversion report. `--debug` overrides
/// the variable.
pub fn initialize_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
