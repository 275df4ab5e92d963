use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable holding an `EnvFilter` directive string.
pub(crate) const LOG_ENV: &str = "FRONTDESK_LOG";

/// Installs a stderr fmt subscriber; `-v` flags raise the level on top of `FRONTDESK_LOG`.
pub(crate) fn init(verbosity: u8) {
    let mut filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(LevelFilter::WARN.to_string()));
    if let Some(level) = verbosity_level(verbosity) {
        filter = filter.add_directive(level.into());
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn verbosity_level(verbosity: u8) -> Option<LevelFilter> {
    match verbosity {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}
