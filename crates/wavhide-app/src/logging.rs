//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "WAVHIDE_LOG";

/// Filter applied when [`LOG_ENV`] is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Builds the filter from raw directives, falling back to [`DEFAULT_LOG_FILTER`].
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the stderr fmt subscriber. A second call is a no-op.
pub fn init_tracing() {
    let directives = std::env::var(LOG_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
