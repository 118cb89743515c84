//! Client configuration: CLI flags, then environment, then defaults.

use std::time::Duration;

use thiserror::Error;
use url::Url;
use wavhide_transport::{TransportFault, normalize_base_url};
use wavhide_ui::progress::DEFAULT_SOFT_TIMEOUT;

/// Service URL used when neither a flag nor the environment names one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";

/// Environment variable overriding the service URL.
pub const SERVER_URL_ENV: &str = "WAVHIDE_SERVER_URL";

/// Environment variable overriding the soft timeout, in whole seconds.
pub const SOFT_TIMEOUT_ENV: &str = "WAVHIDE_SOFT_TIMEOUT_SECS";

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--server`.
    pub server_url: Option<String>,
    /// `--soft-timeout-secs`.
    pub soft_timeout_secs: Option<u64>,
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Normalized service base URL (always ends with `/`).
    pub server_url: Url,
    /// Progress advisory threshold. Zero disables the advisory.
    pub soft_timeout: Duration,
}

impl ClientConfig {
    /// Soft timeout in the form the progress indicator expects.
    pub fn soft_timeout_option(&self) -> Option<Duration> {
        (!self.soft_timeout.is_zero()).then_some(self.soft_timeout)
    }
}

/// Resolves configuration from overrides and an environment lookup.
///
/// # Errors
/// Returns [`ConfigError`] when the chosen URL or timeout is invalid.
pub fn resolve<F>(overrides: ConfigOverrides, env: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw_url = overrides
        .server_url
        .or_else(|| non_blank(env(SERVER_URL_ENV)))
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let server_url = normalize_base_url(&raw_url).map_err(ConfigError::ServerUrl)?;

    let soft_timeout = match overrides.soft_timeout_secs {
        Some(secs) => Duration::from_secs(secs),
        None => match non_blank(env(SOFT_TIMEOUT_ENV)) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::SoftTimeout(raw))?,
            None => DEFAULT_SOFT_TIMEOUT,
        },
    };

    Ok(ClientConfig {
        server_url,
        soft_timeout,
    })
}

/// Resolves configuration against the process environment.
///
/// # Errors
/// See [`resolve`].
pub fn resolve_from_env(overrides: ConfigOverrides) -> Result<ClientConfig, ConfigError> {
    resolve(overrides, |key| std::env::var(key).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Service URL rejected.
    #[error("invalid server url: {0}")]
    ServerUrl(TransportFault),
    /// Soft timeout is not a whole number of seconds.
    #[error("invalid WAVHIDE_SOFT_TIMEOUT_SECS value: {0:?}")]
    SoftTimeout(String),
}
