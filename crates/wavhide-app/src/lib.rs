#![warn(missing_docs)]
//! # wavhide-app
//!
//! ## Purpose
//! Orchestrates intake validation, the remote hide/extract workflow, progress
//! feedback and result rendering for `wavhide`.
//!
//! ## Responsibilities
//! - Run one operation per submission through [`orchestrator::Orchestrator`].
//! - Normalize every failure into one report shape ([`normalize`]).
//! - Resolve client configuration and install logging.
//! - Fetch and save server-hosted artifacts.
//!
//! ## Data flow
//! Form input -> validation -> upload -> encode (or decode) -> contract parsing
//! -> `SuccessReport`/`ErrorReport` -> `wavhide-ui` rendering.
//!
//! ## Ownership and lifetimes
//! The orchestrator owns its transport and progress indicator; each run borrows
//! them mutably, so one orchestrator never runs two operations at once.
//!
//! ## Error model
//! Workflow failures are data (`ErrorReport`), never panics or `Err` variants
//! of [`AppError`]. [`AppError`] covers the binary's own failures: bad
//! configuration, artifact downloads and local IO.
//!
//! ## Security and privacy notes
//! The hidden message is never logged; only its length is.

pub mod artifacts;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod orchestrator;

use std::path::PathBuf;

use thiserror::Error;
use time::{Date, OffsetDateTime};
use wavhide_contract::ContractError;
use wavhide_transport::TransportFault;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("WAVHIDE_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Local calendar date, falling back to UTC when the offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Binary-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    /// Service could not be reached.
    #[error("transport error: {0}")]
    Transport(#[from] TransportFault),
    /// Service answered with a body that breaks the contract.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
    /// Service answered with a non-success status.
    #[error("service returned HTTP {status}: {message}")]
    Service {
        /// HTTP status.
        status: u16,
        /// Service error text.
        message: String,
    },
    /// Name cannot be used as a local file name.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
    /// Local file could not be read or written.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}
