//! Fetching and saving server-hosted artifacts (stego audio, plots) and the
//! health probe.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use wavhide_contract::{HealthResponse, parse_health_response, parse_structured_error};
use wavhide_transport::{ServiceResponse, ServiceTransport};
use wavhide_ui::format::normalize_download_filename;

use crate::AppError;

/// Downloads the stego audio for `file_id` under a `.wav`-normalized name.
///
/// Returns the effective name and the bytes.
///
/// # Errors
/// Returns [`AppError::Transport`] when the service is unreachable and
/// [`AppError::Service`] for non-success statuses.
pub async fn fetch_artifact<T: ServiceTransport>(
    transport: &T,
    file_id: &str,
    filename: &str,
) -> Result<(String, Vec<u8>), AppError> {
    let filename = normalize_download_filename(filename);
    let response = transport.download(file_id, Some(&filename)).await?;
    let body = success_body(response)?;
    info!(file_id, filename = %filename, bytes = body.len(), "artifact downloaded");
    Ok((filename, body))
}

/// Downloads one diagnostic plot image.
///
/// # Errors
/// Same as [`fetch_artifact`].
pub async fn fetch_plot<T: ServiceTransport>(
    transport: &T,
    filename: &str,
) -> Result<Vec<u8>, AppError> {
    let response = transport.plot(filename).await?;
    let body = success_body(response)?;
    info!(filename, bytes = body.len(), "plot downloaded");
    Ok(body)
}

/// Queries `GET /health`.
///
/// # Errors
/// Returns [`AppError::Contract`] when the body is not a health document.
pub async fn check_health<T: ServiceTransport>(transport: &T) -> Result<HealthResponse, AppError> {
    let response = transport.health().await?;
    let body = success_body(response)?;
    Ok(parse_health_response(&body)?)
}

/// Writes `bytes` as `dir/<filename>`.
///
/// Only the final component of `filename` is used, so server-provided names
/// cannot escape `dir`.
///
/// # Errors
/// Returns [`AppError::InvalidFileName`] for names without a file component
/// and [`AppError::Io`] when writing fails.
pub fn save_artifact(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
    let name = Path::new(filename)
        .file_name()
        .ok_or_else(|| AppError::InvalidFileName(filename.to_string()))?;
    let path = dir.join(name);
    fs::write(&path, bytes).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn success_body(response: ServiceResponse) -> Result<Vec<u8>, AppError> {
    if response.is_success() {
        return Ok(response.body);
    }

    let message = parse_structured_error(&response.body)
        .and_then(|body| body.error.or(body.detalle))
        .unwrap_or_else(|| "sin detalle".to_string());
    Err(AppError::Service {
        status: response.status,
        message,
    })
}
