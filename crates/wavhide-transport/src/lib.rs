#![warn(missing_docs)]
//! # wavhide-transport
//!
//! ## Purpose
//! Implements the network seam between the workflow orchestrator and the
//! remote steganography service.
//!
//! ## Responsibilities
//! - Define the [`ServiceTransport`] trait the orchestrator is generic over.
//! - Provide [`HttpTransport`], the reqwest-backed implementation.
//! - Validate and normalize the service base URL.
//!
//! ## Data flow
//! Orchestrator -> [`ServiceTransport`] call -> [`ServiceResponse`] (status +
//! raw body) or [`TransportFault`]. Body interpretation lives in
//! `wavhide-contract`; this crate only moves bytes.
//!
//! ## Error model
//! A [`TransportFault`] means no HTTP response was observed at all. Any
//! response, whatever its status, is returned as a [`ServiceResponse`].
//!
//! ## Security and privacy notes
//! Request bodies (audio bytes, hidden messages) are never logged; only sizes
//! and paths are.

use std::future::Future;

use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;
use url::Url;
use wavhide_core::SelectedFile;

/// Raw response of one service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ServiceResponse {
    /// Creates a response from a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport to the remote service.
///
/// All methods return the raw response so callers decide how to interpret
/// non-success statuses.
pub trait ServiceTransport {
    /// `POST /upload` with the file as multipart field `file`.
    fn upload(
        &self,
        file: &SelectedFile,
    ) -> impl Future<Output = Result<ServiceResponse, TransportFault>>;

    /// `POST /encode` with form fields `file_id`, `message`, `sequential`.
    fn encode(
        &self,
        file_id: &str,
        message: &str,
        sequential: bool,
    ) -> impl Future<Output = Result<ServiceResponse, TransportFault>>;

    /// `POST /decode` with multipart fields `file`, `key_id`, `sequential`.
    fn decode(
        &self,
        file: &SelectedFile,
        key_id: &str,
        sequential: bool,
    ) -> impl Future<Output = Result<ServiceResponse, TransportFault>>;

    /// `GET /download/{file_id}`, optionally with a `filename` hint.
    fn download(
        &self,
        file_id: &str,
        filename: Option<&str>,
    ) -> impl Future<Output = Result<ServiceResponse, TransportFault>>;

    /// `GET /plot/{filename}`.
    fn plot(&self, filename: &str)
    -> impl Future<Output = Result<ServiceResponse, TransportFault>>;

    /// `GET /health`.
    fn health(&self) -> impl Future<Output = Result<ServiceResponse, TransportFault>>;
}

/// Service endpoint paths relative to the base URL.
pub mod paths {
    /// Upload endpoint.
    pub const UPLOAD: &str = "upload";
    /// Encode endpoint.
    pub const ENCODE: &str = "encode";
    /// Decode endpoint.
    pub const DECODE: &str = "decode";
    /// Download endpoint prefix.
    pub const DOWNLOAD: &str = "download";
    /// Plot endpoint prefix.
    pub const PLOT: &str = "plot";
    /// Health endpoint.
    pub const HEALTH: &str = "health";
}

/// reqwest-backed [`ServiceTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for a validated base URL.
    ///
    /// # Errors
    /// Returns [`TransportFault::InvalidEndpoint`] when the URL fails
    /// [`normalize_base_url`] or the HTTP client cannot be built.
    pub fn new(base: &str) -> Result<Self, TransportFault> {
        let base = normalize_base_url(base)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("wavhide/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| TransportFault::InvalidEndpoint(error.to_string()))?;
        Ok(Self { base, client })
    }

    /// Returns the normalized base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportFault> {
        self.base
            .join(path)
            .map_err(|error| TransportFault::InvalidEndpoint(format!("{path}: {error}")))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ServiceResponse, TransportFault> {
        let response = request.send().await.map_err(unreachable)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(unreachable)?;
        debug!(status, body_len = body.len(), "service responded");
        Ok(ServiceResponse::new(status, body.to_vec()))
    }
}

impl ServiceTransport for HttpTransport {
    async fn upload(&self, file: &SelectedFile) -> Result<ServiceResponse, TransportFault> {
        let url = self.endpoint(paths::UPLOAD)?;
        debug!(%url, bytes = file.bytes.len(), "uploading file");
        let form = Form::new().part("file", file_part(file));
        self.send(self.client.post(url).multipart(form)).await
    }

    async fn encode(
        &self,
        file_id: &str,
        message: &str,
        sequential: bool,
    ) -> Result<ServiceResponse, TransportFault> {
        let url = self.endpoint(paths::ENCODE)?;
        debug!(%url, file_id, message_len = message.len(), sequential, "requesting encode");
        let form = Form::new()
            .text("file_id", file_id.to_string())
            .text("message", message.to_string())
            .text("sequential", sequential.to_string());
        self.send(self.client.post(url).multipart(form)).await
    }

    async fn decode(
        &self,
        file: &SelectedFile,
        key_id: &str,
        sequential: bool,
    ) -> Result<ServiceResponse, TransportFault> {
        let url = self.endpoint(paths::DECODE)?;
        debug!(%url, bytes = file.bytes.len(), sequential, "requesting decode");
        let form = Form::new()
            .part("file", file_part(file))
            .text("sequential", sequential.to_string())
            .text("key_id", key_id.to_string());
        self.send(self.client.post(url).multipart(form)).await
    }

    async fn download(
        &self,
        file_id: &str,
        filename: Option<&str>,
    ) -> Result<ServiceResponse, TransportFault> {
        let url = download_url(&self.base, file_id, filename)?;
        debug!(%url, "downloading artifact");
        self.send(self.client.get(url)).await
    }

    async fn plot(&self, filename: &str) -> Result<ServiceResponse, TransportFault> {
        let url = plot_url(&self.base, filename)?;
        debug!(%url, "fetching plot");
        self.send(self.client.get(url)).await
    }

    async fn health(&self) -> Result<ServiceResponse, TransportFault> {
        let url = self.endpoint(paths::HEALTH)?;
        self.send(self.client.get(url)).await
    }
}

fn file_part(file: &SelectedFile) -> Part {
    Part::bytes(file.bytes.clone()).file_name(file.name.clone())
}

fn unreachable(error: reqwest::Error) -> TransportFault {
    TransportFault::Unreachable(error.to_string())
}

/// Builds `download/{file_id}` with an optional `filename` query.
///
/// # Errors
/// Returns [`TransportFault::InvalidEndpoint`] when the id cannot form a path.
pub fn download_url(
    base: &Url,
    file_id: &str,
    filename: Option<&str>,
) -> Result<Url, TransportFault> {
    let mut url = join_segment(base, paths::DOWNLOAD, file_id)?;
    if let Some(filename) = filename {
        url.query_pairs_mut().append_pair("filename", filename);
    }
    Ok(url)
}

/// Builds `plot/{filename}`.
///
/// # Errors
/// Returns [`TransportFault::InvalidEndpoint`] when the name cannot form a path.
pub fn plot_url(base: &Url, filename: &str) -> Result<Url, TransportFault> {
    join_segment(base, paths::PLOT, filename)
}

fn join_segment(base: &Url, prefix: &str, segment: &str) -> Result<Url, TransportFault> {
    if segment.trim().is_empty() {
        return Err(TransportFault::InvalidEndpoint(format!(
            "empty path segment for {prefix}"
        )));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| TransportFault::InvalidEndpoint("base url cannot be a base".to_string()))?
        .pop_if_empty()
        .push(prefix)
        .push(segment);
    Ok(url)
}

/// Validates a service base URL and normalizes it to end with `/`.
///
/// # Errors
/// Returns [`TransportFault::InvalidEndpoint`] for unparsable URLs, schemes
/// other than `http`/`https`, or URLs carrying a query or fragment.
pub fn normalize_base_url(raw: &str) -> Result<Url, TransportFault> {
    let mut url = Url::parse(raw.trim())
        .map_err(|error| TransportFault::InvalidEndpoint(format!("invalid service url: {error}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(TransportFault::InvalidEndpoint(
            "service url must use http or https".to_string(),
        ));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(TransportFault::InvalidEndpoint(
            "service url must not carry a query or fragment".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Failures where no response was observed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFault {
    /// Endpoint URL is invalid.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Connection could not be established or was interrupted.
    #[error("service unreachable: {0}")]
    Unreachable(String),
}
