#![warn(missing_docs)]
//! # wavhide-contract
//!
//! ## Purpose
//! Defines the wire bodies of the remote steganography service and maps them
//! into the report model of [`wavhide_core`].
//!
//! ## Responsibilities
//! - Parse upload, encode and decode success bodies.
//! - Parse structured error bodies leniently, since they arrive on failure
//!   paths where the server may not have produced valid JSON at all.
//! - Keep server insertion order for metrics and section timings.
//!
//! ## Data flow
//! Raw response bytes -> `parse_*_response` -> [`wavhide_core::SuccessReport`]
//! or [`UploadedFileRef`]. Non-success bodies -> [`parse_structured_error`].
//!
//! ## Error model
//! Undecodable success bodies and missing mandatory fields return
//! [`ContractError`]. Optional telemetry that is malformed is dropped rather
//! than failing the whole report.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use wavhide_core::{
    DecodeReport, DecodeResult, EncodeReport, MetricEntry, MetricScalar, MetricsReport,
    MetricsTree, PlotRef, ResourceSeries, SectionTimings, SuccessReport, UploadedFileRef,
};

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier of the stored upload.
    pub file_id: String,
    /// Original file name echoed by the server.
    #[serde(default)]
    pub filename: Option<String>,
}

/// `resource_usage` block of an encode body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsageBody {
    /// CPU samples in percent.
    #[serde(default)]
    pub cpu_values: Option<Vec<f64>>,
    /// Memory samples in MB.
    #[serde(default)]
    pub memory_values: Option<Vec<f64>>,
    /// Sample timestamps.
    #[serde(default)]
    pub timestamps: Option<Vec<f64>>,
}

/// Body of a successful `POST /encode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeResponse {
    /// Identifier of the produced artifact (also the key id).
    pub file_id: String,
    /// Processing time in seconds.
    #[serde(default, rename = "processTime")]
    pub process_time: Option<f64>,
    /// Metric tree or `{ "error": "..." }`.
    #[serde(default)]
    pub metrics: Option<Value>,
    /// Section label to seconds.
    #[serde(default)]
    pub section_times: Option<Map<String, Value>>,
    /// Resource samples.
    #[serde(default)]
    pub resource_usage: Option<ResourceUsageBody>,
    /// Plot file names.
    #[serde(default)]
    pub plots: Option<Vec<String>>,
    /// Echo of the request flag.
    #[serde(default)]
    pub sequential: Option<bool>,
    /// Server-suggested artifact name.
    #[serde(default)]
    pub encoded_filename: Option<String>,
}

/// Body of a `POST /decode` that reached the extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeResponse {
    /// Whether a message was recovered.
    pub success: bool,
    /// Recovered message.
    #[serde(default)]
    pub message: Option<String>,
    /// Advisory note.
    #[serde(default)]
    pub note: Option<String>,
    /// Processing time in seconds.
    #[serde(default, rename = "processTime")]
    pub process_time: Option<f64>,
}

/// Structured error body returned with non-success statuses.
///
/// Every field is optional: the client must cope with partial bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    /// Primary error text.
    #[serde(default)]
    pub error: Option<String>,
    /// Secondary explanation.
    #[serde(default)]
    pub detalle: Option<String>,
    /// Diagnostic location (traceback).
    #[serde(default)]
    pub ubicacion: Option<String>,
    /// Failed internal decode attempts.
    #[serde(default)]
    pub intentos_fallidos: Option<Vec<String>>,
    /// Processing time until the failure.
    #[serde(default, rename = "processTime")]
    pub process_time: Option<f64>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status text.
    pub status: String,
    /// Server timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Parses an upload success body.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON and
/// [`ContractError::InvalidContract`] when `file_id` is blank.
pub fn parse_upload_response(raw: &[u8]) -> Result<UploadedFileRef, ContractError> {
    let parsed: UploadResponse = serde_json::from_slice(raw)?;
    let id = parsed.file_id.trim();
    if id.is_empty() {
        return Err(ContractError::InvalidContract(
            "file_id is empty".to_string(),
        ));
    }
    Ok(UploadedFileRef { id: id.to_string() })
}

/// Parses an encode success body into a report.
///
/// Absent optional fields stay `None`; they are "not available", not errors.
///
/// # Errors
/// Returns [`ContractError`] for invalid JSON or a blank `file_id`.
pub fn parse_encode_response(raw: &[u8]) -> Result<SuccessReport, ContractError> {
    let parsed: EncodeResponse = serde_json::from_slice(raw)?;
    encode_report(parsed).map(SuccessReport::Encode)
}

/// Parses a decode body that came with a success status.
///
/// `success: false` is a negative result, not an error.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
pub fn parse_decode_response(raw: &[u8]) -> Result<SuccessReport, ContractError> {
    let parsed: DecodeResponse = serde_json::from_slice(raw)?;
    Ok(SuccessReport::Decode(decode_report(parsed)))
}

/// Parses a structured error body.
///
/// Returns `None` when the body is not a JSON object, so callers can fall back
/// to status-based messages.
pub fn parse_structured_error(raw: &[u8]) -> Option<StructuredError> {
    match serde_json::from_slice::<Value>(raw).ok()? {
        Value::Object(map) => Some(StructuredError {
            error: string_field(&map, "error"),
            detalle: string_field(&map, "detalle"),
            ubicacion: string_field(&map, "ubicacion"),
            intentos_fallidos: map.get("intentos_fallidos").and_then(string_list),
            process_time: map.get("processTime").and_then(Value::as_f64),
        }),
        _ => None,
    }
}

/// Parses a health body.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
pub fn parse_health_response(raw: &[u8]) -> Result<HealthResponse, ContractError> {
    Ok(serde_json::from_slice(raw)?)
}

fn encode_report(body: EncodeResponse) -> Result<EncodeReport, ContractError> {
    let id = body.file_id.trim();
    if id.is_empty() {
        return Err(ContractError::InvalidContract(
            "file_id is empty".to_string(),
        ));
    }

    Ok(EncodeReport {
        file_ref: UploadedFileRef { id: id.to_string() },
        process_time_seconds: body.process_time,
        metrics: body.metrics.as_ref().and_then(metrics_report),
        section_timings: body.section_times.as_ref().map(section_timings),
        resource_series: body.resource_usage.map(resource_series),
        plots: body
            .plots
            .unwrap_or_default()
            .into_iter()
            .filter(|name| !name.trim().is_empty())
            .map(|filename| PlotRef { filename })
            .collect(),
    })
}

fn decode_report(body: DecodeResponse) -> DecodeReport {
    let result = if body.success {
        DecodeResult::Recovered {
            message: body.message.unwrap_or_default(),
            note: body.note.filter(|note| !note.trim().is_empty()),
        }
    } else {
        DecodeResult::NothingRecovered
    };

    DecodeReport {
        result,
        process_time_seconds: body.process_time,
    }
}

/// Converts a raw `metrics` value.
///
/// An object carrying a string `error` member is the server's
/// "metrics could not be computed" signal. Non-object values are ignored.
pub fn metrics_report(raw: &Value) -> Option<MetricsReport> {
    let map = raw.as_object()?;
    if let Some(Value::String(reason)) = map.get("error") {
        return Some(MetricsReport::Unavailable(reason.clone()));
    }

    let tree = map
        .iter()
        .map(|(category, value)| {
            let entry = match value {
                Value::Object(group) => MetricEntry::Group(
                    group
                        .iter()
                        .map(|(key, value)| (key.clone(), metric_scalar(value)))
                        .collect(),
                ),
                other => MetricEntry::Scalar(metric_scalar(other)),
            };
            (category.clone(), entry)
        })
        .collect();

    Some(MetricsReport::Values(MetricsTree(tree)))
}

fn metric_scalar(value: &Value) -> MetricScalar {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(number) => MetricScalar::Number(number),
            None => MetricScalar::Text(number.to_string()),
        },
        Value::String(text) => MetricScalar::Text(text.clone()),
        Value::Null => MetricScalar::Text("N/A".to_string()),
        other => MetricScalar::Text(other.to_string()),
    }
}

fn section_timings(raw: &Map<String, Value>) -> SectionTimings {
    SectionTimings(
        raw.iter()
            .filter_map(|(label, seconds)| Some((label.clone(), seconds.as_f64()?)))
            .collect(),
    )
}

fn resource_series(raw: ResourceUsageBody) -> ResourceSeries {
    ResourceSeries {
        timestamps: raw.timestamps.unwrap_or_default(),
        cpu_percent: raw.cpu_values.unwrap_or_default(),
        memory_mb: raw.memory_values.unwrap_or_default(),
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

/// Contract parsing errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure.
    #[error("response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("response contract violation: {0}")]
    InvalidContract(String),
}
