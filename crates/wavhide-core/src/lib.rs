#![warn(missing_docs)]
//! # wavhide-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `wavhide` workspace.
//!
//! ## Responsibilities
//! - Represent the raw intake form and its validated operation request.
//! - Represent the uniform success/error reports produced by one workflow run.
//! - Hold the loosely-typed server telemetry (metrics, timings, resource series)
//!   in ordered, display-ready shapes.
//!
//! ## Data flow
//! The CLI builds a [`RawFormInput`]. [`validate_form`] turns it into a
//! [`ValidatedOperation`] or a [`ValidationFault`]. A workflow run then ends in
//! either a [`SuccessReport`] or an [`ErrorReport`], never both.
//!
//! ## Ownership and lifetimes
//! Reports own all of their strings and buffers so the renderer can keep them
//! after the transport response buffers are dropped.
//!
//! ## Error model
//! Intake validation failures are [`ValidationFault`] values. Every other
//! failure kind is folded into [`ErrorReport`] by the application layer.
//!
//! ## Example
//! ```rust
//! use wavhide_core::{OperationKind, RawFormInput, SelectedFile, validate_form};
//!
//! let input = RawFormInput {
//!     operation: OperationKind::Decode,
//!     file: Some(SelectedFile::new("carrier.wav", vec![0; 44])),
//!     message: String::new(),
//!     key_id: "  3f2a  ".to_string(),
//!     sequential: false,
//! };
//! let validated = validate_form(input).unwrap();
//! assert_eq!(validated.file.name, "carrier.wav");
//! ```

use serde::Serialize;
use thiserror::Error;

/// File chosen by the user for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as presented to the service (used for the `.wav` check).
    pub name: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Creates a selected file from a name and its bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Which of the two submit controls was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    /// Hide a message inside an audio file.
    Encode,
    /// Extract a previously hidden message.
    Decode,
}

/// Unvalidated intake form exactly as the user filled it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFormInput {
    /// Selected operation.
    pub operation: OperationKind,
    /// Selected file, if any.
    pub file: Option<SelectedFile>,
    /// Message to hide (encode only).
    pub message: String,
    /// Key identifier from a previous hide operation (decode only).
    pub key_id: String,
    /// Sequential embedding/extraction strategy flag.
    pub sequential: bool,
}

/// Validated operation parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    /// Hide `message` in the uploaded file.
    Encode {
        /// Message to embed, exactly as typed.
        message: String,
        /// Sequential strategy flag.
        sequential: bool,
    },
    /// Extract the message correlated with `key_id`.
    Decode {
        /// Trimmed key identifier.
        key_id: String,
        /// Sequential strategy flag.
        sequential: bool,
    },
}

impl OperationRequest {
    /// Returns the operation kind of this request.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Encode { .. } => OperationKind::Encode,
            Self::Decode { .. } => OperationKind::Decode,
        }
    }
}

/// Output of successful intake validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOperation {
    /// File to send.
    pub file: SelectedFile,
    /// Operation parameters.
    pub request: OperationRequest,
}

/// Local, pre-network intake failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFault {
    /// No file was selected.
    #[error("no audio file selected")]
    MissingFile,
    /// Hide operation without a message.
    #[error("message to hide is empty")]
    MissingMessage,
    /// Extract operation without a key id.
    #[error("key id is empty")]
    MissingKeyId,
}

/// Validates the intake form.
///
/// File presence is checked before the operation-specific field, so an empty
/// form always reports [`ValidationFault::MissingFile`].
///
/// # Errors
/// Returns the first [`ValidationFault`] found.
pub fn validate_form(input: RawFormInput) -> Result<ValidatedOperation, ValidationFault> {
    let file = input.file.ok_or(ValidationFault::MissingFile)?;

    let request = match input.operation {
        OperationKind::Encode => {
            if input.message.trim().is_empty() {
                return Err(ValidationFault::MissingMessage);
            }
            OperationRequest::Encode {
                message: input.message,
                sequential: input.sequential,
            }
        }
        OperationKind::Decode => {
            let key_id = input.key_id.trim();
            if key_id.is_empty() {
                return Err(ValidationFault::MissingKeyId);
            }
            OperationRequest::Decode {
                key_id: key_id.to_string(),
                sequential: input.sequential,
            }
        }
    };

    Ok(ValidatedOperation { file, request })
}

/// Opaque handle returned by the upload stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFileRef {
    /// Server-side file identifier.
    pub id: String,
}

/// Uniform failure report shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Concise, always-present message.
    pub message: String,
    /// Secondary explanation.
    pub detail: Option<String>,
    /// Diagnostic location (server traceback or similar).
    pub location: Option<String>,
    /// Failed internal attempts reported by a decode.
    pub failed_attempts: Vec<String>,
}

impl ErrorReport {
    /// Creates a report carrying only a message.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Leaf metric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricScalar {
    /// Numeric measure.
    Number(f64),
    /// Textual measure (also used for values the client cannot interpret).
    Text(String),
}

/// One metric category: either a single value or a group of named values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricEntry {
    /// Category with one value.
    Scalar(MetricScalar),
    /// Category with named sub-values, in server order.
    Group(Vec<(String, MetricScalar)>),
}

/// Ordered metric categories. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsTree(pub Vec<(String, MetricEntry)>);

impl MetricsTree {
    /// Returns `true` when the tree has no categories.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, MetricEntry)> {
        self.0.iter()
    }
}

/// Metrics block of an encode result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetricsReport {
    /// Metrics computed by the server.
    Values(MetricsTree),
    /// The server signalled that metrics could not be computed.
    Unavailable(String),
}

/// Ordered section label to elapsed seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionTimings(pub Vec<(String, f64)>);

impl SectionTimings {
    /// Sum of all section seconds, in insertion order.
    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, seconds)| seconds).sum()
    }

    /// Returns `true` when no section was reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// CPU/memory samples taken while the server processed the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceSeries {
    /// Sample timestamps.
    pub timestamps: Vec<f64>,
    /// CPU usage in percent.
    pub cpu_percent: Vec<f64>,
    /// Resident memory in MB.
    pub memory_mb: Vec<f64>,
}

impl ResourceSeries {
    /// Returns `true` when all three series have the same non-zero length.
    ///
    /// A series that fails this check is treated as absent by the renderer.
    pub fn is_usable(&self) -> bool {
        let len = self.timestamps.len();
        len > 0 && self.cpu_percent.len() == len && self.memory_mb.len() == len
    }
}

/// Reference to a server-hosted diagnostic image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotRef {
    /// Image file name on the server.
    pub filename: String,
}

/// Successful hide operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeReport {
    /// Produced artifact. Its id doubles as the key id for extraction.
    pub file_ref: UploadedFileRef,
    /// Server processing time.
    pub process_time_seconds: Option<f64>,
    /// Quality metrics.
    pub metrics: Option<MetricsReport>,
    /// Per-section timings.
    pub section_timings: Option<SectionTimings>,
    /// Resource usage samples.
    pub resource_series: Option<ResourceSeries>,
    /// Diagnostic plots, in server order.
    pub plots: Vec<PlotRef>,
}

/// Outcome of an extract call that completed on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DecodeResult {
    /// A message was recovered.
    Recovered {
        /// Extracted message.
        message: String,
        /// Advisory note (for example a possibly corrupt message).
        note: Option<String>,
    },
    /// The call succeeded but no message could be recovered.
    NothingRecovered,
}

/// Successful extract operation (including the negative result).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeReport {
    /// Recovered message or negative result.
    pub result: DecodeResult,
    /// Server processing time.
    pub process_time_seconds: Option<f64>,
}

/// Success side of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SuccessReport {
    /// Hide operation result.
    Encode(EncodeReport),
    /// Extract operation result.
    Decode(DecodeReport),
}

#[cfg(test)]
mod tests {
    //! Unit tests for intake validation and report helpers.

    use super::*;

    fn form(operation: OperationKind) -> RawFormInput {
        RawFormInput {
            operation,
            file: Some(SelectedFile::new("a.wav", vec![1, 2, 3])),
            message: String::new(),
            key_id: String::new(),
            sequential: true,
        }
    }

    #[test]
    fn missing_file_wins_over_missing_field() {
        let mut input = form(OperationKind::Encode);
        input.file = None;
        assert_eq!(validate_form(input), Err(ValidationFault::MissingFile));
    }

    #[test]
    fn whitespace_message_is_rejected() {
        let mut input = form(OperationKind::Encode);
        input.message = "   ".to_string();
        assert_eq!(validate_form(input), Err(ValidationFault::MissingMessage));
    }

    #[test]
    fn encode_keeps_message_verbatim() {
        let mut input = form(OperationKind::Encode);
        input.message = " hola ".to_string();
        let validated = validate_form(input).expect("form should validate");
        assert_eq!(
            validated.request,
            OperationRequest::Encode {
                message: " hola ".to_string(),
                sequential: true,
            }
        );
    }

    #[test]
    fn decode_trims_key_id() {
        let mut input = form(OperationKind::Decode);
        input.key_id = "\tkey-1 ".to_string();
        let validated = validate_form(input).expect("form should validate");
        assert_eq!(validated.request.kind(), OperationKind::Decode);
        assert_eq!(
            validated.request,
            OperationRequest::Decode {
                key_id: "key-1".to_string(),
                sequential: true,
            }
        );
    }

    #[test]
    fn resource_series_requires_equal_non_zero_lengths() {
        let mut series = ResourceSeries::default();
        assert!(!series.is_usable());

        series.timestamps = vec![0.0, 1.0];
        series.cpu_percent = vec![10.0, 20.0];
        series.memory_mb = vec![100.0];
        assert!(!series.is_usable());

        series.memory_mb.push(120.0);
        assert!(series.is_usable());
    }

    #[test]
    fn section_total_is_computed_not_stored() {
        let timings = SectionTimings(vec![("a".to_string(), 0.25), ("b".to_string(), 1.5)]);
        assert_eq!(timings.total(), 1.75);
    }
}
