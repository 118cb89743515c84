//! Runs one hide or extract operation end to end.
//!
//! The orchestrator owns the transport, the progress indicator and the submit
//! controls. Each [`Orchestrator::run`] validates the form, disables both
//! submit controls, drives the remote stages in order and stops the indicator
//! on every exit path.

use tracing::{debug, info, warn};
use wavhide_contract::{
    ContractError, parse_decode_response, parse_encode_response, parse_upload_response,
};
use wavhide_core::{
    ErrorReport, OperationRequest, RawFormInput, SelectedFile, SuccessReport, validate_form,
};
use wavhide_transport::{ServiceResponse, ServiceTransport, TransportFault};
use wavhide_ui::SubmitControls;
use wavhide_ui::progress::{ActiveProgress, ProgressIndicator};

use crate::normalize::{FailureSource, Stage, normalize};

/// Indicator text while the file is uploaded for a hide operation.
pub const UPLOADING_MESSAGE: &str = "Procesando audio y ocultando mensaje...";

/// Indicator text while the service embeds the message.
pub const ENCODING_MESSAGE: &str = "Ocultando mensaje en el audio...";

/// Indicator text while the service extracts a message.
pub const DECODING_MESSAGE: &str = "Extrayendo mensaje oculto del audio...";

/// Workflow orchestrator over a [`ServiceTransport`].
pub struct Orchestrator<T> {
    transport: T,
    progress: ProgressIndicator,
    controls: SubmitControls,
}

impl<T: ServiceTransport> Orchestrator<T> {
    /// Creates an orchestrator with enabled submit controls.
    pub fn new(transport: T, progress: ProgressIndicator) -> Self {
        Self {
            transport,
            progress,
            controls: SubmitControls::new(),
        }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the current submit-control state.
    pub fn controls(&self) -> SubmitControls {
        self.controls
    }

    /// Returns `true` while the progress indicator runs.
    pub fn progress_active(&self) -> bool {
        self.progress.is_active()
    }

    /// Runs one operation and returns exactly one outcome.
    ///
    /// Intake failures never reach the network or the progress indicator.
    /// Runs are serialized by the `&mut self` borrow; the submit controls
    /// mirror that state and stay disabled until the run returns.
    pub async fn run(&mut self, input: RawFormInput) -> Result<SuccessReport, ErrorReport> {
        let operation = input.operation;
        let validated = validate_form(input).map_err(|fault| {
            warn!(?operation, %fault, "intake rejected");
            normalize(FailureSource::Validation(fault))
        })?;

        let Self {
            transport,
            progress,
            controls,
        } = self;

        // `run` borrows the orchestrator exclusively, so no other run holds the
        // controls here.
        let acquired = controls.acquire();
        debug_assert!(acquired, "submit controls already held");

        let file = validated.file;
        match validated.request {
            OperationRequest::Encode {
                message,
                sequential,
            } => {
                let mut in_flight = InFlight {
                    progress: progress.begin(UPLOADING_MESSAGE),
                    controls,
                };
                hide(transport, &mut in_flight.progress, &file, &message, sequential).await
            }
            OperationRequest::Decode { key_id, sequential } => {
                let _in_flight = InFlight {
                    progress: progress.begin(DECODING_MESSAGE),
                    controls,
                };
                extract(transport, &file, &key_id, sequential).await
            }
        }
    }
}

/// Holds the submit controls and the running indicator for one operation.
struct InFlight<'a> {
    progress: ActiveProgress<'a>,
    controls: &'a mut SubmitControls,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.controls.release();
    }
}

async fn hide<T: ServiceTransport>(
    transport: &T,
    progress: &mut ActiveProgress<'_>,
    file: &SelectedFile,
    message: &str,
    sequential: bool,
) -> Result<SuccessReport, ErrorReport> {
    info!(
        stage = Stage::Upload.as_str(),
        file = %file.name,
        bytes = file.bytes.len(),
        "uploading audio"
    );
    let response = transport
        .upload(file)
        .await
        .map_err(|fault| transport_failure(Stage::Upload, fault))?;
    let file_ref = accept(Stage::Upload, response, parse_upload_response)?;
    debug!(file_id = %file_ref.id, "upload accepted");

    progress.update(ENCODING_MESSAGE);
    info!(
        stage = Stage::Encode.as_str(),
        file_id = %file_ref.id,
        message_len = message.chars().count(),
        sequential,
        "requesting encode"
    );
    let response = transport
        .encode(&file_ref.id, message, sequential)
        .await
        .map_err(|fault| transport_failure(Stage::Encode, fault))?;
    accept(Stage::Encode, response, parse_encode_response)
}

async fn extract<T: ServiceTransport>(
    transport: &T,
    file: &SelectedFile,
    key_id: &str,
    sequential: bool,
) -> Result<SuccessReport, ErrorReport> {
    info!(
        stage = Stage::Decode.as_str(),
        file = %file.name,
        bytes = file.bytes.len(),
        key_id,
        sequential,
        "requesting decode"
    );
    let response = transport
        .decode(file, key_id, sequential)
        .await
        .map_err(|fault| transport_failure(Stage::Decode, fault))?;
    accept(Stage::Decode, response, parse_decode_response)
}

fn transport_failure(stage: Stage, fault: TransportFault) -> ErrorReport {
    warn!(stage = stage.as_str(), %fault, "service unreachable");
    normalize(FailureSource::Transport { stage, fault })
}

fn accept<R>(
    stage: Stage,
    response: ServiceResponse,
    parse: fn(&[u8]) -> Result<R, ContractError>,
) -> Result<R, ErrorReport> {
    if !response.is_success() {
        warn!(stage = stage.as_str(), status = response.status, "service rejected request");
        return Err(normalize(FailureSource::Structured {
            stage,
            status: response.status,
            body: response.body,
        }));
    }

    parse(&response.body).map_err(|error| {
        warn!(stage = stage.as_str(), %error, "malformed service response");
        normalize(FailureSource::MalformedResponse {
            stage,
            reason: error.to_string(),
        })
    })
}
