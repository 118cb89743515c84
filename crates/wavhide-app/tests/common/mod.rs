//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use time::{Date, Month};
use wavhide_app::orchestrator::Orchestrator;
use wavhide_core::{OperationKind, RawFormInput, SelectedFile};
use wavhide_transport::{ServiceResponse, ServiceTransport, TransportFault, normalize_base_url};
use wavhide_ui::progress::{ProgressIndicator, ProgressSink};
use wavhide_ui::{RenderContext, ServiceLinks};

/// One observed transport call.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Upload { name: String },
    Encode { file_id: String, message: String, sequential: bool },
    Decode { name: String, key_id: String, sequential: bool },
    Download { file_id: String, filename: Option<String> },
    Plot { filename: String },
    Health,
}

type Scripted = Result<ServiceResponse, TransportFault>;

/// In-memory transport answering from a queue of scripted replies.
///
/// Unscripted calls fail as unreachable.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Call>>,
    panic_on_call: bool,
    stall: bool,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Transport that panics on its first call.
    pub fn panicking() -> Self {
        Self {
            panic_on_call: true,
            ..Self::default()
        }
    }

    /// Transport whose calls never complete.
    pub fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    async fn answer(&self, call: Call) -> Scripted {
        if self.stall {
            std::future::pending::<()>().await;
        }
        if self.panic_on_call {
            panic!("scripted transport failure on {call:?}");
        }
        self.calls.lock().expect("calls lock").push(call);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportFault::Unreachable("unscripted call".to_string())))
    }
}

impl ServiceTransport for ScriptedTransport {
    async fn upload(&self, file: &SelectedFile) -> Result<ServiceResponse, TransportFault> {
        self.answer(Call::Upload {
            name: file.name.clone(),
        })
        .await
    }

    async fn encode(
        &self,
        file_id: &str,
        message: &str,
        sequential: bool,
    ) -> Result<ServiceResponse, TransportFault> {
        self.answer(Call::Encode {
            file_id: file_id.to_string(),
            message: message.to_string(),
            sequential,
        })
        .await
    }

    async fn decode(
        &self,
        file: &SelectedFile,
        key_id: &str,
        sequential: bool,
    ) -> Result<ServiceResponse, TransportFault> {
        self.answer(Call::Decode {
            name: file.name.clone(),
            key_id: key_id.to_string(),
            sequential,
        })
        .await
    }

    async fn download(
        &self,
        file_id: &str,
        filename: Option<&str>,
    ) -> Result<ServiceResponse, TransportFault> {
        self.answer(Call::Download {
            file_id: file_id.to_string(),
            filename: filename.map(str::to_string),
        })
        .await
    }

    async fn plot(&self, filename: &str) -> Result<ServiceResponse, TransportFault> {
        self.answer(Call::Plot {
            filename: filename.to_string(),
        })
        .await
    }

    async fn health(&self) -> Result<ServiceResponse, TransportFault> {
        self.answer(Call::Health).await
    }
}

/// Progress sink recording `Some(text)` for shows and `None` for clears.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Option<String>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn events(&self) -> Vec<Option<String>> {
        self.events.lock().expect("events lock").clone()
    }

    pub fn shown(&self) -> Vec<String> {
        self.events().into_iter().flatten().collect()
    }
}

impl ProgressSink for RecordingSink {
    fn show(&self, text: &str) {
        self.events
            .lock()
            .expect("events lock")
            .push(Some(text.to_string()));
    }

    fn clear(&self) {
        self.events.lock().expect("events lock").push(None);
    }
}

/// Builds an orchestrator over scripted replies plus its recording sink.
#[allow(dead_code)]
pub fn orchestrator(
    replies: Vec<Scripted>,
) -> (Orchestrator<ScriptedTransport>, Arc<RecordingSink>) {
    with_transport(ScriptedTransport::new(replies))
}

#[allow(dead_code)]
pub fn with_transport(
    transport: ScriptedTransport,
) -> (Orchestrator<ScriptedTransport>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let progress = ProgressIndicator::new(sink.clone());
    (Orchestrator::new(transport, progress), sink)
}

#[allow(dead_code)]
pub fn ok(body: &str) -> Scripted {
    Ok(ServiceResponse::new(200, body.as_bytes().to_vec()))
}

#[allow(dead_code)]
pub fn status(code: u16, body: &str) -> Scripted {
    Ok(ServiceResponse::new(code, body.as_bytes().to_vec()))
}

#[allow(dead_code)]
pub fn unreachable() -> Scripted {
    Err(TransportFault::Unreachable("connection refused".to_string()))
}

#[allow(dead_code)]
pub fn wav_file() -> SelectedFile {
    SelectedFile::new("voz.wav", vec![0x52, 0x49, 0x46, 0x46, 0, 0, 0, 0])
}

#[allow(dead_code)]
pub fn hide_input(message: &str) -> RawFormInput {
    RawFormInput {
        operation: OperationKind::Encode,
        file: Some(wav_file()),
        message: message.to_string(),
        key_id: String::new(),
        sequential: false,
    }
}

#[allow(dead_code)]
pub fn extract_input(key_id: &str) -> RawFormInput {
    RawFormInput {
        operation: OperationKind::Decode,
        file: Some(wav_file()),
        message: String::new(),
        key_id: key_id.to_string(),
        sequential: true,
    }
}

#[allow(dead_code)]
pub fn render_context() -> RenderContext {
    RenderContext {
        links: ServiceLinks::new(
            normalize_base_url("http://localhost:8000").expect("fixture url should be valid"),
        ),
        today: Date::from_calendar_date(2024, Month::May, 9).expect("fixture date should be valid"),
    }
}

#[allow(dead_code)]
pub const UPLOAD_OK: &str = r#"{"file_id":"up-1","filename":"voz.wav"}"#;

#[allow(dead_code)]
pub const ENCODE_OK: &str = r#"{
  "success": true,
  "file_id": "stego-7",
  "processTime": 75.4,
  "metrics": {"mse_psnr": {"mse": 0.000012, "psnr": 48}, "ber": 0},
  "section_times": {"Carga de audio": 0.5, "Inserción": 1.25},
  "resource_usage": {"cpu_values": [10.0, 30.0], "memory_values": [100.0, 120.5], "timestamps": [0.0, 1.0]},
  "plots": ["audio_waveforms.png", "phase_plot.png"],
  "sequential": false,
  "encoded_filename": "stego-7.wav"
}"#;
