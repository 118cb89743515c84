//! Folds every failure kind into one [`ErrorReport`].

use wavhide_contract::parse_structured_error;
use wavhide_core::{ErrorReport, ValidationFault};
use wavhide_transport::TransportFault;

/// Remote stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// `POST /upload`.
    Upload,
    /// `POST /encode`.
    Encode,
    /// `POST /decode`.
    Decode,
}

impl Stage {
    /// Short lowercase name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Encode => "encode",
            Self::Decode => "decode",
        }
    }

    fn connection_message(self) -> &'static str {
        match self {
            Self::Upload => "Error de conexión al servidor. Verifique su conexión a internet.",
            Self::Encode => concat!(
                "Error de conexión al servidor durante la codificación. ",
                "Verifique su conexión a internet."
            ),
            Self::Decode => concat!(
                "Error de conexión al servidor durante la decodificación. ",
                "Verifique su conexión a internet."
            ),
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::Upload => "Error al subir archivo",
            Self::Encode => "Error al codificar mensaje",
            Self::Decode => "Error al extraer mensaje",
        }
    }
}

/// Raw failure, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureSource {
    /// No HTTP response was observed.
    Transport {
        /// Failing stage.
        stage: Stage,
        /// Transport fault.
        fault: TransportFault,
    },
    /// Non-success status with a (possibly structured) body.
    Structured {
        /// Failing stage.
        stage: Stage,
        /// HTTP status.
        status: u16,
        /// Raw body.
        body: Vec<u8>,
    },
    /// Success status whose body broke the contract.
    MalformedResponse {
        /// Failing stage.
        stage: Stage,
        /// Parser error text.
        reason: String,
    },
    /// Local intake failure.
    Validation(ValidationFault),
}

/// Guidance shown for an intake failure.
pub fn validation_message(fault: ValidationFault) -> &'static str {
    match fault {
        ValidationFault::MissingFile => "Debe seleccionar un archivo de audio.",
        ValidationFault::MissingMessage => "Debe ingresar un mensaje para ocultar.",
        ValidationFault::MissingKeyId => {
            "Debe ingresar el ID de la llave generada durante la codificación."
        }
    }
}

/// Converts a failure into the report shown to the user.
///
/// Blank strings in structured bodies count as absent; absent fields stay
/// empty in the report. Failed attempts are only kept for the decode stage.
pub fn normalize(source: FailureSource) -> ErrorReport {
    match source {
        FailureSource::Validation(fault) => ErrorReport::message_only(validation_message(fault)),
        FailureSource::Transport { stage, .. } => {
            ErrorReport::message_only(stage.connection_message())
        }
        FailureSource::MalformedResponse { stage, reason } => ErrorReport {
            message: stage.default_message().to_string(),
            detail: Some(format!("Respuesta inválida del servidor: {reason}")),
            ..ErrorReport::default()
        },
        FailureSource::Structured {
            stage,
            status,
            body,
        } => structured(stage, status, &body),
    }
}

fn structured(stage: Stage, status: u16, body: &[u8]) -> ErrorReport {
    let Some(parsed) = parse_structured_error(body) else {
        return ErrorReport {
            message: stage.default_message().to_string(),
            detail: Some(format!("HTTP {status}")),
            ..ErrorReport::default()
        };
    };

    let (message, detail) = match (parsed.error, parsed.detalle) {
        (Some(error), detalle) => (error, detalle),
        (None, Some(detalle)) if stage == Stage::Upload => (detalle, None),
        (None, detalle) => (stage.default_message().to_string(), detalle),
    };

    ErrorReport {
        message,
        detail,
        location: parsed.ubicacion,
        failed_attempts: match stage {
            Stage::Decode => parsed.intentos_fallidos.unwrap_or_default(),
            Stage::Upload | Stage::Encode => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_faults_carry_only_the_stage_message() {
        let report = normalize(FailureSource::Transport {
            stage: Stage::Decode,
            fault: TransportFault::Unreachable("refused".to_string()),
        });
        assert!(report.message.contains("durante la decodificación"));
        assert_eq!(report.detail, None);
        assert_eq!(report.location, None);
        assert!(report.failed_attempts.is_empty());
    }

    #[test]
    fn upload_error_falls_back_to_detalle() {
        let report = normalize(FailureSource::Structured {
            stage: Stage::Upload,
            status: 400,
            body: br#"{"detalle":"El archivo seleccionado no tiene formato WAV."}"#.to_vec(),
        });
        assert_eq!(report.message, "El archivo seleccionado no tiene formato WAV.");
        assert_eq!(report.detail, None);
    }

    #[test]
    fn failed_attempts_only_survive_for_decode() {
        let body = br#"{"error":"fallo","detalle":"d","intentos_fallidos":["x","y"]}"#;
        for stage in [Stage::Upload, Stage::Encode] {
            let report = normalize(FailureSource::Structured {
                stage,
                status: 500,
                body: body.to_vec(),
            });
            assert!(report.failed_attempts.is_empty(), "{stage:?}");
        }

        let report = normalize(FailureSource::Structured {
            stage: Stage::Decode,
            status: 404,
            body: body.to_vec(),
        });
        assert_eq!(report.failed_attempts, vec!["x".to_string(), "y".to_string()]);
    }
}
