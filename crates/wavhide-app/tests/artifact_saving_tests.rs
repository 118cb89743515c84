//! Integration tests for artifact download and local saving.

mod common;

use std::fs;

use common::{Call, ScriptedTransport, ok, status};
use wavhide_app::AppError;
use wavhide_app::artifacts::{check_health, fetch_artifact, fetch_plot, save_artifact};

#[tokio::test]
async fn artifact_saving_tests_download_forces_wav_name_and_saves_bytes() {
    let transport = ScriptedTransport::new(vec![ok("RIFFdata")]);
    let dir = tempfile::tempdir().expect("temp dir should be created");

    let (name, bytes) = fetch_artifact(&transport, "stego-7", "mezcla.wav.WAV")
        .await
        .expect("download should succeed");
    assert_eq!(name, "mezcla.wav");
    assert_eq!(
        transport.calls(),
        vec![Call::Download {
            file_id: "stego-7".to_string(),
            filename: Some("mezcla.wav".to_string()),
        }]
    );

    let path = save_artifact(dir.path(), &name, &bytes).expect("save should succeed");
    assert_eq!(path, dir.path().join("mezcla.wav"));
    assert_eq!(fs::read(&path).expect("saved file should exist"), b"RIFFdata");
}

#[tokio::test]
async fn artifact_saving_tests_server_names_cannot_escape_target_dir() {
    let dir = tempfile::tempdir().expect("temp dir should be created");

    let path =
        save_artifact(dir.path(), "../../etc/plot.png", b"png").expect("save should succeed");
    assert_eq!(path, dir.path().join("plot.png"));

    let error = save_artifact(dir.path(), "..", b"x").expect_err("no file component");
    assert!(matches!(error, AppError::InvalidFileName(_)));
}

#[tokio::test]
async fn artifact_saving_tests_missing_plot_reports_service_error() {
    let transport =
        ScriptedTransport::new(vec![status(404, r#"{"error":"Gráfica no encontrada"}"#)]);

    let error = fetch_plot(&transport, "audio_waveforms.png")
        .await
        .expect_err("missing plot should fail");
    match error {
        AppError::Service { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Gráfica no encontrada");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn artifact_saving_tests_health_probe_parses_status() {
    let transport = ScriptedTransport::new(vec![ok(
        r#"{"status":"ok","timestamp":"2024-05-09T10:00:00"}"#,
    )]);

    let health = check_health(&transport).await.expect("health should parse");
    assert_eq!(health.status, "ok");
    assert_eq!(health.timestamp.as_deref(), Some("2024-05-09T10:00:00"));
    assert_eq!(transport.calls(), vec![Call::Health]);
}
