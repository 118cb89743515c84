//! Integration tests for intake validation before any network call.

mod common;

use common::{extract_input, hide_input};
use wavhide_core::{OperationKind, RawFormInput};

#[tokio::test]
async fn intake_validation_tests_missing_file_never_reaches_network() {
    let (mut orchestrator, sink) = common::orchestrator(vec![common::ok(common::UPLOAD_OK)]);
    let input = RawFormInput {
        file: None,
        ..hide_input("hola")
    };

    let report = orchestrator
        .run(input)
        .await
        .expect_err("missing file should fail");

    assert_eq!(report.message, "Debe seleccionar un archivo de audio.");
    assert!(orchestrator.transport().calls().is_empty());
    assert!(sink.events().is_empty());
    assert!(orchestrator.controls().can_submit());
}

#[tokio::test]
async fn intake_validation_tests_missing_file_is_reported_before_missing_key() {
    let (mut orchestrator, _sink) = common::orchestrator(vec![]);
    let input = RawFormInput {
        operation: OperationKind::Decode,
        file: None,
        message: String::new(),
        key_id: "  ".to_string(),
        sequential: false,
    };

    let report = orchestrator.run(input).await.expect_err("should fail");
    assert_eq!(report.message, "Debe seleccionar un archivo de audio.");
}

#[tokio::test]
async fn intake_validation_tests_blank_message_and_key_are_rejected_locally() {
    let (mut orchestrator, sink) = common::orchestrator(vec![]);

    let report = orchestrator
        .run(hide_input("   \n"))
        .await
        .expect_err("blank message should fail");
    assert_eq!(report.message, "Debe ingresar un mensaje para ocultar.");

    let report = orchestrator
        .run(extract_input(""))
        .await
        .expect_err("blank key should fail");
    assert_eq!(
        report.message,
        "Debe ingresar el ID de la llave generada durante la codificación."
    );
    assert_eq!(report.detail, None);

    assert!(orchestrator.transport().calls().is_empty());
    assert!(sink.events().is_empty());
}
