//! Validates contract fixtures against frozen JSON schemas and checks that the
//! client parsers accept every fixture.

use std::path::PathBuf;

use jsonschema::JSONSchema;
use serde_json::Value;
use wavhide_contract::{
    parse_decode_response, parse_encode_response, parse_structured_error, parse_upload_response,
};
use wavhide_contract_tests::{fixture_path, schema_path};
use wavhide_core::{DecodeResult, MetricsReport, SuccessReport};

fn read(path: PathBuf) -> String {
    std::fs::read_to_string(path).expect("contract file should be readable")
}

fn load_json(path: PathBuf) -> Value {
    serde_json::from_str(&read(path)).expect("json file should be valid")
}

fn compile_validator(name: &str) -> JSONSchema {
    let schema = load_json(schema_path(name));
    JSONSchema::compile(&schema).expect("schema should compile")
}

fn assert_fixture_valid(name: &str) -> String {
    let validator = compile_validator(name);
    let raw = read(fixture_path(name));
    let fixture: Value = serde_json::from_str(&raw).expect("fixture should be valid json");
    assert!(
        validator.is_valid(&fixture),
        "{name} fixture should validate against schema"
    );
    raw
}

#[test]
fn upload_fixture_matches_schema_and_parses() {
    let raw = assert_fixture_valid("upload-response");
    let file_ref = parse_upload_response(raw.as_bytes()).expect("upload fixture should parse");
    assert_eq!(file_ref.id, "3f2b9c1e-upload");
}

#[test]
fn encode_fixture_matches_schema_and_parses() {
    let raw = assert_fixture_valid("encode-response");
    let report = parse_encode_response(raw.as_bytes()).expect("encode fixture should parse");

    let SuccessReport::Encode(report) = report else {
        panic!("expected encode report");
    };
    assert_eq!(report.plots.len(), 3);
    assert!(matches!(report.metrics, Some(MetricsReport::Values(_))));
    assert!(report.resource_series.as_ref().is_some_and(|series| series.is_usable()));
}

#[test]
fn decode_fixture_matches_schema_and_parses() {
    let raw = assert_fixture_valid("decode-response");
    let report = parse_decode_response(raw.as_bytes()).expect("decode fixture should parse");

    let SuccessReport::Decode(report) = report else {
        panic!("expected decode report");
    };
    assert!(matches!(report.result, DecodeResult::Recovered { .. }));
}

#[test]
fn structured_error_fixture_matches_schema_and_parses() {
    let raw = assert_fixture_valid("structured-error");
    let parsed = parse_structured_error(raw.as_bytes()).expect("error fixture should parse");
    assert_eq!(parsed.intentos_fallidos.map(|attempts| attempts.len()), Some(2));
}

#[test]
fn encode_schema_rejects_missing_file_id() {
    let validator = compile_validator("encode-response");
    let body = serde_json::json!({ "success": true, "processTime": 1.0 });
    assert!(!validator.is_valid(&body));
}
