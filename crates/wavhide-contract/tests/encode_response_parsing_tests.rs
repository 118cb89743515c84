//! Tests encode response parsing against service-shaped bodies.

use wavhide_contract::{ContractError, parse_encode_response, parse_upload_response};
use wavhide_core::{MetricEntry, MetricScalar, MetricsReport, SuccessReport};

#[test]
fn encode_response_parsing_tests_keeps_server_order() {
    let raw = br#"{
        "file_id": "stego-1",
        "processTime": 2.5,
        "metrics": {"snr": 31.2, "distorsion": {"max_diff": 3, "mean_diff": null}},
        "section_times": {"z_ultimo": 0.1, "a_primero": 0.2},
        "plots": ["b.png", "", "a.png"]
    }"#;

    let SuccessReport::Encode(report) = parse_encode_response(raw).expect("body should parse")
    else {
        panic!("expected encode report");
    };

    assert_eq!(report.file_ref.id, "stego-1");
    assert_eq!(report.process_time_seconds, Some(2.5));

    let Some(MetricsReport::Values(tree)) = report.metrics else {
        panic!("metrics should be values");
    };
    let categories: Vec<&str> = tree.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(categories, vec!["snr", "distorsion"]);
    assert_eq!(
        tree.0[1].1,
        MetricEntry::Group(vec![
            ("max_diff".to_string(), MetricScalar::Number(3.0)),
            ("mean_diff".to_string(), MetricScalar::Text("N/A".to_string())),
        ])
    );

    let timings = report.section_timings.expect("timings should parse");
    assert_eq!(timings.0[0].0, "z_ultimo");
    assert!((timings.total() - 0.3).abs() < 1e-9);

    let plots: Vec<&str> = report.plots.iter().map(|plot| plot.filename.as_str()).collect();
    assert_eq!(plots, vec!["b.png", "a.png"]);
    assert!(report.resource_series.is_none());
}

#[test]
fn encode_response_parsing_tests_rejects_blank_file_id() {
    let error = parse_encode_response(br#"{"file_id":"  "}"#).expect_err("blank id should fail");
    assert!(matches!(error, ContractError::InvalidContract(_)));

    let error = parse_upload_response(br#"{"filename":"a.wav"}"#).expect_err("missing id");
    assert!(matches!(error, ContractError::Decode(_)));
}
