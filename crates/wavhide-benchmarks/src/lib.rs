//! Synthetic service bodies for the benchmark smoke tests.

/// Builds an encode success body with `sections` timing rows and `samples`
/// resource samples per series.
pub fn encode_body(sections: usize, samples: usize) -> String {
    let section_times: Vec<String> = (0..sections)
        .map(|index| format!("\"seccion_{index}\": {}", index as f64 * 0.01))
        .collect();
    let series: Vec<String> = (0..samples).map(|index| format!("{}", index % 100)).collect();
    let series = series.join(",");

    format!(
        r#"{{
            "file_id": "bench-file",
            "processTime": 61.2,
            "metrics": {{"mse_psnr": {{"mse": 0.0001, "psnr": 40}}, "snr": 35.5}},
            "section_times": {{{}}},
            "resource_usage": {{"cpu_values": [{series}], "memory_values": [{series}], "timestamps": [{series}]}},
            "plots": ["audio_waveforms.png", "audio_histograms.png", "execution_times.png"]
        }}"#,
        section_times.join(",")
    )
}
