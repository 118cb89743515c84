//! Benchmark smoke test for the parse-render-paint loop.

use std::time::Instant;

use time::{Date, Month};
use url::Url;
use wavhide_benchmarks::encode_body;
use wavhide_contract::parse_encode_response;
use wavhide_ui::{RenderContext, ResultView, ServiceLinks, paint};

#[test]
fn benchmark_render_smoke_prints_latency() {
    let body = encode_body(50, 2_000);
    let ctx = RenderContext {
        links: ServiceLinks::new(Url::parse("http://127.0.0.1:8000/").expect("url should parse")),
        today: Date::from_calendar_date(2024, Month::January, 2).expect("date should be valid"),
    };

    let start = Instant::now();
    let mut painted_len = 0usize;
    let mut view = ResultView::new();

    for _ in 0..200 {
        let report = parse_encode_response(body.as_bytes()).expect("body should parse");
        view.render(&Ok(report), &ctx);
        painted_len += paint(&view).len();
    }

    let elapsed_ms = start.elapsed().as_millis();
    println!("benchmark_render_elapsed_ms={elapsed_ms}");
    println!("benchmark_render_painted_total_len={painted_len}");

    assert!(painted_len > 0);
    assert!(elapsed_ms < 5_000, "render smoke benchmark should stay bounded");
}
