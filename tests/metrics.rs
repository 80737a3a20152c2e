// tests/metrics.rs
//
// The Prometheus recorder is process-global, so everything that needs it
// lives in a single test.
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use complaint_analyzer::api::{self, AppState};
use complaint_analyzer::metrics::Metrics;
use complaint_analyzer::ComplaintAnalyzer;

#[tokio::test]
async fn metrics_endpoint_contains_pipeline_series() {
    let metrics = Metrics::init().expect("first recorder install succeeds");
    assert!(Metrics::init().is_err(), "a second global recorder must be refused");

    let app = api::router(AppState::new(ComplaintAnalyzer::default()).with_metrics(metrics.handle));

    let ok = Request::post("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"complaint_text":"The app crashed and lost my work, terrible!"}"#))
        .unwrap();
    let resp = app.clone().oneshot(ok).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bad = Request::post("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"complaint_id":"no-text"}"#))
        .unwrap();
    let resp = app.clone().oneshot(bad).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "complaints_analyzed_total",
        "category=\"Technical Issues\"",
        "priority=\"high\"",
        "complaint_validation_errors_total 1",
        "complaint_analysis_duration_ms",
    ] {
        assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
    }
}
