use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::analyze::{ComplaintAnalyzer, Explanation, RecordError};
use crate::complaint::{AnalyzedComplaint, Complaint, ComplaintRecord};
use crate::config::AnalyzerConfig;
use crate::error::ValidationError;
use crate::summary::Summary;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ComplaintAnalyzer>,
    /// Present when a Prometheus recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(analyzer: ComplaintAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/analyze/batch", post(analyze_batch))
        .route("/config", get(active_config))
        .route("/metrics", get(render_metrics))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    record: String,
}

#[derive(Deserialize)]
struct AnalyzeParams {
    #[serde(default)]
    explain: bool,
}

#[derive(Serialize)]
struct ExplainedResponse {
    #[serde(flatten)]
    row: AnalyzedComplaint,
    explanation: Explanation,
}

/// Body is taken as untyped JSON so a wrongly typed field still gets the
/// `{error, record}` reply instead of the extractor's plain-text rejection.
async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    Json(body): Json<Value>,
) -> Response {
    let started = Instant::now();
    let analyzed = ComplaintRecord::from_value(body, 0)
        .and_then(|record| Complaint::from_record(record, 0))
        .map(|complaint| {
            let (result, explanation) = state.analyzer.analyze_explained(&complaint.text);
            (AnalyzedComplaint::new(&complaint, result), explanation)
        });

    match analyzed {
        Ok((row, explanation)) => {
            record_analyzed(&row);
            histogram!("complaint_analysis_duration_ms").record(elapsed_ms(started));
            if params.explain {
                Json(ExplainedResponse { row, explanation }).into_response()
            } else {
                Json(row).into_response()
            }
        }
        Err(e) => {
            counter!("complaint_validation_errors_total").increment(1);
            validation_error(&e)
        }
    }
}

fn validation_error(e: &ValidationError) -> Response {
    let body = ErrorBody {
        error: e.to_string(),
        record: e.record().to_string(),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

#[derive(Serialize)]
struct BatchResponse {
    results: Vec<AnalyzedComplaint>,
    errors: Vec<RecordError>,
    summary: Summary,
}

async fn analyze_batch(
    State(state): State<AppState>,
    Json(rows): Json<Vec<Value>>,
) -> Json<BatchResponse> {
    let started = Instant::now();
    let total = rows.len();
    let outcome = state.analyzer.analyze_values(rows);

    for row in &outcome.results {
        record_analyzed(row);
    }
    if !outcome.errors.is_empty() {
        counter!("complaint_validation_errors_total").increment(outcome.errors.len() as u64);
    }
    histogram!("complaint_analysis_duration_ms").record(elapsed_ms(started));

    let summary = Summary::from_results(&outcome.results);
    info!(
        total,
        analyzed = outcome.results.len(),
        rejected = outcome.errors.len(),
        high_priority = summary.high_priority_count,
        "batch analyzed"
    );
    Json(BatchResponse {
        results: outcome.results,
        errors: outcome.errors,
        summary,
    })
}

async fn active_config(State(state): State<AppState>) -> Json<AnalyzerConfig> {
    Json(state.analyzer.config().clone())
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

fn record_analyzed(row: &AnalyzedComplaint) {
    counter!(
        "complaints_analyzed_total",
        "category" => row.result.category.label(),
        "priority" => row.result.priority.as_str()
    )
    .increment(1);
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
