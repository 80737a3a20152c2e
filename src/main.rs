//! Complaint analyzer service. Binary entrypoint.
//! Loads the analyzer config, installs tracing and the Prometheus recorder,
//! and serves the Axum router.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use complaint_analyzer::api::{self, AppState};
use complaint_analyzer::config;
use complaint_analyzer::metrics::Metrics;
use complaint_analyzer::ComplaintAnalyzer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("complaint_analyzer=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = config::load_default().context("loading analyzer config")?;
    let analyzer = ComplaintAnalyzer::new(cfg).context("building complaint analyzer")?;
    let metrics = Metrics::init().context("installing prometheus recorder")?;

    let state = AppState::new(analyzer).with_metrics(metrics.handle);
    let app = api::router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "complaint analyzer listening");

    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
