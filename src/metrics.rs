use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the pipeline metrics.
    /// Fails if a recorder is already installed in this process.
    pub fn init() -> Result<Self, BuildError> {
        // Default buckets; histograms render as summaries.
        let handle = PrometheusBuilder::new().install_recorder()?;

        describe_counter!(
            "complaints_analyzed_total",
            "Complaints analyzed, by category and priority"
        );
        describe_counter!(
            "complaint_validation_errors_total",
            "Input records rejected before analysis"
        );
        describe_histogram!(
            "complaint_analysis_duration_ms",
            Unit::Milliseconds,
            "Wall time per /analyze or /analyze/batch request"
        );

        Ok(Self { handle })
    }
}
