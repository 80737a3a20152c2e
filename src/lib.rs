// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod api;
pub mod complaint;
pub mod config;
pub mod error;
pub mod metrics;
pub mod sentiment;
pub mod summary;
pub mod taxonomy;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{AnalysisResult, BatchOutcome, ComplaintAnalyzer, Explanation, RecordError};
pub use crate::api::router;
pub use crate::complaint::{AnalyzedComplaint, Complaint, ComplaintRecord};
pub use crate::config::AnalyzerConfig;
pub use crate::error::{ConfigError, ValidationError};
pub use crate::summary::Summary;
pub use crate::taxonomy::{Category, Priority, Sentiment};
