// src/analyze/mod.rs
//! Classification pipeline entry: normalizes once, then scores sentiment,
//! assigns a category, extracts keywords and resolves priority.
//!
//! Order:
//! 1) `Normalizer`            raw text → cleaned text + base-form tokens
//! 2) `SentimentScorer`       cleaned text → score + label
//! 3) `CategoryClassifier`    cleaned text → category
//! 4) `KeywordExtractor`      tokens → top-N keywords
//! 5) `PriorityDeterminer`    (cleaned text, score, category) → priority
//!
//! Every step is pure; the analyzer holds only compiled configuration and
//! can be shared across threads.

pub mod category;
pub mod keywords;
pub mod matcher;
pub mod normalize;
pub mod priority;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

// Re-export convenient types.
pub use crate::analyze::category::{CategoryClassifier, CategoryHits};
pub use crate::analyze::keywords::KeywordExtractor;
pub use crate::analyze::normalize::{NormalizedText, Normalizer};
pub use crate::analyze::priority::{PriorityDecision, PriorityDeterminer, PriorityInput};

use crate::complaint::{AnalyzedComplaint, Complaint, ComplaintRecord};
use crate::config::AnalyzerConfig;
use crate::error::{ConfigError, ValidationError};
use crate::sentiment::SentimentScorer;
use crate::taxonomy::{Category, Priority, Sentiment};

/// Analysis of one complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    /// Polarity in [-1, 1], rounded to three decimals.
    pub sentiment_score: f32,
    pub category: Category,
    pub priority: Priority,
    pub keywords: Vec<String>,
}

impl AnalysisResult {
    /// What empty or unrecognizable text resolves to.
    pub fn neutral_default() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            sentiment_score: 0.0,
            category: Category::Other,
            priority: Priority::Low,
            keywords: Vec::new(),
        }
    }
}

/// Intermediate signals behind a result, served by `POST /analyze?explain=true`.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub tokens: Vec<String>,
    pub category_hits: Vec<CategoryHits>,
    pub priority: PriorityDecision,
}

/// A rejected record inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordError {
    /// 0-based position in the input.
    pub index: usize,
    pub record: String,
    pub error: String,
}

impl RecordError {
    fn new(index: usize, err: &ValidationError) -> Self {
        Self {
            index,
            record: err.record().to_string(),
            error: err.to_string(),
        }
    }
}

/// Batch result: accepted rows in input order plus per-row errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<AnalyzedComplaint>,
    pub errors: Vec<RecordError>,
}

#[derive(Debug, Clone)]
pub struct ComplaintAnalyzer {
    config: AnalyzerConfig,
    normalizer: Normalizer,
    scorer: SentimentScorer,
    classifier: CategoryClassifier,
    extractor: KeywordExtractor,
    priority: PriorityDeterminer,
}

impl Default for ComplaintAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default()).expect("built-in analyzer config is valid")
    }
}

impl ComplaintAnalyzer {
    /// Validate the configuration and compile every pattern. Fails fast, so
    /// a bad table is reported once instead of per record.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let analyzer = Self {
            normalizer: Normalizer::new(config.preprocessing.clone()),
            scorer: SentimentScorer::new(config.sentiment_thresholds),
            classifier: CategoryClassifier::new(&config.categories)?,
            extractor: KeywordExtractor::new(config.keyword_count, config.min_keyword_length),
            priority: PriorityDeterminer::new(&config.priority, &config.urgency_terms)?,
            config,
        };
        info!(
            categories = analyzer.config.categories.len(),
            urgency_terms = analyzer.config.urgency_terms.len(),
            keyword_count = analyzer.config.keyword_count,
            "complaint analyzer initialized"
        );
        Ok(analyzer)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        self.analyze_explained(text).0
    }

    /// Same as `analyze`, plus the intermediate signals.
    pub fn analyze_explained(&self, text: &str) -> (AnalysisResult, Explanation) {
        let normalized = self.normalizer.normalize(text);

        let sentiment = self.scorer.score(&normalized);
        let category_hits = self.classifier.hits(&normalized.cleaned);
        let category = CategoryClassifier::pick(&category_hits);
        let keywords = self.extractor.extract(&normalized.tokens);
        let decision = self.priority.decide(&PriorityInput {
            cleaned: &normalized.cleaned,
            score: sentiment.score,
            category,
        });

        let result = AnalysisResult {
            sentiment: sentiment.label,
            sentiment_score: sentiment.score,
            category,
            priority: decision.priority,
            keywords,
        };
        debug!(
            id = %text_id(text),
            score = result.sentiment_score,
            category = %result.category,
            priority = %result.priority,
            rule = decision.rule,
            "complaint analyzed"
        );

        let explanation = Explanation {
            tokens: normalized.tokens,
            category_hits,
            priority: decision,
        };
        (result, explanation)
    }

    pub fn analyze_complaint(&self, complaint: &Complaint) -> AnalyzedComplaint {
        AnalyzedComplaint::new(complaint, self.analyze(&complaint.text))
    }

    /// Validate and analyze one raw row.
    pub fn analyze_record(
        &self,
        record: ComplaintRecord,
        index: usize,
    ) -> Result<AnalyzedComplaint, ValidationError> {
        let complaint = Complaint::from_record(record, index)?;
        Ok(self.analyze_complaint(&complaint))
    }

    /// Decode, validate and analyze one untyped JSON row.
    pub fn analyze_value(
        &self,
        value: Value,
        index: usize,
    ) -> Result<AnalyzedComplaint, ValidationError> {
        let record = ComplaintRecord::from_value(value, index)?;
        self.analyze_record(record, index)
    }

    /// Analyze rows in order. A bad row is recorded in `errors` and does not
    /// stop the rest of the batch.
    pub fn analyze_batch(&self, records: Vec<ComplaintRecord>) -> BatchOutcome {
        collect_rows(
            records
                .into_iter()
                .enumerate()
                .map(|(i, r)| (i, self.analyze_record(r, i))),
        )
    }

    /// Same as `analyze_batch` for rows not yet decoded; a row of the wrong
    /// shape lands in `errors` as `Malformed`.
    pub fn analyze_values(&self, values: Vec<Value>) -> BatchOutcome {
        collect_rows(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i, self.analyze_value(v, i))),
        )
    }
}

fn collect_rows(
    rows: impl Iterator<Item = (usize, Result<AnalyzedComplaint, ValidationError>)>,
) -> BatchOutcome {
    let mut out = BatchOutcome::default();
    for (index, row) in rows {
        match row {
            Ok(row) => out.results.push(row),
            Err(e) => {
                warn!(
                    index,
                    record = e.record(),
                    error = %e,
                    "skipping invalid complaint record"
                );
                out.errors.push(RecordError::new(index, &e));
            }
        }
    }
    out
}

/// Short SHA-256 prefix so logs can correlate texts without storing them.
pub(crate) fn text_id(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
