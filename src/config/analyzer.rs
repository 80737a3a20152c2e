// src/config/analyzer.rs
//! Analyzer configuration schema, built-in defaults and validation.
//!
//! TOML shape (every key optional, unknown keys rejected):
//! ```toml
//! keyword_count = 5
//! min_keyword_length = 3
//! urgency_terms = ["lawyer", "lawsuit", "dangerous"]
//!
//! [sentiment_thresholds]
//! positive = 0.1
//! negative = -0.1
//!
//! [priority]
//! high_threshold = -0.5
//! high_categories = ["Product Quality", "Technical Issues"]
//! medium_threshold = -0.2
//!
//! [preprocessing]
//! remove_urls = true
//! lemmatize = true
//!
//! [[categories]]
//! label = "Product Quality"
//! keywords = ["defect", "broken", "poor quality"]
//! ```
//! The order of `[[categories]]` entries is the tie-break order.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::error::ConfigError;
use crate::taxonomy::Category;

pub const DEFAULT_KEYWORD_COUNT: usize = 5;
pub const DEFAULT_MIN_KEYWORD_LENGTH: usize = 3;
pub const DEFAULT_POSITIVE_THRESHOLD: f32 = 0.1;
pub const DEFAULT_NEGATIVE_THRESHOLD: f32 = -0.1;
pub const DEFAULT_HIGH_THRESHOLD: f32 = -0.5;
pub const DEFAULT_MEDIUM_THRESHOLD: f32 = -0.2;
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 10;

/// Legal-threat and safety-hazard terms that escalate straight to critical.
pub const DEFAULT_URGENCY_TERMS: &[&str] = &[
    "lawyer",
    "attorney",
    "lawsuit",
    "legal action",
    "sue",
    "court",
    "dangerous",
    "unsafe",
    "hazard",
    "fire hazard",
    "caught fire",
    "on fire",
    "injury",
    "injured",
    "emergency",
];

/// Built-in keyword table, in tie-break order.
const DEFAULT_CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::ProductQuality,
        &[
            "defect",
            "defective",
            "broken",
            "damaged",
            "poor quality",
            "low quality",
            "faulty",
            "not working",
            "stopped working",
            "malfunctioning",
            "malfunction",
            "cheap",
            "flimsy",
        ],
    ),
    (
        Category::CustomerService,
        &[
            "rude",
            "unprofessional",
            "unhelpful",
            "customer service",
            "support",
            "representative",
            "staff",
            "employee",
            "agent",
            "manager",
        ],
    ),
    (
        Category::DeliveryIssues,
        &[
            "delivery",
            "shipping",
            "shipment",
            "arrived late",
            "never arrived",
            "lost package",
            "wrong address",
            "delayed",
            "courier",
            "tracking",
        ],
    ),
    (
        Category::BillingPayment,
        &[
            "charged",
            "payment",
            "billing",
            "refund",
            "overcharged",
            "wrong amount",
            "invoice",
            "credit card",
            "double charged",
            "fee",
        ],
    ),
    (
        Category::TechnicalIssues,
        &[
            "technical",
            "bug",
            "error",
            "crash",
            "crashed",
            "not loading",
            "glitch",
            "software",
            "app",
            "website",
            "freeze",
            "frozen",
        ],
    ),
    (
        Category::RefundReturn,
        &["refund", "return", "money back", "exchange", "replace", "replacement"],
    ),
    (
        Category::AccountManagement,
        &[
            "account",
            "login",
            "log in",
            "sign in",
            "password",
            "access",
            "locked out",
            "username",
            "registration",
        ],
    ),
];

/// Complete analyzer configuration. Passed by value into
/// `ComplaintAnalyzer::new`; nothing here is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Maximum number of keywords per complaint (N).
    pub keyword_count: usize,
    /// Tokens shorter than this never become keywords.
    pub min_keyword_length: usize,
    /// Any hit resolves the complaint to `critical`.
    pub urgency_terms: Vec<String>,
    pub sentiment_thresholds: SentimentThresholds,
    pub priority: PriorityPolicy,
    pub preprocessing: PreprocessingConfig,
    /// Ordered category table; earlier entries win ties.
    pub categories: Vec<CategoryKeywords>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentimentThresholds {
    /// score > positive → positive
    pub positive: f32,
    /// score < negative → negative
    pub negative: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityPolicy {
    pub high_threshold: f32,
    #[serde(deserialize_with = "de_categories")]
    pub high_categories: Vec<Category>,
    pub medium_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessingConfig {
    pub remove_urls: bool,
    pub remove_emails: bool,
    pub remove_stopwords: bool,
    pub lemmatize: bool,
    /// Cleaned texts shorter than this (chars) are reported at debug level.
    pub min_length: usize,
    /// Replaces the built-in English stopword list when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopwords: Option<Vec<String>>,
    /// Added on top of whichever stopword list is active.
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryKeywords {
    #[serde(deserialize_with = "de_category")]
    pub label: Category,
    pub keywords: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            keyword_count: DEFAULT_KEYWORD_COUNT,
            min_keyword_length: DEFAULT_MIN_KEYWORD_LENGTH,
            urgency_terms: DEFAULT_URGENCY_TERMS.iter().map(|s| s.to_string()).collect(),
            sentiment_thresholds: SentimentThresholds::default(),
            priority: PriorityPolicy::default(),
            preprocessing: PreprocessingConfig::default(),
            categories: default_categories(),
        }
    }
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE_THRESHOLD,
            negative: DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self {
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            high_categories: vec![Category::ProductQuality, Category::TechnicalIssues],
            medium_threshold: DEFAULT_MEDIUM_THRESHOLD,
        }
    }
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            remove_urls: true,
            remove_emails: true,
            remove_stopwords: true,
            lemmatize: true,
            min_length: DEFAULT_MIN_TEXT_LENGTH,
            stopwords: None,
            extra_stopwords: Vec::new(),
        }
    }
}

/// The built-in keyword table.
pub fn default_categories() -> Vec<CategoryKeywords> {
    DEFAULT_CATEGORY_KEYWORDS
        .iter()
        .map(|(label, kws)| CategoryKeywords {
            label: *label,
            keywords: kws.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

impl AnalyzerConfig {
    /// Structural checks. Pattern compilation errors surface later, from
    /// `ComplaintAnalyzer::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyword_count == 0 {
            return Err(invalid("keyword_count must be at least 1"));
        }

        let t = &self.sentiment_thresholds;
        check_unit("sentiment_thresholds.positive", t.positive)?;
        check_unit("sentiment_thresholds.negative", t.negative)?;
        if t.negative > t.positive {
            return Err(invalid(format!(
                "sentiment_thresholds.negative ({}) must not exceed positive ({})",
                t.negative, t.positive
            )));
        }

        let p = &self.priority;
        check_unit("priority.high_threshold", p.high_threshold)?;
        check_unit("priority.medium_threshold", p.medium_threshold)?;
        if p.high_threshold > p.medium_threshold {
            return Err(invalid(format!(
                "priority.high_threshold ({}) must not exceed medium_threshold ({})",
                p.high_threshold, p.medium_threshold
            )));
        }

        check_terms("urgency_terms", &self.urgency_terms)?;
        check_terms("preprocessing.extra_stopwords", &self.preprocessing.extra_stopwords)?;
        if let Some(list) = &self.preprocessing.stopwords {
            check_terms("preprocessing.stopwords", list)?;
        }

        if self.categories.is_empty() {
            return Err(invalid("categories must list at least one category"));
        }
        let mut seen = HashSet::new();
        for entry in &self.categories {
            if entry.label == Category::Other {
                return Err(invalid(
                    "`Other` is the fallback category and cannot carry keywords",
                ));
            }
            if !seen.insert(entry.label) {
                return Err(invalid(format!("category `{}` is listed twice", entry.label)));
            }
            if entry.keywords.is_empty() {
                return Err(invalid(format!("category `{}` has no keywords", entry.label)));
            }
            check_terms(&format!("categories.{}", entry.label), &entry.keywords)?;
        }
        Ok(())
    }

    /// Tie-break order: the configured labels, in declaration order.
    pub fn category_order(&self) -> Vec<Category> {
        self.categories.iter().map(|c| c.label).collect()
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn check_unit(name: &str, v: f32) -> Result<(), ConfigError> {
    if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
        return Err(invalid(format!("{name} must be a number in [-1, 1], got {v}")));
    }
    Ok(())
}

fn check_terms(name: &str, terms: &[String]) -> Result<(), ConfigError> {
    for t in terms {
        if !t.chars().any(char::is_alphanumeric) {
            return Err(invalid(format!(
                "{name} contains an entry without letters or digits: {t:?}"
            )));
        }
    }
    Ok(())
}

fn de_category<'de, D>(d: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn de_categories<'de, D>(d: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(d)?
        .iter()
        .map(|s| s.parse().map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_cover_every_label_but_other() {
        let cfg = AnalyzerConfig::default();
        cfg.validate().unwrap();
        let order = cfg.category_order();
        assert_eq!(order.len(), 7);
        assert_eq!(&order[..], &Category::ALL[..7]);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let cfg: AnalyzerConfig = toml::from_str("keyword_count = 3").unwrap();
        assert_eq!(cfg.keyword_count, 3);
        assert_eq!(cfg.sentiment_thresholds, SentimentThresholds::default());
        assert_eq!(cfg.categories, default_categories());
    }

    #[test]
    fn category_labels_parse_leniently() {
        let cfg: AnalyzerConfig = toml::from_str(
            r#"
[priority]
high_categories = ["delivery issues"]

[[categories]]
label = "billing/payment"
keywords = ["invoice"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.priority.high_categories, vec![Category::DeliveryIssues]);
        assert_eq!(cfg.categories[0].label, Category::BillingPayment);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<AnalyzerConfig>("keyword_cnt = 3").unwrap_err();
        assert!(err.to_string().contains("keyword_cnt"), "{err}");
    }

    #[test]
    fn validation_catches_malformed_tables() {
        let mut cfg = AnalyzerConfig::default();
        cfg.keyword_count = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AnalyzerConfig::default();
        cfg.sentiment_thresholds = SentimentThresholds {
            positive: -0.3,
            negative: 0.3,
        };
        assert!(cfg.validate().is_err());

        let mut cfg = AnalyzerConfig::default();
        cfg.categories.push(CategoryKeywords {
            label: Category::ProductQuality,
            keywords: vec!["dup".into()],
        });
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("listed twice"), "{msg}");

        let mut cfg = AnalyzerConfig::default();
        cfg.categories[0].keywords.push("  ".into());
        assert!(cfg.validate().is_err());

        let mut cfg = AnalyzerConfig::default();
        cfg.priority.high_threshold = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn other_cannot_be_configured() {
        let mut cfg = AnalyzerConfig::default();
        cfg.categories.push(CategoryKeywords {
            label: Category::Other,
            keywords: vec!["misc".into()],
        });
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("fallback"), "{msg}");
    }
}
