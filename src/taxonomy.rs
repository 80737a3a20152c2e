//! Closed label sets produced by the classification pipeline.
//!
//! All three enums serialize to the exact strings downstream sinks (CSV/JSON
//! writers, the dashboard) expect, and all three are `Ord` so they can key
//! `BTreeMap` distributions in a stable order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete sentiment label derived from the polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

/// Complaint category. Variant order is the declaration order used for
/// tie-breaks when no custom category table is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Product Quality")]
    ProductQuality,
    #[serde(rename = "Customer Service")]
    CustomerService,
    #[serde(rename = "Delivery Issues")]
    DeliveryIssues,
    #[serde(rename = "Billing/Payment")]
    BillingPayment,
    #[serde(rename = "Technical Issues")]
    TechnicalIssues,
    #[serde(rename = "Refund/Return")]
    RefundReturn,
    #[serde(rename = "Account Management")]
    AccountManagement,
    Other,
}

impl Category {
    /// Every label, in declaration order.
    pub const ALL: [Category; 8] = [
        Category::ProductQuality,
        Category::CustomerService,
        Category::DeliveryIssues,
        Category::BillingPayment,
        Category::TechnicalIssues,
        Category::RefundReturn,
        Category::AccountManagement,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::ProductQuality => "Product Quality",
            Category::CustomerService => "Customer Service",
            Category::DeliveryIssues => "Delivery Issues",
            Category::BillingPayment => "Billing/Payment",
            Category::TechnicalIssues => "Technical Issues",
            Category::RefundReturn => "Refund/Return",
            Category::AccountManagement => "Account Management",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive, whitespace-tolerant label lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

/// Priority level; ordering is `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
