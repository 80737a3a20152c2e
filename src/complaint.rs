//! Input records, validated complaints and output records.
//!
//! Input shape (one row from the loader):
//! `{ "complaint_text": "...", "complaint_id": 17, "date": "2024-03-01", "customer_id": "C-9" }`
//! Only `complaint_text` is required; ids may be strings or numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::analyze::AnalysisResult;
use crate::error::ValidationError;

/// Raw input row, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    #[serde(default)]
    pub complaint_text: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub complaint_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl ComplaintRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            complaint_text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Decode one untyped JSON row. A row of the wrong shape becomes a
    /// `Malformed` error for that row only.
    pub fn from_value(value: Value, index: usize) -> Result<Self, ValidationError> {
        let label = match value.get("complaint_id") {
            Some(Value::String(s)) => record_label(Some(s), index),
            Some(Value::Number(n)) => record_label(Some(&n.to_string()), index),
            _ => record_label(None, index),
        };
        serde_json::from_value(value).map_err(|e| ValidationError::Malformed {
            record: label,
            reason: e.to_string(),
        })
    }
}

/// A validated complaint. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Option<String>,
    pub text: String,
    pub date: Option<String>,
    pub customer_id: Option<String>,
}

impl Complaint {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            date: None,
            customer_id: None,
        }
    }

    /// Validate a raw row. `index` (0-based) identifies rows without an id.
    pub fn from_record(record: ComplaintRecord, index: usize) -> Result<Self, ValidationError> {
        let ComplaintRecord {
            complaint_text,
            complaint_id,
            date,
            customer_id,
        } = record;
        let Some(text) = complaint_text else {
            return Err(ValidationError::MissingText {
                record: record_label(complaint_id.as_deref(), index),
            });
        };
        Ok(Self {
            id: complaint_id,
            text,
            date,
            customer_id,
        })
    }

    /// Parsed `date`, if it is in one of the accepted layouts.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// `complaint_id` when present, else `#<index>`.
pub fn record_label(id: Option<&str>, index: usize) -> String {
    match id {
        Some(id) => id.to_string(),
        None => format!("#{index}"),
    }
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`,
/// `MM/DD/YYYY`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Output row: analysis merged with the input metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedComplaint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl AnalyzedComplaint {
    pub fn new(complaint: &Complaint, result: AnalysisResult) -> Self {
        Self {
            complaint_id: complaint.id.clone(),
            date: complaint.date.clone(),
            customer_id: complaint.customer_id.clone(),
            result,
        }
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

impl fmt::Display for AnalyzedComplaint {
    /// Plain-text report block.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.result;
        let rule = "=".repeat(42);
        writeln!(f, "{rule}")?;
        writeln!(f, "COMPLAINT ANALYSIS REPORT")?;
        if let Some(id) = &self.complaint_id {
            writeln!(f, "Complaint:        {id}")?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f, "Sentiment:        {}", r.sentiment.as_str().to_uppercase())?;
        writeln!(f, "Sentiment Score:  {:.3}", r.sentiment_score)?;
        writeln!(f, "Category:         {}", r.category)?;
        writeln!(f, "Priority Level:   {}", r.priority.as_str().to_uppercase())?;
        writeln!(f)?;
        writeln!(f, "Key Topics:")?;
        if r.keywords.is_empty() {
            writeln!(f, "None identified")?;
        } else {
            writeln!(f, "{}", r.keywords.join(", "))?;
        }
        write!(f, "{rule}")
    }
}

fn de_opt_id<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Option::<IdRepr>::deserialize(d)? {
        None => None,
        Some(IdRepr::Text(s)) => Some(s),
        Some(IdRepr::Int(n)) => Some(n.to_string()),
        Some(IdRepr::Float(x)) if x.fract() == 0.0 => Some(format!("{x:.0}")),
        Some(IdRepr::Float(x)) => Some(x.to_string()),
    })
}
