//! Aggregate statistics over analyzed complaints.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::complaint::AnalyzedComplaint;
use crate::taxonomy::{Category, Priority, Sentiment};

/// Batch summary. Distributions only carry labels that occurred.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_complaints: usize,
    pub sentiment_distribution: BTreeMap<Sentiment, usize>,
    pub category_distribution: BTreeMap<Category, usize>,
    pub priority_distribution: BTreeMap<Priority, usize>,
    /// Mean score, three decimals.
    pub average_sentiment_score: f32,
    /// Share of negative complaints in percent, two decimals.
    pub negative_percentage: f32,
    /// `high` plus `critical`.
    pub high_priority_count: usize,
    /// Earliest/latest parseable `date`; rows with other dates are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<NaiveDateTime>,
}

impl Summary {
    pub fn from_results(rows: &[AnalyzedComplaint]) -> Self {
        let mut s = Summary {
            total_complaints: rows.len(),
            ..Default::default()
        };
        if rows.is_empty() {
            return s;
        }

        let mut score_sum = 0.0f64;
        for row in rows {
            let r = &row.result;
            *s.sentiment_distribution.entry(r.sentiment).or_default() += 1;
            *s.category_distribution.entry(r.category).or_default() += 1;
            *s.priority_distribution.entry(r.priority).or_default() += 1;
            score_sum += r.sentiment_score as f64;
            if r.priority >= Priority::High {
                s.high_priority_count += 1;
            }
            if let Some(ts) = row.timestamp() {
                s.earliest_date = Some(s.earliest_date.map_or(ts, |e| e.min(ts)));
                s.latest_date = Some(s.latest_date.map_or(ts, |l| l.max(ts)));
            }
        }

        let n = rows.len() as f64;
        let negatives = s
            .sentiment_distribution
            .get(&Sentiment::Negative)
            .copied()
            .unwrap_or(0) as f64;
        s.average_sentiment_score = round_to(score_sum / n, 3) as f32;
        s.negative_percentage = round_to(negatives / n * 100.0, 2) as f32;
        s
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let k = 10f64.powi(decimals);
    (x * k).round() / k
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::AnalysisResult;
    use crate::complaint::Complaint;

    fn row(
        score: f32,
        sentiment: Sentiment,
        priority: Priority,
        date: Option<&str>,
    ) -> AnalyzedComplaint {
        let mut c = Complaint::new("x");
        c.date = date.map(str::to_string);
        AnalyzedComplaint::new(
            &c,
            AnalysisResult {
                sentiment,
                sentiment_score: score,
                category: Category::DeliveryIssues,
                priority,
                keywords: vec![],
            },
        )
    }

    #[test]
    fn empty_input_is_all_zero() {
        let s = Summary::from_results(&[]);
        assert_eq!(s, Summary::default());
        assert!(s.sentiment_distribution.is_empty());
    }

    #[test]
    fn counts_and_averages() {
        let rows = vec![
            row(-0.8, Sentiment::Negative, Priority::Critical, Some("2024-03-05")),
            row(-0.3, Sentiment::Negative, Priority::Medium, Some("not a date")),
            row(0.5, Sentiment::Positive, Priority::Low, Some("2024-01-10 08:30:00")),
            row(0.0, Sentiment::Neutral, Priority::High, None),
        ];
        let s = Summary::from_results(&rows);
        assert_eq!(s.total_complaints, 4);
        assert_eq!(s.sentiment_distribution[&Sentiment::Negative], 2);
        assert_eq!(s.category_distribution[&Category::DeliveryIssues], 4);
        assert!(!s.category_distribution.contains_key(&Category::Other));
        assert_eq!(s.high_priority_count, 2);
        assert_eq!(s.average_sentiment_score, -0.15);
        assert_eq!(s.negative_percentage, 50.0);
        assert_eq!(s.earliest_date.unwrap().to_string(), "2024-01-10 08:30:00");
        assert_eq!(s.latest_date.unwrap().to_string(), "2024-03-05 00:00:00");
    }

    #[test]
    fn serializes_label_keys() {
        let s = Summary::from_results(&[row(-0.8, Sentiment::Negative, Priority::High, None)]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["sentiment_distribution"]["negative"], 1);
        assert_eq!(v["category_distribution"]["Delivery Issues"], 1);
        assert_eq!(v["priority_distribution"]["high"], 1);
        assert!(v.get("earliest_date").is_none());
    }
}
