//! Priority rules: an ordered list of `(condition, priority)` pairs evaluated
//! top to bottom; the first rule whose condition holds decides.
//!
//! Built from `PriorityPolicy` + urgency terms:
//! 1. `urgency_terms`         any term present        → critical
//! 2. `negative_in_category`  score < high_threshold
//!                            AND category ∈ high_categories → high
//! 3. `negative`              score < medium_threshold → medium
//! 4. `default`                                        → low

use serde::Serialize;

use super::matcher::{compile_all, Phrase};
use crate::config::PriorityPolicy;
use crate::error::ConfigError;
use crate::taxonomy::{Category, Priority};

#[derive(Debug, Clone)]
pub enum Condition {
    ContainsAny(Vec<Phrase>),
    ScoreBelowIn {
        threshold: f32,
        categories: Vec<Category>,
    },
    ScoreBelow(f32),
    Always,
}

#[derive(Debug, Clone)]
pub struct PriorityRule {
    pub name: &'static str,
    pub when: Condition,
    pub then: Priority,
}

/// What a rule sees.
#[derive(Debug, Clone, Copy)]
pub struct PriorityInput<'a> {
    pub cleaned: &'a str,
    pub score: f32,
    pub category: Category,
}

/// Resolved priority plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityDecision {
    pub priority: Priority,
    pub rule: &'static str,
    /// Urgency terms found, when the urgency rule fired.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_terms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PriorityDeterminer {
    rules: Vec<PriorityRule>,
}

impl PriorityDeterminer {
    pub fn new(policy: &PriorityPolicy, urgency_terms: &[String]) -> Result<Self, ConfigError> {
        let rules = vec![
            PriorityRule {
                name: "urgency_terms",
                when: Condition::ContainsAny(compile_all("urgency_terms", urgency_terms)?),
                then: Priority::Critical,
            },
            PriorityRule {
                name: "negative_in_category",
                when: Condition::ScoreBelowIn {
                    threshold: policy.high_threshold,
                    categories: policy.high_categories.clone(),
                },
                then: Priority::High,
            },
            PriorityRule {
                name: "negative",
                when: Condition::ScoreBelow(policy.medium_threshold),
                then: Priority::Medium,
            },
            PriorityRule {
                name: "default",
                when: Condition::Always,
                then: Priority::Low,
            },
        ];
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[PriorityRule] {
        &self.rules
    }

    pub fn decide(&self, input: &PriorityInput<'_>) -> PriorityDecision {
        for rule in &self.rules {
            if let Some(matched_terms) = matches_when(&rule.when, input) {
                return PriorityDecision {
                    priority: rule.then,
                    rule: rule.name,
                    matched_terms,
                };
            }
        }
        // unreachable with the `Always` tail, kept total anyway
        PriorityDecision {
            priority: Priority::Low,
            rule: "default",
            matched_terms: Vec::new(),
        }
    }

    pub fn determine(&self, input: &PriorityInput<'_>) -> Priority {
        self.decide(input).priority
    }
}

/// `Some(terms)` when the condition holds; `terms` is only filled by
/// `ContainsAny`.
fn matches_when(cond: &Condition, input: &PriorityInput<'_>) -> Option<Vec<String>> {
    match cond {
        Condition::ContainsAny(phrases) => {
            let hits: Vec<String> = phrases
                .iter()
                .filter(|p| p.is_match(input.cleaned))
                .map(|p| p.term.clone())
                .collect();
            (!hits.is_empty()).then_some(hits)
        }
        Condition::ScoreBelowIn {
            threshold,
            categories,
        } => (input.score < *threshold && categories.contains(&input.category))
            .then(Vec::new),
        Condition::ScoreBelow(threshold) => (input.score < *threshold).then(Vec::new),
        Condition::Always => Some(Vec::new()),
    }
}
