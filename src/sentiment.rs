//! Lexicon sentiment scorer.
//!
//! Every token found in the polarity lexicon contributes its polarity, scaled
//! by an intensifier directly before it ("very", "extremely", ...) and by
//! `NEGATION_FACTOR` when a negator sits within the previous three tokens.
//! The score is the mean contribution, boosted slightly by exclamation marks,
//! clamped to [-1, 1] and rounded to three decimals.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analyze::normalize::{lemmatize, word_tokens, NormalizedText};
use crate::config::SentimentThresholds;
use crate::taxonomy::Sentiment;

/// A negated term keeps half of its strength with the sign flipped.
pub const NEGATION_FACTOR: f32 = -0.5;
/// How many preceding tokens a negator reaches.
pub const NEGATION_WINDOW: usize = 3;
/// Extra weight per `!`, capped at `MAX_EMPHASIS_MARKS`.
pub const EMPHASIS_PER_MARK: f32 = 0.1;
pub const MAX_EMPHASIS_MARKS: usize = 3;

#[derive(Debug, Deserialize)]
struct Lexicon {
    polarity: HashMap<String, f32>,
    intensifiers: HashMap<String, f32>,
}

static LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<Lexicon>(raw).expect("valid sentiment lexicon")
});

/// Polarity plus its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub score: f32,
    pub label: Sentiment,
}

impl SentimentScore {
    pub const NEUTRAL: SentimentScore = SentimentScore {
        score: 0.0,
        label: Sentiment::Neutral,
    };
}

#[derive(Debug, Clone)]
pub struct SentimentScorer {
    thresholds: SentimentThresholds,
}

impl SentimentScorer {
    pub fn new(thresholds: SentimentThresholds) -> Self {
        Self { thresholds }
    }

    /// Lexicon polarity for a token, trying the base form as a fallback.
    #[inline]
    fn polarity(&self, tok: &str) -> Option<f32> {
        LEXICON
            .polarity
            .get(tok)
            .or_else(|| LEXICON.polarity.get(&lemmatize(tok)))
            .copied()
    }

    /// Score normalized text. Uses `cleaned` rather than `tokens` because
    /// negators and intensifiers are stopwords.
    pub fn score(&self, text: &NormalizedText) -> SentimentScore {
        let tokens: Vec<&str> = word_tokens(&text.cleaned).collect();
        let mut contributions: Vec<f32> = Vec::new();

        for (i, tok) in tokens.iter().enumerate() {
            let Some(base) = self.polarity(tok) else {
                continue;
            };

            let mut value = base;
            if i > 0 {
                if let Some(k) = LEXICON.intensifiers.get(tokens[i - 1]) {
                    value *= k;
                }
            }
            let negated = (1..=NEGATION_WINDOW).any(|k| i >= k && is_negator(tokens[i - k]));
            if negated {
                value *= NEGATION_FACTOR;
            }
            contributions.push(value);
        }

        if contributions.is_empty() {
            return SentimentScore::NEUTRAL;
        }

        let mean = contributions.iter().sum::<f32>() / contributions.len() as f32;
        let emphasis =
            1.0 + EMPHASIS_PER_MARK * text.exclamations.min(MAX_EMPHASIS_MARKS) as f32;
        let score = round3((mean * emphasis).clamp(-1.0, 1.0));

        SentimentScore {
            score,
            label: self.label_for(score),
        }
    }

    /// `score > positive` → positive, `score < negative` → negative.
    pub fn label_for(&self, score: f32) -> Sentiment {
        if score > self.thresholds.positive {
            Sentiment::Positive
        } else if score < self.thresholds.negative {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

fn round3(x: f32) -> f32 {
    let r = (x * 1000.0).round() / 1000.0;
    // avoid serializing -0.0
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "nothing"
            | "nobody"
            | "neither"
            | "nor"
            | "hardly"
            | "without"
            | "cannot"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "weren't"
            | "won't"
            | "can't"
            | "don't"
            | "doesn't"
            | "didn't"
            | "couldn't"
            | "wouldn't"
            | "shouldn't"
    )
}
