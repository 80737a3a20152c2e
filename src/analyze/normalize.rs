//! Text normalizer: raw complaint text → cleaned string + base-form tokens.
//!
//! Steps, in order:
//! 1) decode HTML entities, fold curly apostrophes
//! 2) count `!` (kept as an emphasis signal for the scorer)
//! 3) lowercase
//! 4) strip URLs and e-mail addresses
//! 5) fold whitespace → `cleaned` (punctuation kept for phrase matching)
//! 6) tokenize into letter/digit runs (inner apostrophes allowed)
//! 7) drop stopwords
//! 8) lemmatize
//!
//! Never fails; text without recognizable words yields no tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::PreprocessingConfig;

static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+|www\.\S+").expect("url regex"));
static RE_EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").expect("email regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}\p{N}]+)*").expect("word regex"));

/// English stopwords (NLTK list).
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Irregular forms with a fixed base form; words mapped to themselves are
/// shielded from the suffix rules.
static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("people", "person"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("knives", "knife"),
        ("wives", "wife"),
        ("lives", "life"),
        ("leaves", "leaf"),
        ("shelves", "shelf"),
        ("always", "always"),
        ("perhaps", "perhaps"),
        ("news", "news"),
        ("series", "series"),
        ("species", "species"),
        ("towards", "towards"),
        ("afterwards", "afterwards"),
        ("whereas", "whereas"),
        ("sometimes", "sometimes"),
        ("christmas", "christmas"),
        ("lens", "lens"),
        ("yes", "yes"),
    ]
    .into_iter()
    .collect()
});

/// Output of the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Lowercased, URL/e-mail free, whitespace folded. Punctuation retained.
    pub cleaned: String,
    /// Stopword-free base forms, in text order (may repeat).
    pub tokens: Vec<String>,
    /// Number of `!` in the input.
    pub exclamations: usize,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    cfg: PreprocessingConfig,
    stopwords: HashSet<String>,
}

impl Normalizer {
    pub fn new(cfg: PreprocessingConfig) -> Self {
        let mut stopwords: HashSet<String> = match &cfg.stopwords {
            Some(list) => list.iter().map(|s| fold_apostrophes(s.trim()).to_lowercase()).collect(),
            None => DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        };
        stopwords.extend(
            cfg.extra_stopwords
                .iter()
                .map(|s| fold_apostrophes(s.trim()).to_lowercase()),
        );
        Self { cfg, stopwords }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let decoded = fold_apostrophes(&html_escape::decode_html_entities(raw));
        let exclamations = decoded.chars().filter(|&c| c == '!').count();

        let mut text = decoded.to_lowercase();
        if self.cfg.remove_urls {
            text = RE_URL.replace_all(&text, " ").into_owned();
        }
        if self.cfg.remove_emails {
            text = RE_EMAIL.replace_all(&text, " ").into_owned();
        }
        let cleaned = RE_WS.replace_all(&text, " ").trim().to_string();

        if cleaned.chars().count() < self.cfg.min_length {
            debug!(
                len = cleaned.chars().count(),
                min = self.cfg.min_length,
                "text too short after cleaning"
            );
        }

        let tokens = word_tokens(&cleaned)
            .filter(|t| !(self.cfg.remove_stopwords && self.is_stopword(t)))
            .map(|t| {
                if self.cfg.lemmatize {
                    lemmatize(t)
                } else {
                    t.replace('\'', "")
                }
            })
            .filter(|t| !t.is_empty())
            .collect();

        NormalizedText {
            cleaned,
            tokens,
            exclamations,
        }
    }
}

/// Word tokens of an already-lowercased string. Apostrophes inside words
/// are kept so contractions ("don't") stay intact for stopword and negation
/// lookups.
pub fn word_tokens(s: &str) -> impl Iterator<Item = &str> + '_ {
    RE_WORD.find_iter(s).map(|m| m.as_str())
}

/// Reduce a lowercased token to a base form. Conservative: only noun
/// plurals, possessives and a small irregular table.
pub fn lemmatize(token: &str) -> String {
    let token = token.strip_suffix("'s").unwrap_or(token);
    let word: String = token.chars().filter(|&c| c != '\'').collect();

    if let Some(base) = IRREGULAR.get(word.as_str()) {
        return (*base).to_string();
    }
    if word.chars().count() <= 3 || !word.is_ascii() {
        return word;
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }
    word
}

fn fold_apostrophes(s: &str) -> String {
    s.replace(['\u{2019}', '\u{2018}', '\u{02BC}'], "'")
}
