//! Word-boundary phrase matching shared by the category table and the
//! urgency scan.
//!
//! A term compiles to a case-insensitive regex:
//! - words are separated by any run of whitespace, `-` or `_`
//!   ("log in" matches "log-in" and "log  in")
//! - alphanumeric edges are anchored on `\b`, so "app" never fires inside
//!   "disappointed" and "sue" never fires inside "issue"
//! - a trailing plural `s`/`es` is accepted ("refund" matches "refunds")

use regex::Regex;

use crate::error::ConfigError;

/// One compiled term.
#[derive(Debug, Clone)]
pub struct Phrase {
    pub term: String,
    re: Regex,
}

impl Phrase {
    /// `owner` names the table the term came from, for error messages.
    pub fn compile(owner: &str, term: &str) -> Result<Self, ConfigError> {
        let pattern = phrase_pattern(term);
        let re = Regex::new(&pattern).map_err(|source| ConfigError::Pattern {
            owner: owner.to_string(),
            term: term.to_string(),
            source,
        })?;
        Ok(Self {
            term: term.trim().to_lowercase(),
            re,
        })
    }

    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

/// Compile a list of terms, keeping their order.
pub fn compile_all(owner: &str, terms: &[String]) -> Result<Vec<Phrase>, ConfigError> {
    terms.iter().map(|t| Phrase::compile(owner, t)).collect()
}

fn phrase_pattern(term: &str) -> String {
    let lowered = term.trim().to_lowercase();
    let words: Vec<String> = lowered
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    let body = words.join(r"[\s_-]+");

    let starts_word = lowered.chars().next().is_some_and(char::is_alphanumeric);
    let ends_word = lowered.chars().last().is_some_and(char::is_alphanumeric);

    let mut pat = String::from("(?i)");
    if starts_word {
        pat.push_str(r"\b");
    }
    pat.push_str(&body);
    if ends_word {
        pat.push_str(r"(?:e?s)?\b");
    }
    pat
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(term: &str) -> Phrase {
        Phrase::compile("test", term).unwrap()
    }

    #[test]
    fn respects_word_boundaries() {
        assert!(!p("app").is_match("very disappointed"));
        assert!(p("app").is_match("the app keeps crashing"));
        assert!(!p("sue").is_match("there is an issue"));
        assert!(p("sue").is_match("i will sue you"));
    }

    #[test]
    fn accepts_plural_suffixes() {
        assert!(p("refund").is_match("two refunds pending"));
        assert!(p("glitch").is_match("constant glitches"));
        assert!(!p("refund").is_match("refundable"));
    }

    #[test]
    fn phrases_tolerate_separators_and_case() {
        let ph = p("Log In");
        assert!(ph.is_match("cannot log-in anymore"));
        assert!(ph.is_match("cannot LOG   in anymore"));
        assert!(!ph.is_match("catalog index"));
    }

    #[test]
    fn symbols_are_escaped() {
        let ph = p("c++");
        assert!(ph.is_match("written in c++ code"));
        assert!(!ph.is_match("written in c code"));
    }
}
