//! Frequency keyword extraction over normalized tokens.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct KeywordExtractor {
    count: usize,
    min_len: usize,
}

impl KeywordExtractor {
    pub fn new(count: usize, min_len: usize) -> Self {
        Self { count, min_len }
    }

    /// Up to `count` distinct tokens, most frequent first; ties keep the
    /// order of first occurrence. Short and purely numeric tokens are skipped.
    pub fn extract(&self, tokens: &[String]) -> Vec<String> {
        // token -> (frequency, first index)
        let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();
        for (i, t) in tokens.iter().enumerate() {
            if t.chars().count() < self.min_len || t.chars().all(|c| c.is_numeric()) {
                continue;
            }
            stats.entry(t.as_str()).or_insert((0, i)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> =
            stats.into_iter().map(|(t, (n, first))| (t, n, first)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked
            .into_iter()
            .take(self.count)
            .map(|(t, _, _)| t.to_string())
            .collect()
    }
}
