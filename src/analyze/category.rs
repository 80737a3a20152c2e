//! Keyword category classifier.
//!
//! For each configured category, in declaration order, count how many of its
//! keywords/phrases occur in the cleaned text (each keyword counts once).
//! The highest count wins. Ties resolve to the category declared first,
//! which for the built-in table is the order of `Category::ALL`. No hits at
//! all resolves to `Category::Other`.

use serde::Serialize;

use super::matcher::{compile_all, Phrase};
use crate::config::CategoryKeywords;
use crate::error::ConfigError;
use crate::taxonomy::Category;

#[derive(Debug, Clone)]
struct CompiledCategory {
    label: Category,
    phrases: Vec<Phrase>,
}

/// Per-category match count, for explainability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryHits {
    pub category: Category,
    pub matched: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    table: Vec<CompiledCategory>,
}

impl CategoryClassifier {
    pub fn new(categories: &[CategoryKeywords]) -> Result<Self, ConfigError> {
        let table = categories
            .iter()
            .map(|c| {
                Ok(CompiledCategory {
                    label: c.label,
                    phrases: compile_all(c.label.label(), &c.keywords)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { table })
    }

    /// Hits for every category with at least one match, in declaration order.
    pub fn hits(&self, cleaned: &str) -> Vec<CategoryHits> {
        self.table
            .iter()
            .filter_map(|c| {
                let matched: Vec<String> = c
                    .phrases
                    .iter()
                    .filter(|p| p.is_match(cleaned))
                    .map(|p| p.term.clone())
                    .collect();
                (!matched.is_empty()).then_some(CategoryHits {
                    category: c.label,
                    matched,
                })
            })
            .collect()
    }

    pub fn classify(&self, cleaned: &str) -> Category {
        Self::pick(&self.hits(cleaned))
    }

    /// Winner among hits already in declaration order.
    pub fn pick(hits: &[CategoryHits]) -> Category {
        let mut best: Option<(Category, usize)> = None;
        for h in hits {
            let n = h.matched.len();
            // strictly greater: an earlier category keeps a tie
            if best.map_or(true, |(_, top)| n > top) {
                best = Some((h.category, n));
            }
        }
        best.map(|(c, _)| c).unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::analyzer::default_categories;

    fn clf() -> CategoryClassifier {
        CategoryClassifier::new(&default_categories()).unwrap()
    }

    #[test]
    fn no_hits_is_other() {
        assert_eq!(clf().classify(""), Category::Other);
        assert_eq!(clf().classify("just wanted to say hello"), Category::Other);
    }

    #[test]
    fn highest_count_wins() {
        // one billing hit vs two technical hits
        let c = clf().classify("the payment page shows an error and the app crashed");
        assert_eq!(c, Category::TechnicalIssues);
    }

    #[test]
    fn ties_go_to_declaration_order() {
        // "refund" sits in both Billing/Payment and Refund/Return
        assert_eq!(clf().classify("i want a refund"), Category::BillingPayment);

        let reversed = vec![
            CategoryKeywords {
                label: Category::RefundReturn,
                keywords: vec!["refund".into()],
            },
            CategoryKeywords {
                label: Category::BillingPayment,
                keywords: vec!["refund".into()],
            },
        ];
        let c = CategoryClassifier::new(&reversed).unwrap();
        assert_eq!(c.classify("i want a refund"), Category::RefundReturn);
    }

    #[test]
    fn pick_agrees_with_classify() {
        let c = clf();
        for text in [
            "",
            "i want a refund",
            "the payment page shows an error and the app crashed",
            "rude courier, delayed delivery",
        ] {
            assert_eq!(CategoryClassifier::pick(&c.hits(text)), c.classify(text), "{text}");
        }
        assert_eq!(CategoryClassifier::pick(&[]), Category::Other);
    }

    #[test]
    fn keyword_counts_once_per_category() {
        let hits = clf().hits("broken, broken, broken. and the courier was rude and rude");
        let pq = hits
            .iter()
            .find(|h| h.category == Category::ProductQuality)
            .unwrap();
        assert_eq!(pq.matched, vec!["broken"]);
    }

    #[test]
    fn phrases_match_across_punctuation_free_spacing() {
        assert_eq!(
            clf().classify("great customer service, thank you!"),
            Category::CustomerService
        );
        assert_eq!(
            clf().classify("i got locked out of my profile"),
            Category::AccountManagement
        );
    }
}
