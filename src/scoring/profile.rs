// Profile builder: folds quiz answers into a weighted preference vector.
//
// For every (question, selected option) pair that exists in the catalog, the
// option's weight contribution map is flattened into "<category>:<tag>" keys
// and summed into the profile. Unknown questions and labels contribute
// nothing. Scores are raw sums, not normalized.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::quiz::answers::Answers;
use crate::quiz::catalog::QuestionCatalog;
use crate::scoring::topk::{self, RankedVector};

/// Flatten a category/tag pair into a single profile key.
pub fn composite_key(category: &str, tag: &str) -> String {
    format!("{category}:{tag}")
}

/// Accumulated score per composite key.
///
/// Only keys contributed by at least one matched option are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfileVector {
    scores: BTreeMap<String, f64>,
}

impl ProfileVector {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of every score in the vector.
    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }

    /// The `k` strongest signals. See [`topk::top_k`].
    pub fn top_k(&self, k: usize) -> RankedVector {
        topk::top_k(self, k)
    }

    /// Sums saturate at +/- `f64::MAX` so every score stays a finite real.
    fn add(&mut self, key: String, weight: f64) {
        let score = self.scores.entry(key).or_insert(0.0);
        let sum = *score + weight;
        *score = if sum.is_infinite() {
            warn!(weight, "Profile score overflowed; saturating at f64::MAX");
            sum.clamp(-f64::MAX, f64::MAX)
        } else {
            sum
        };
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ProfileVector {
    /// Builds a vector by summing weights per key.
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut vector = ProfileVector::default();
        for (key, weight) in iter {
            vector.add(key.into(), weight);
        }
        vector
    }
}

/// Build a profile vector from answers against the given catalog.
///
/// Never fails: unknown question ids, unknown option labels, and options with
/// no weights are skipped.
pub fn build_profile(answers: &Answers, catalog: &QuestionCatalog) -> ProfileVector {
    let mut profile = ProfileVector::default();
    let mut matched = 0usize;

    for (question_id, selection) in answers.iter() {
        let Some(question) = catalog.question(question_id) else {
            debug!(question = %question_id, "Skipping unknown question");
            continue;
        };

        for label in selection.labels() {
            let Some(weights) = question.option(label).filter(|w| !w.is_empty()) else {
                debug!(question = %question_id, option = %label, "Skipping unknown or empty option");
                continue;
            };

            matched += 1;
            for (category, tags) in weights {
                for (tag, weight) in tags {
                    profile.add(composite_key(category, tag), *weight);
                }
            }
        }
    }

    debug!(
        answers = answers.len(),
        matched_options = matched,
        keys = profile.len(),
        "Built profile vector"
    );

    profile
}

/// Build a profile vector against the built-in catalog.
pub fn build_builtin_profile(answers: &Answers) -> ProfileVector {
    build_profile(answers, QuestionCatalog::builtin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::catalog::Question;

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key("Color Palette", "cool"), "Color Palette:cool");
    }

    #[test]
    fn test_explicit_zero_weight_is_kept() {
        let catalog = QuestionCatalog::new().with_question(
            "Q",
            Question::new("?").with_option("A", &[("Style", &[("minimal", 0.0)])]),
        );
        let answers: Answers = [("Q", "A")].into_iter().collect();
        let profile = build_profile(&answers, &catalog);
        assert_eq!(profile.get("Style:minimal"), Some(0.0));
        assert_eq!(profile.len(), 1);
    }

    #[test]
    fn test_same_key_accumulates_across_questions() {
        let answers: Answers = [
            ("Q1_go_to_outfit", "Boho/Romantic"),
            ("Q3_favorite_fabric", "Relaxed Linen"),
        ]
        .into_iter()
        .collect();
        let profile = build_builtin_profile(&answers);
        assert!((profile.get("Fabric:linen").unwrap() - 1.8).abs() < 1e-9);
        assert!((profile.get("Style:boho").unwrap() - 1.3).abs() < 1e-9);
        assert!((profile.get("Occasion:casual").unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_from_iter_sums_duplicates() {
        let v: ProfileVector = [("a", 1.0), ("b", 0.5), ("a", 0.25)].into_iter().collect();
        assert_eq!(v.get("a"), Some(1.25));
        assert_eq!(v.total(), 1.75);
    }

    #[test]
    fn test_overflowing_sum_saturates() {
        let v: ProfileVector = [("a", f64::MAX), ("a", f64::MAX), ("b", 1.0), ("c", -f64::MAX), ("c", -f64::MAX)]
            .into_iter()
            .collect();
        assert_eq!(v.get("a"), Some(f64::MAX));
        assert_eq!(v.get("c"), Some(-f64::MAX));

        let json = serde_json::to_string(&v.top_k(2)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["a"].is_f64(), "{json}");
        assert_eq!(parsed["b"], 1.0);
    }

    #[test]
    fn test_overflow_through_catalog_saturates() {
        let catalog = QuestionCatalog::new()
            .with_question("Q1", Question::new("?").with_option("A", &[("Style", &[("big", f64::MAX)])]))
            .with_question("Q2", Question::new("?").with_option("A", &[("Style", &[("big", f64::MAX)])]));
        let answers: Answers = [("Q1", "A"), ("Q2", "A")].into_iter().collect();
        let profile = build_profile(&answers, &catalog);
        assert_eq!(profile.get("Style:big"), Some(f64::MAX));
    }
}
