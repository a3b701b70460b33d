// Question catalog: the static questionnaire and the weights behind each option.
//
// A catalog maps question ids to a prompt plus a set of options. Each option
// carries a weight contribution map (category -> tag -> weight) that the
// profile builder folds into the user's profile vector when the option is
// selected.
//
// The built-in catalog is embedded here. A catalog can also be loaded from
// JSON as long as it keeps the same nesting:
//
//   { "<qid>": { "question": "...", "options": { "<label>": { "<category>": { "<tag>": 1.0 } } } } }

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::scoring::profile::composite_key;

/// Category -> tag -> weight contributed by one selected option.
pub type WeightMap = BTreeMap<String, BTreeMap<String, f64>>;

/// Errors raised while loading an externalized catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid contribution value {value} for {key} (question {question:?}, option {option:?})")]
    InvalidContribution {
        question: String,
        option: String,
        key: String,
        value: String,
    },
}

/// One quiz question: the prompt shown to the user and its selectable options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: BTreeMap<String, WeightMap>,
}

impl Question {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: BTreeMap::new(),
        }
    }

    /// Add an option with its weight contributions, given as
    /// `(category, [(tag, weight), ...])` pairs.
    pub fn with_option(mut self, label: impl Into<String>, weights: &[(&str, &[(&str, f64)])]) -> Self {
        let mut map = WeightMap::new();
        for (category, tags) in weights {
            let entry = map.entry(category.to_string()).or_default();
            for (tag, weight) in tags.iter() {
                entry.insert(tag.to_string(), *weight);
            }
        }
        self.options.insert(label.into(), map);
        self
    }

    /// Weight contributions for an option label, if the option exists.
    pub fn option(&self, label: &str) -> Option<&WeightMap> {
        self.options.get(label)
    }
}

/// The full questionnaire, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuestionCatalog {
    questions: BTreeMap<String, Question>,
}

impl QuestionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(mut self, id: impl Into<String>, question: Question) -> Self {
        self.questions.insert(id.into(), question);
        self
    }

    /// The embedded catalog, built once and shared read-only by every caller.
    pub fn builtin() -> &'static QuestionCatalog {
        &BUILTIN
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Question)> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Load a catalog from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            questions = catalog.len(),
            "Loaded question catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON, coercing every weight to an `f64`.
    ///
    /// Numbers are taken as-is and numeric strings are parsed. Anything else,
    /// or a weight that is not finite, is rejected with
    /// [`CatalogError::InvalidContribution`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, RawQuestion> = serde_json::from_str(json)?;

        let mut questions = BTreeMap::new();
        for (qid, raw_question) in raw {
            let mut options = BTreeMap::new();
            for (label, raw_weights) in raw_question.options {
                let mut weights = WeightMap::new();
                // A null option contributes nothing, same as an empty map
                for (category, tags) in raw_weights.unwrap_or_default() {
                    let mut tag_weights = BTreeMap::new();
                    for (tag, value) in tags {
                        let weight = coerce_weight(&value).ok_or_else(|| {
                            CatalogError::InvalidContribution {
                                question: qid.clone(),
                                option: label.clone(),
                                key: composite_key(&category, &tag),
                                value: value.to_string(),
                            }
                        })?;
                        tag_weights.insert(tag, weight);
                    }
                    weights.insert(category, tag_weights);
                }
                options.insert(label, weights);
            }
            questions.insert(
                qid,
                Question {
                    prompt: raw_question.question,
                    options,
                },
            );
        }

        Ok(Self { questions })
    }
}

/// On-disk shape of a question before weights are coerced.
#[derive(Deserialize)]
struct RawQuestion {
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: BTreeMap<String, Option<BTreeMap<String, BTreeMap<String, Value>>>>,
}

fn coerce_weight(value: &Value) -> Option<f64> {
    let weight = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    weight.is_finite().then_some(weight)
}

static BUILTIN: LazyLock<QuestionCatalog> = LazyLock::new(|| {
    QuestionCatalog::new()
        .with_question(
            "Q1_go_to_outfit",
            Question::new("What’s your go-to outfit for a casual day out that you actually like?")
                .with_option(
                    "Minimal & Clean",
                    &[
                        ("Style", &[("minimal", 1.0)]),
                        ("Color Palette", &[("neutrals", 1.0)]),
                        ("Pattern", &[("solid", 0.8)]),
                        ("Fit", &[("regular", 0.5)]),
                        ("Occasion", &[("casual", 0.6)]),
                    ],
                )
                .with_option(
                    "Classic/Preppy",
                    &[
                        ("Style", &[("classic", 1.0)]),
                        ("Pattern", &[("stripes", 0.8), ("checks", 0.8)]),
                        ("Fit", &[("tailored", 0.8)]),
                        ("Occasion", &[("casual", 0.6)]),
                    ],
                )
                .with_option(
                    "Streetwear/Athleisure",
                    &[
                        ("Style", &[("street", 1.0)]),
                        ("Occasion", &[("athleisure", 1.0), ("casual", 0.6)]),
                        ("Fit", &[("oversized", 0.7), ("regular", 0.4)]),
                        ("Pattern", &[("graphic", 0.5)]),
                    ],
                )
                .with_option(
                    "Trend-forward/Edgy",
                    &[
                        ("Style", &[("trend", 1.0)]),
                        ("Pattern", &[("prints", 0.6)]),
                        ("Fit", &[("slim", 0.4), ("oversized", 0.4)]),
                        ("Occasion", &[("party", 0.8)]),
                    ],
                )
                .with_option(
                    "Boho/Romantic",
                    &[
                        ("Style", &[("boho", 1.0)]),
                        ("Fabric", &[("linen", 0.8), ("cotton", 0.4)]),
                        ("Pattern", &[("prints", 0.6), ("floral", 0.8)]),
                        ("Fit", &[("regular", 0.4), ("oversized", 0.4)]),
                        ("Occasion", &[("casual", 0.6)]),
                    ],
                )
                .with_option(
                    "Elevated Casual",
                    &[
                        ("Style", &[("smart-casual", 1.0)]),
                        ("Fit", &[("tailored", 0.8)]),
                        ("Occasion", &[("casual", 0.8), ("work", 0.4)]),
                        ("Color Palette", &[("neutrals", 0.6)]),
                    ],
                ),
        )
        .with_question(
            "Q2_preferred_palette",
            Question::new("Which colors do you reach for most often?")
                .with_option("Warm & Earthy", &[("Color Palette", &[("warm", 1.0)])])
                .with_option("Cool & Icy", &[("Color Palette", &[("cool", 1.0)])])
                .with_option("Monochrome / Neutrals", &[("Color Palette", &[("neutrals", 1.0)])])
                .with_option("Bright & Light", &[("Color Palette", &[("light", 1.0)])])
                .with_option("Dark & Moody", &[("Color Palette", &[("dark", 1.0)])]),
        )
        .with_question(
            "Q3_favorite_fabric",
            Question::new("What fabrics do you gravitate towards?")
                .with_option("Breathable Cotton", &[("Fabric", &[("cotton", 1.0)])])
                .with_option(
                    "Soft Wool",
                    &[("Fabric", &[("wool", 1.0)]), ("Occasion", &[("work", 0.3)])],
                )
                .with_option(
                    "Relaxed Linen",
                    &[
                        ("Fabric", &[("linen", 1.0)]),
                        ("Style", &[("boho", 0.3)]),
                        ("Occasion", &[("casual", 0.2)]),
                    ],
                ),
        )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_three_questions() {
        let catalog = QuestionCatalog::builtin();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.question("Q1_go_to_outfit").unwrap().options.len(), 6);
        assert_eq!(catalog.question("Q2_preferred_palette").unwrap().options.len(), 5);
        assert_eq!(catalog.question("Q3_favorite_fabric").unwrap().options.len(), 3);
    }

    #[test]
    fn test_builtin_weights() {
        let q1 = QuestionCatalog::builtin().question("Q1_go_to_outfit").unwrap();
        let street = q1.option("Streetwear/Athleisure").unwrap();
        assert_eq!(street["Occasion"]["athleisure"], 1.0);
        assert_eq!(street["Fit"]["oversized"], 0.7);
    }

    #[test]
    fn test_serialized_shape_uses_question_and_options_keys() {
        let value = serde_json::to_value(QuestionCatalog::builtin()).unwrap();
        assert_eq!(
            value["Q2_preferred_palette"]["question"],
            "Which colors do you reach for most often?"
        );
        assert_eq!(
            value["Q3_favorite_fabric"]["options"]["Soft Wool"]["Occasion"]["work"],
            0.3
        );
    }

    #[test]
    fn test_numeric_string_weight_is_coerced() {
        let json = r#"{"Q": {"question": "?", "options": {"A": {"Style": {"minimal": "0.5"}}}}}"#;
        let catalog = QuestionCatalog::from_json_str(json).unwrap();
        let weights = catalog.question("Q").unwrap().option("A").unwrap();
        assert_eq!(weights["Style"]["minimal"], 0.5);
    }

    #[test]
    fn test_non_numeric_weight_is_rejected() {
        let json = r#"{"Q": {"question": "?", "options": {"A": {"Style": {"minimal": "lots"}}}}}"#;
        match QuestionCatalog::from_json_str(json) {
            Err(CatalogError::InvalidContribution { question, option, key, .. }) => {
                assert_eq!(question, "Q");
                assert_eq!(option, "A");
                assert_eq!(key, "Style:minimal");
            }
            other => panic!("expected InvalidContribution, got {other:?}"),
        }
    }

    #[test]
    fn test_bool_and_infinite_weights_are_rejected() {
        let bool_json = r#"{"Q": {"options": {"A": {"Style": {"minimal": true}}}}}"#;
        assert!(matches!(
            QuestionCatalog::from_json_str(bool_json),
            Err(CatalogError::InvalidContribution { .. })
        ));

        let inf_json = r#"{"Q": {"options": {"A": {"Style": {"minimal": "inf"}}}}}"#;
        assert!(matches!(
            QuestionCatalog::from_json_str(inf_json),
            Err(CatalogError::InvalidContribution { .. })
        ));
    }

    #[test]
    fn test_null_option_and_missing_fields_load_empty() {
        let json = r#"{"Q": {"options": {"A": null, "B": {}}}, "R": {"question": "bare"}}"#;
        let catalog = QuestionCatalog::from_json_str(json).unwrap();
        let q = catalog.question("Q").unwrap();
        assert_eq!(q.prompt, "");
        assert!(q.option("A").unwrap().is_empty());
        assert!(q.option("B").unwrap().is_empty());
        assert!(catalog.question("R").unwrap().options.is_empty());
    }

    #[test]
    fn test_negative_weight_is_allowed() {
        let json = r#"{"Q": {"options": {"A": {"Style": {"boho": -0.5}}}}}"#;
        let catalog = QuestionCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.question("Q").unwrap().option("A").unwrap()["Style"]["boho"], -0.5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = QuestionCatalog::from_path(Path::new("/nonexistent/stylequiz-catalog.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
