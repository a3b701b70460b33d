// Answers: what the user picked for each question.
//
// A selection is either a single option label or an ordered list of labels
// (multi-select). Hosts usually hand us answers as JSON from a form
// submission, so deserialization is lenient: values that are
// neither a string nor an array are dropped instead of failing the request,
// and answers that are not an object at all read as no answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// The option(s) chosen for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

impl Selection {
    /// The selected labels as an ordered sequence.
    pub fn labels(&self) -> &[String] {
        match self {
            Selection::One(label) => std::slice::from_ref(label),
            Selection::Many(labels) => labels,
        }
    }
}

impl From<&str> for Selection {
    fn from(label: &str) -> Self {
        Selection::One(label.to_string())
    }
}

impl From<String> for Selection {
    fn from(label: String) -> Self {
        Selection::One(label)
    }
}

impl From<Vec<String>> for Selection {
    fn from(labels: Vec<String>) -> Self {
        Selection::Many(labels)
    }
}

impl From<&[&str]> for Selection {
    fn from(labels: &[&str]) -> Self {
        Selection::Many(labels.iter().map(|l| l.to_string()).collect())
    }
}

/// Question id -> selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    #[serde(deserialize_with = "deserialize_lenient")]
    selections: BTreeMap<String, Selection>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection for a question, replacing any previous one.
    pub fn insert(&mut self, question_id: impl Into<String>, selection: impl Into<Selection>) {
        self.selections.insert(question_id.into(), selection.into());
    }

    /// Add one more label to a question's selection.
    ///
    /// The first label for a question is stored as a single choice; a second
    /// one turns it into a multi-select.
    pub fn select(&mut self, question_id: impl Into<String>, label: impl Into<String>) {
        let label = label.into();
        let question_id = question_id.into();
        let updated = match self.selections.remove(&question_id) {
            None => Selection::One(label),
            Some(Selection::One(first)) => Selection::Many(vec![first, label]),
            Some(Selection::Many(mut labels)) => {
                labels.push(label);
                Selection::Many(labels)
            }
        };
        self.selections.insert(question_id, updated);
    }

    pub fn get(&self, question_id: &str) -> Option<&Selection> {
        self.selections.get(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Selection)> {
        self.selections.iter()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl<K: Into<String>, S: Into<Selection>> FromIterator<(K, S)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut answers = Answers::new();
        for (question_id, selection) in iter {
            answers.insert(question_id, selection);
        }
        answers
    }
}

fn deserialize_lenient<'de, D>(deserializer: D) -> Result<BTreeMap<String, Selection>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        other => {
            debug!(kind = value_kind(&other), "Ignoring answers that are not an object");
            return Ok(BTreeMap::new());
        }
    };
    Ok(raw
        .into_iter()
        .filter_map(|(question_id, value)| {
            let selection = selection_from_value(value);
            if selection.is_none() {
                debug!(question = %question_id, "Ignoring answer that is neither a label nor a list");
            }
            selection.map(|s| (question_id, s))
        })
        .collect())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn selection_from_value(value: Value) -> Option<Selection> {
    match value {
        Value::String(label) => Some(Selection::One(label)),
        // Non-string entries can never match an option label
        Value::Array(items) => Some(Selection::Many(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(label) => Some(label),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    }
}
