// Top-K reduction of a profile vector.
//
// Entries are ranked by descending score, with ties broken by ascending key so
// the result is fully deterministic. The reduced vector keeps that order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::profile::ProfileVector;

/// Default number of signals kept when the caller doesn't choose.
pub const DEFAULT_TOP_K: usize = 3;

/// An ordered subset of a profile vector, strongest signal first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedVector {
    entries: Vec<(String, f64)>,
}

impl RankedVector {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, f64)> {
        self.entries
    }
}

// Serialized as a JSON object whose key order is the ranking order.
impl Serialize for RankedVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, score) in &self.entries {
            map.serialize_entry(key, score)?;
        }
        map.end()
    }
}

/// Keep the `k` highest-scoring entries of `vector`.
///
/// Returns fewer than `k` entries when the vector is smaller, and nothing when
/// `k` is zero. The input is not modified.
pub fn top_k(vector: &ProfileVector, k: usize) -> RankedVector {
    if k == 0 || vector.is_empty() {
        return RankedVector::default();
    }

    let mut entries: Vec<(String, f64)> = vector
        .iter()
        .map(|(key, score)| (key.to_string(), score))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);

    RankedVector { entries }
}

/// Convert a signed K from an untyped source (HTTP body, config) to a count.
/// Negative values select nothing.
pub fn clamp_k(k: i64) -> usize {
    usize::try_from(k).unwrap_or(0)
}
