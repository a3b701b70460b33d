// Style quiz: turn questionnaire answers into a weighted aesthetic profile.
//
// This is the library root. `quiz` holds the catalog and answer types,
// `scoring` turns answers into a profile vector and reduces it to its
// strongest signals.

pub mod config;
pub mod output;
pub mod quiz;
pub mod scoring;

#[cfg(feature = "web")]
pub mod web;

pub use quiz::answers::{Answers, Selection};
pub use quiz::catalog::{CatalogError, Question, QuestionCatalog, WeightMap};
pub use scoring::profile::{build_builtin_profile, build_profile, composite_key, ProfileVector};
pub use scoring::topk::{top_k, RankedVector, DEFAULT_TOP_K};
