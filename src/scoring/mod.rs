// Scoring: profile building and top-K reduction.

pub mod profile;
pub mod topk;
