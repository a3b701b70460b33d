// Quiz data model: the question catalog and the answers submitted against it.

pub mod answers;
pub mod catalog;
