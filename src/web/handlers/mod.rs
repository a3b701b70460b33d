// HTTP handlers, one module per resource.

pub mod profile;
pub mod questions;
pub mod status;
