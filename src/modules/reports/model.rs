//! Report models, re-exported from the `schoolbook-models` crate.

pub use schoolbook_models::reports::*;
