//! Result models, re-exported from the `schoolbook-models` crate.

pub use schoolbook_models::results::*;
