//! Exam type models, re-exported from the `schoolbook-models` crate.

pub use schoolbook_models::exam_types::*;
