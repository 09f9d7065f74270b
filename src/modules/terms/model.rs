//! Term models, re-exported from the `schoolbook-models` crate.

pub use schoolbook_models::academics::{AcademicSession, Term, TermWithSession};
