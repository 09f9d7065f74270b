//! Terms module.
//!
//! Read access to the academic calendar. Every term-scoped operation that
//! accepts an optional `term_id` resolves it here, falling back to the
//! current term.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
