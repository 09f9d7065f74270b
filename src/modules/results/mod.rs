//! Results module.
//!
//! Score entry (an upsert keyed on student, term, subject and exam type),
//! per-student listings and the stateless grade preview.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
