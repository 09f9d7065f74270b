//! Exam types module.
//!
//! Exam types carry the weights the grade engine applies. The scheme may be
//! assembled one type at a time, so writes only refuse totals above 100; the
//! `/scheme` endpoint reports whether the total is exactly 100.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
