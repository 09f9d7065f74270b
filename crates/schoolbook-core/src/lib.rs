//! # Schoolbook Core
//!
//! Core types, errors and business rules for the Schoolbook API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`grading`]: Weighted exam scores to final percentage and letter grade
//! - [`ledger`]: Invoice/payment reconciliation
//! - [`pagination`]: Pagination utilities for list endpoints
//! - [`serde`]: Custom serde helpers
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use schoolbook_core::grading::{Component, LetterGrade, compute_final_grade};
//! use schoolbook_core::ledger::compute_balance;
//!
//! let (score, grade) = compute_final_grade(&[Component::new(85.0, 100.0, 100.0)]);
//! assert_eq!(grade, LetterGrade::A);
//! assert!((score - 85.0).abs() < 1e-9);
//!
//! let (paid, balance, is_paid) =
//!     compute_balance(Decimal::from(100), [Decimal::from(40), Decimal::from(60)]);
//! assert_eq!((paid, balance, is_paid), (Decimal::from(100), Decimal::ZERO, true));
//! ```

pub mod errors;
pub mod grading;
pub mod ledger;
pub mod pagination;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use grading::{GradeBreakdown, LetterGrade, Weighted, compute_final_grade};
pub use ledger::{Reconciliation, compute_balance};
pub use pagination::{PaginationMeta, PaginationParams};
