//! Payments module.
//!
//! Recording a payment locks the invoice row, checks the amount against the
//! reconciled balance and flips `is_paid` once the balance reaches zero.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
