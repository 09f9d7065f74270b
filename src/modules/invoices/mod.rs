//! Invoices module.
//!
//! Invoices are issued from a fee structure, one per student, either singly or
//! for every eligible student of a term. The line items are copied from the
//! structure in the same transaction, so later edits to the structure never
//! change an issued invoice.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
