//! Fee structures module.
//!
//! A fee structure lists the fee items charged to one class for one term.
//! Invoices copy its items when they are issued.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
