//! Reports module.
//!
//! Builds the per-student term report consumed by the PDF renderer, stores
//! teacher and principal comments, and serves the student performance
//! dashboard. [`assembler`] holds the pure assembly; [`service`] does the I/O.

pub mod assembler;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;
