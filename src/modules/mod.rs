pub mod exam_types;
pub mod fee_structures;
pub mod invoices;
pub mod payments;
pub mod reports;
pub mod results;
pub mod terms;
