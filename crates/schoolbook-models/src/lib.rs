//! # Schoolbook Models
//!
//! Database rows, request DTOs and response shapes shared by the API and the
//! seeding CLI.
//!
//! - [`ids`]: Typed UUID identifiers
//! - [`academics`]: Sessions, terms, classes, students and subjects
//! - [`exam_types`]: Exam types and the weight scheme
//! - [`results`]: Stored scores and grade previews
//! - [`reports`]: Term report document, comments and dashboard
//! - [`finance`]: Fee structures, invoices and payments

pub mod academics;
pub mod exam_types;
pub mod finance;
pub mod ids;
pub mod reports;
pub mod results;

pub use academics::{AcademicSession, ClassArm, SchoolClass, Student, Subject, Term, TermWithSession};
pub use exam_types::{CreateExamTypeDto, ExamType, UpdateExamTypeDto, WeightSchemeStatus};
pub use finance::{
    BulkInvoiceResult, CreateFeeStructureDto, CreateInvoiceDto, CreatePaymentDto, FeeStructure,
    FeeStructureDetail, Invoice, InvoiceDetail, InvoiceFilterParams, InvoiceStatus, Payment,
    PaymentMethod, PaymentReceipt,
};
pub use reports::{CommentType, PerformanceDashboard, SubjectGrade, TermReportDocument};
pub use results::{GradePreviewRequest, GradePreviewResponse, ScoredResult, UpsertResultDto};
