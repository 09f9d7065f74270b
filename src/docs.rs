use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use schoolbook_core::grading::{GradeBreakdown, LetterGrade};
use schoolbook_core::ledger::Reconciliation;
use schoolbook_core::{PaginationMeta, PaginationParams};
use schoolbook_models::academics::{ClassArm, TermWithSession};
use schoolbook_models::exam_types::{
    CreateExamTypeDto, ExamType, UpdateExamTypeDto, WeightSchemeStatus,
};
use schoolbook_models::finance::{
    BulkInvoiceResult, ClassFeeTotal, CreateFeeStructureDto, CreateInvoiceDto, CreatePaymentDto,
    FeeStructure, FeeStructureDetail, FeeStructureItem, FeeStructureItemInput, Invoice,
    InvoiceDetail, InvoiceLineItem, InvoiceStatus, PaginatedInvoicesResponse, Payment,
    PaymentMethod, PaymentReceipt, TermFeeSummary,
};
use schoolbook_models::reports::{
    CommentType, Comparison, ComponentScore, PerformanceDashboard, ReportComment,
    ReportCommentView, ReportHeader, ReportSummary, SubjectGrade, SubjectPerformance,
    TermAverage, TermReportDocument, UpsertCommentDto,
};
use schoolbook_models::results::{
    GradeComponentInput, GradePreviewRequest, GradePreviewResponse, ScoredResult, UpsertResultDto,
};

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Term not found")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::terms::controller::get_current_term,
        crate::modules::exam_types::controller::list_exam_types,
        crate::modules::exam_types::controller::create_exam_type,
        crate::modules::exam_types::controller::update_exam_type,
        crate::modules::exam_types::controller::delete_exam_type,
        crate::modules::exam_types::controller::get_weight_scheme,
        crate::modules::results::controller::upsert_result,
        crate::modules::results::controller::get_student_results,
        crate::modules::results::controller::preview_grade,
        crate::modules::reports::controller::get_term_report,
        crate::modules::reports::controller::upsert_report_comment,
        crate::modules::reports::controller::get_performance,
        crate::modules::fee_structures::controller::create_fee_structure,
        crate::modules::fee_structures::controller::list_fee_structures,
        crate::modules::fee_structures::controller::get_fee_structure,
        crate::modules::fee_structures::controller::get_term_fee_summary,
        crate::modules::invoices::controller::create_invoice,
        crate::modules::invoices::controller::list_invoices,
        crate::modules::invoices::controller::get_invoice,
        crate::modules::invoices::controller::generate_term_invoices,
        crate::modules::payments::controller::record_payment,
        crate::modules::payments::controller::list_payments,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            LetterGrade,
            GradeBreakdown,
            Reconciliation,
            TermWithSession,
            ClassArm,
            ExamType,
            CreateExamTypeDto,
            UpdateExamTypeDto,
            WeightSchemeStatus,
            ScoredResult,
            UpsertResultDto,
            GradeComponentInput,
            GradePreviewRequest,
            GradePreviewResponse,
            CommentType,
            Comparison,
            ComponentScore,
            SubjectGrade,
            ReportHeader,
            ReportComment,
            ReportCommentView,
            ReportSummary,
            TermReportDocument,
            UpsertCommentDto,
            TermAverage,
            SubjectPerformance,
            PerformanceDashboard,
            FeeStructure,
            FeeStructureItem,
            FeeStructureItemInput,
            FeeStructureDetail,
            CreateFeeStructureDto,
            ClassFeeTotal,
            TermFeeSummary,
            Invoice,
            InvoiceLineItem,
            InvoiceDetail,
            InvoiceStatus,
            CreateInvoiceDto,
            PaginatedInvoicesResponse,
            BulkInvoiceResult,
            Payment,
            PaymentMethod,
            CreatePaymentDto,
            PaymentReceipt,
        )
    ),
    tags(
        (name = "Terms", description = "Academic calendar lookups"),
        (name = "Exam Types", description = "Exam types and the weight scheme"),
        (name = "Results", description = "Score entry and grade computation"),
        (name = "Reports", description = "Term reports, comments and performance dashboard"),
        (name = "Fee Structures", description = "Fee structures per class and term"),
        (name = "Invoices", description = "Single and bulk invoicing"),
        (name = "Payments", description = "Payment recording and reconciliation"),
    ),
    info(
        title = "Schoolbook API",
        version = "0.1.0",
        description = "Grades, term reports, invoicing and payments for a school",
    )
)]
pub struct ApiDoc;
