//! Fee structures, invoices and payments.
//!
//! Money is always [`Decimal`]; JSON carries it as a string (`"2500.00"`).

use crate::ids::{
    ClassId, FeeCategoryId, FeeItemId, FeeStructureId, FeeStructureItemId, InvoiceId,
    InvoiceLineItemId, PaymentId, StudentId, TermId,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schoolbook_core::ledger::Reconciliation;
use schoolbook_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("amount")
            .with_message("amount must be greater than zero".into()));
    }
    if value.scale() > 2 {
        return Err(ValidationError::new("amount")
            .with_message("amount cannot have more than 2 decimal places".into()));
    }
    Ok(())
}

fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("amount")
            .with_message("amount cannot be negative".into()));
    }
    if value.scale() > 2 {
        return Err(ValidationError::new("amount")
            .with_message("amount cannot have more than 2 decimal places".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Fee structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FeeCategory {
    pub id: FeeCategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FeeItem {
    pub id: FeeItemId,
    pub category_id: FeeCategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_optional: bool,
    pub is_active: bool,
}

/// The fees charged to one class for one term.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FeeStructure {
    pub id: FeeStructureId,
    pub name: String,
    pub class_id: ClassId,
    pub term_id: TermId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FeeStructureItem {
    pub id: FeeStructureItemId,
    pub fee_item_id: FeeItemId,
    pub fee_item_name: String,
    pub category_name: String,
    pub is_optional: bool,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeeStructureDetail {
    #[serde(flatten)]
    pub structure: FeeStructure,
    pub items: Vec<FeeStructureItem>,
    /// Sum of the item amounts
    pub total_amount: Decimal,
}

impl FeeStructureDetail {
    pub fn new(structure: FeeStructure, items: Vec<FeeStructureItem>) -> Self {
        let total_amount = items.iter().map(|i| i.amount).sum();
        Self {
            structure,
            items,
            total_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FeeStructureItemInput {
    pub fee_item_id: FeeItemId,
    #[validate(custom(function = "validate_non_negative_amount"))]
    #[schema(value_type = String, example = "15000.00")]
    pub amount: Decimal,
}

fn validate_unique_items(items: &[FeeStructureItemInput]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if items.iter().all(|i| seen.insert(i.fee_item_id)) {
        Ok(())
    } else {
        Err(ValidationError::new("items")
            .with_message("each fee item may appear only once".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateFeeStructureDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub class_id: ClassId,
    pub term_id: TermId,
    #[validate(
        length(min = 1, message = "at least one fee item is required"),
        custom(function = "validate_unique_items"),
        nested
    )]
    pub items: Vec<FeeStructureItemInput>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct FeeStructureFilterParams {
    #[serde(default, deserialize_with = "schoolbook_core::serde::empty_string_as_none")]
    pub term_id: Option<TermId>,
    #[serde(default, deserialize_with = "schoolbook_core::serde::empty_string_as_none")]
    pub class_id: Option<ClassId>,
}

/// Per-class totals for a term.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassFeeTotal {
    pub fee_structure_id: FeeStructureId,
    pub structure_name: String,
    pub class_id: ClassId,
    pub class_name: String,
    pub total_amount: Decimal,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TermFeeSummary {
    pub term_id: TermId,
    pub classes: Vec<ClassFeeTotal>,
    pub grand_total: Decimal,
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

/// Invoice row with its total derived from the line items and payments.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub student_id: StudentId,
    pub student_name: String,
    pub fee_structure_id: FeeStructureId,
    pub term_id: TermId,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub is_paid: bool,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn reconciliation(&self) -> Reconciliation {
        Reconciliation::new(self.total_amount, [self.paid_amount])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InvoiceLineItem {
    pub id: InvoiceLineItemId,
    pub fee_item_id: FeeItemId,
    pub fee_item_name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub line_items: Vec<InvoiceLineItem>,
    pub payments: Vec<Payment>,
    pub reconciliation: Reconciliation,
    pub is_overdue: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateInvoiceDto {
    pub student_id: StudentId,
    pub fee_structure_id: FeeStructureId,
    /// Defaults to the configured number of days after today
    pub due_date: Option<NaiveDate>,
    #[validate(length(max = 1000, message = "notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
}

impl InvoiceStatus {
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(Self::Paid),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(format!("unknown invoice status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct InvoiceFilterParams {
    #[serde(default, deserialize_with = "schoolbook_core::serde::empty_string_as_none")]
    pub student_id: Option<StudentId>,
    #[serde(default, deserialize_with = "schoolbook_core::serde::empty_string_as_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(default, deserialize_with = "schoolbook_core::serde::empty_string_as_none")]
    pub term_id: Option<TermId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedInvoicesResponse {
    pub data: Vec<Invoice>,
    pub meta: PaginationMeta,
}

/// Outcome of invoicing every eligible student for a term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkInvoiceResult {
    pub created: u64,
    /// Students that already had an invoice for their class's structure
    pub skipped: u64,
    /// Active students whose class has no active fee structure for the term
    pub without_structure: u64,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Bank,
    Card,
    Mobile,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::Card => "card",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            "card" => Ok(Self::Card),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentDto {
    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = String, example = "5000.00")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    /// Defaults to today
    pub payment_date: Option<NaiveDate>,
    #[validate(length(max = 50, message = "transaction_reference cannot exceed 50 characters"))]
    pub transaction_reference: Option<String>,
    #[validate(length(max = 1000, message = "notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// A stored payment together with the invoice state it produced.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub invoice_number: String,
    pub reconciliation: Reconciliation,
}
