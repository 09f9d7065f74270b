//! Invoice and payment reconciliation.
//!
//! An invoice's total is fixed when it is issued (the sum of its line items).
//! Everything else is derived from the payments recorded against it:
//! `paid = sum(payments)`, `balance = total - paid`, `is_paid = balance <= 0`.
//! Nothing here touches storage; the finance services feed these functions
//! with rows they have already locked.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Derived payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Reconciliation {
    pub total_amount: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
    pub is_paid: bool,
}

impl Reconciliation {
    pub fn new<I>(total_amount: Decimal, payments: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let paid: Decimal = payments.into_iter().sum();
        let balance = total_amount - paid;
        Self {
            total_amount,
            paid,
            balance,
            is_paid: balance <= Decimal::ZERO,
        }
    }
}

impl From<Reconciliation> for (Decimal, Decimal, bool) {
    fn from(r: Reconciliation) -> Self {
        (r.paid, r.balance, r.is_paid)
    }
}

/// `(paid, balance, is_paid)` for an invoice total and its payment amounts.
pub fn compute_balance<I>(total_amount: Decimal, payments: I) -> (Decimal, Decimal, bool)
where
    I: IntoIterator<Item = Decimal>,
{
    Reconciliation::new(total_amount, payments).into()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Payment amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Invoice is already fully paid")]
    AlreadyPaid,
    #[error("Payment amount ({amount}) exceeds the outstanding balance ({balance})")]
    ExceedsBalance { amount: Decimal, balance: Decimal },
}

/// Checks a new payment against the invoice's current balance.
///
/// Returns the reconciliation the invoice will have once the payment is stored.
pub fn validate_payment<I>(
    total_amount: Decimal,
    payments: I,
    amount: Decimal,
) -> Result<Reconciliation, LedgerError>
where
    I: IntoIterator<Item = Decimal>,
{
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }

    let current = Reconciliation::new(total_amount, payments);
    if current.is_paid {
        return Err(LedgerError::AlreadyPaid);
    }
    if amount > current.balance {
        return Err(LedgerError::ExceedsBalance {
            amount,
            balance: current.balance,
        });
    }

    Ok(Reconciliation::new(total_amount, [current.paid, amount]))
}

/// An unpaid invoice is overdue from the day after its due date.
pub fn is_overdue(due_date: NaiveDate, today: NaiveDate, is_paid: bool) -> bool {
    !is_paid && due_date < today
}

/// `INV00042` style number from a sequence value.
pub fn format_invoice_number(prefix: &str, sequence: i64) -> String {
    format!("{prefix}{sequence:05}")
}
