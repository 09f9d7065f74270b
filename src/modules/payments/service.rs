use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor, PgPool};
use tracing::instrument;

use schoolbook_core::AppError;
use schoolbook_core::ledger::validate_payment;
use schoolbook_models::ids::InvoiceId;
use schoolbook_observability::track_payment_recorded;

use crate::modules::payments::model::{CreatePaymentDto, Payment, PaymentReceipt};

const PAYMENT_COLUMNS: &str = "id, invoice_id, amount, payment_date, payment_method, \
                               transaction_reference, notes, created_at";

#[derive(FromRow)]
struct LockedInvoice {
    invoice_number: String,
    total_amount: Decimal,
}

pub struct PaymentService;

impl PaymentService {
    #[instrument(skip(db))]
    pub async fn record_payment(
        db: &PgPool,
        invoice_id: InvoiceId,
        dto: CreatePaymentDto,
    ) -> Result<PaymentReceipt, AppError> {
        let mut tx = db.begin().await?;

        // Row lock serialises concurrent payments against the same invoice.
        let invoice = sqlx::query_as::<_, LockedInvoice>(
            r#"SELECT i.invoice_number,
                      COALESCE((SELECT SUM(li.amount) FROM invoice_line_items li WHERE li.invoice_id = i.id), 0)
                          AS total_amount
               FROM invoices i
               WHERE i.id = $1
               FOR UPDATE"#,
        )
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Invoice not found")))?;

        let previous =
            sqlx::query_scalar::<_, Decimal>("SELECT amount FROM payments WHERE invoice_id = $1")
                .bind(invoice_id)
                .fetch_all(&mut *tx)
                .await?;

        let reconciliation = validate_payment(invoice.total_amount, previous, dto.amount)
            .map_err(AppError::unprocessable)?;

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"INSERT INTO payments
                   (invoice_id, amount, payment_date, payment_method, transaction_reference, notes)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {PAYMENT_COLUMNS}"#
        ))
        .bind(invoice_id)
        .bind(dto.amount)
        .bind(dto.payment_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(dto.payment_method.as_str())
        .bind(dto.transaction_reference.as_deref().map(str::trim))
        .bind(dto.notes.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        if reconciliation.is_paid {
            sqlx::query("UPDATE invoices SET is_paid = TRUE WHERE id = $1")
                .bind(invoice_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        track_payment_recorded(payment.payment_method.as_str(), reconciliation.is_paid);
        tracing::info!(
            payment_id = %payment.id,
            %invoice_id,
            amount = %payment.amount,
            balance = %reconciliation.balance,
            settled = reconciliation.is_paid,
            "Payment recorded"
        );

        Ok(PaymentReceipt {
            payment,
            invoice_number: invoice.invoice_number,
            reconciliation,
        })
    }

    pub(crate) async fn payments_for<'e, E>(
        db: E,
        invoice_id: InvoiceId,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments
             WHERE invoice_id = $1
             ORDER BY payment_date ASC, created_at ASC"
        ))
        .bind(invoice_id)
        .fetch_all(db)
        .await?;

        Ok(payments)
    }

    #[instrument(skip(db))]
    pub async fn list_payments(db: &PgPool, invoice_id: InvoiceId) -> Result<Vec<Payment>, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1)")
                .bind(invoice_id)
                .fetch_one(db)
                .await?;
        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Invoice not found")));
        }

        Self::payments_for(db, invoice_id).await
    }
}
