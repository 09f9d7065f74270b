use chrono::{Duration, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use tracing::instrument;

use schoolbook_config::FinanceConfig;
use schoolbook_core::ledger::{format_invoice_number, is_overdue};
use schoolbook_core::{AppError, PaginationMeta};
use schoolbook_models::ids::{FeeStructureId, InvoiceId, StudentId, TermId};
use schoolbook_observability::track_invoices_generated;

use crate::modules::invoices::model::{
    BulkInvoiceResult, CreateInvoiceDto, Invoice, InvoiceDetail, InvoiceFilterParams,
    InvoiceLineItem, PaginatedInvoicesResponse,
};
use crate::modules::payments::service::PaymentService;
use crate::modules::terms::service::TermService;

pub(crate) const INVOICE_SELECT: &str = r#"
    SELECT i.id, i.invoice_number, i.student_id,
           s.first_name || ' ' || s.last_name AS student_name,
           i.fee_structure_id, fs.term_id, i.issue_date, i.due_date, i.notes, i.is_paid,
           COALESCE((SELECT SUM(li.amount) FROM invoice_line_items li WHERE li.invoice_id = i.id), 0)
               AS total_amount,
           COALESCE((SELECT SUM(p.amount) FROM payments p WHERE p.invoice_id = i.id), 0)
               AS paid_amount,
           i.created_at
    FROM invoices i
    JOIN students s ON s.id = i.student_id
    JOIN fee_structures fs ON fs.id = i.fee_structure_id
"#;

const INVOICE_FILTERS: &str = r#"
    WHERE ($1::UUID IS NULL OR i.student_id = $1)
      AND ($2::BOOLEAN IS NULL OR i.is_paid = $2)
      AND ($3::UUID IS NULL OR fs.term_id = $3)
"#;

#[derive(FromRow)]
struct StructureState {
    id: FeeStructureId,
    is_active: bool,
}

#[derive(FromRow)]
struct BillingCandidate {
    student_id: StudentId,
    fee_structure_id: Option<FeeStructureId>,
    has_invoice: bool,
}

struct NewInvoice<'a> {
    student_id: StudentId,
    fee_structure_id: FeeStructureId,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    notes: Option<&'a str>,
}

pub struct InvoiceService;

impl InvoiceService {
    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Inserts the invoice and copies the structure's items as line items.
    async fn insert_invoice(
        conn: &mut PgConnection,
        prefix: &str,
        invoice: NewInvoice<'_>,
    ) -> Result<InvoiceId, sqlx::Error> {
        let sequence = sqlx::query_scalar::<_, i64>("SELECT nextval('invoice_number_seq')")
            .fetch_one(&mut *conn)
            .await?;
        let invoice_number = format_invoice_number(prefix, sequence);

        let invoice_id = sqlx::query_scalar::<_, InvoiceId>(
            r#"INSERT INTO invoices (student_id, fee_structure_id, invoice_number, issue_date, due_date, notes)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(invoice.student_id)
        .bind(invoice.fee_structure_id)
        .bind(&invoice_number)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.notes)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            r#"INSERT INTO invoice_line_items (invoice_id, fee_item_id, amount)
               SELECT $1, fee_item_id, amount
               FROM fee_structure_items
               WHERE fee_structure_id = $2"#,
        )
        .bind(invoice_id)
        .bind(invoice.fee_structure_id)
        .execute(&mut *conn)
        .await?;

        // A zero-total invoice is settled from the start.
        sqlx::query(
            r#"UPDATE invoices
               SET is_paid = COALESCE(
                   (SELECT SUM(amount) FROM invoice_line_items WHERE invoice_id = $1), 0
               ) <= 0
               WHERE id = $1"#,
        )
        .bind(invoice_id)
        .execute(&mut *conn)
        .await?;

        tracing::debug!(%invoice_id, %invoice_number, "Invoice inserted");
        Ok(invoice_id)
    }

    #[instrument(skip(db, finance))]
    pub async fn create_invoice(
        db: &PgPool,
        finance: &FinanceConfig,
        dto: CreateInvoiceDto,
    ) -> Result<Invoice, AppError> {
        let issue_date = Self::today();
        let due_date = dto
            .due_date
            .unwrap_or(issue_date + Duration::days(finance.invoice_due_days));
        if due_date < issue_date {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Due date cannot be before the issue date"
            )));
        }

        let mut tx = db.begin().await?;

        let structure = sqlx::query_as::<_, StructureState>(
            "SELECT id, is_active FROM fee_structures WHERE id = $1",
        )
        .bind(dto.fee_structure_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Fee structure not found")))?;

        if !structure.is_active {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Fee structure is not active"
            )));
        }

        let student_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(dto.student_id)
                .fetch_one(&mut *tx)
                .await?;
        if !student_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        let invoice_id = Self::insert_invoice(
            &mut tx,
            &finance.invoice_prefix,
            NewInvoice {
                student_id: dto.student_id,
                fee_structure_id: structure.id,
                issue_date,
                due_date,
                notes: dto.notes.as_deref(),
            },
        )
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!(
                    "Student already has an invoice for this fee structure"
                ));
            }
            AppError::from(e)
        })?;

        let invoice = Self::find_invoice(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("Invoice vanished after insert")))?;
        tx.commit().await?;

        track_invoices_generated("single", 1);
        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = %invoice.total_amount,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Issues an invoice to every active student whose class has an active
    /// structure for the term. Students already invoiced are skipped.
    #[instrument(skip(db, finance))]
    pub async fn generate_term_invoices(
        db: &PgPool,
        finance: &FinanceConfig,
        term_id: TermId,
    ) -> Result<BulkInvoiceResult, AppError> {
        TermService::get_term(db, term_id).await?;

        let issue_date = Self::today();
        let due_date = issue_date + Duration::days(finance.invoice_due_days);

        let mut tx = db.begin().await?;

        let candidates = sqlx::query_as::<_, BillingCandidate>(
            r#"SELECT s.id AS student_id, fs.id AS fee_structure_id,
                      EXISTS(
                          SELECT 1 FROM invoices i
                          WHERE i.student_id = s.id AND i.fee_structure_id = fs.id
                      ) AS has_invoice
               FROM students s
               LEFT JOIN fee_structures fs
                      ON fs.class_id = s.current_class_id
                     AND fs.term_id = $1
                     AND fs.is_active
               WHERE s.is_active AND s.current_class_id IS NOT NULL
               ORDER BY s.student_number ASC"#,
        )
        .bind(term_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut result = BulkInvoiceResult::default();
        for candidate in candidates {
            let Some(fee_structure_id) = candidate.fee_structure_id else {
                result.without_structure += 1;
                continue;
            };
            if candidate.has_invoice {
                result.skipped += 1;
                continue;
            }

            Self::insert_invoice(
                &mut tx,
                &finance.invoice_prefix,
                NewInvoice {
                    student_id: candidate.student_id,
                    fee_structure_id,
                    issue_date,
                    due_date,
                    notes: None,
                },
            )
            .await?;
            result.created += 1;
        }

        tx.commit().await?;

        track_invoices_generated("bulk", result.created);
        tracing::info!(
            %term_id,
            created = result.created,
            skipped = result.skipped,
            without_structure = result.without_structure,
            "Term invoices generated"
        );

        Ok(result)
    }

    pub(crate) async fn find_invoice<'e, E>(
        db: E,
        invoice_id: InvoiceId,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!("{INVOICE_SELECT} WHERE i.id = $1"))
            .bind(invoice_id)
            .fetch_optional(db)
            .await?;

        Ok(invoice)
    }

    #[instrument(skip(db))]
    pub async fn get_invoice(db: &PgPool, invoice_id: InvoiceId) -> Result<InvoiceDetail, AppError> {
        let invoice = Self::find_invoice(db, invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Invoice not found")))?;

        let line_items = sqlx::query_as::<_, InvoiceLineItem>(
            r#"SELECT li.id, li.fee_item_id, fi.name AS fee_item_name, li.amount
               FROM invoice_line_items li
               JOIN fee_items fi ON fi.id = li.fee_item_id
               WHERE li.invoice_id = $1
               ORDER BY fi.name ASC"#,
        )
        .bind(invoice_id)
        .fetch_all(db)
        .await?;

        let payments = PaymentService::payments_for(db, invoice_id).await?;
        let reconciliation = invoice.reconciliation();
        let is_overdue = is_overdue(invoice.due_date, Self::today(), reconciliation.is_paid);

        Ok(InvoiceDetail {
            invoice,
            line_items,
            payments,
            reconciliation,
            is_overdue,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_invoices(
        db: &PgPool,
        filters: InvoiceFilterParams,
    ) -> Result<PaginatedInvoicesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let is_paid = filters.status.map(|s| s.is_paid());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*)
               FROM invoices i
               JOIN fee_structures fs ON fs.id = i.fee_structure_id
               {INVOICE_FILTERS}"#
        ))
        .bind(filters.student_id)
        .bind(is_paid)
        .bind(filters.term_id)
        .fetch_one(db)
        .await?;

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "{INVOICE_SELECT} {INVOICE_FILTERS}
             ORDER BY i.issue_date DESC, LENGTH(i.invoice_number) DESC, i.invoice_number DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(filters.student_id)
        .bind(is_paid)
        .bind(filters.term_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedInvoicesResponse {
            data: invoices,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }
}
