use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use schoolbook_core::AppError;
use schoolbook_models::ids::{FeeStructureId, TermId};

use crate::modules::fee_structures::model::{
    ClassFeeTotal, CreateFeeStructureDto, FeeStructure, FeeStructureDetail,
    FeeStructureFilterParams, FeeStructureItem, TermFeeSummary,
};
use crate::modules::terms::service::TermService;

const STRUCTURE_COLUMNS: &str = "id, name, class_id, term_id, is_active, created_at";

pub struct FeeStructureService;

impl FeeStructureService {
    /// Creates a structure and its items in one transaction.
    #[instrument(skip(db))]
    pub async fn create_fee_structure(
        db: &PgPool,
        dto: CreateFeeStructureDto,
    ) -> Result<FeeStructureDetail, AppError> {
        let class_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1)")
                .bind(dto.class_id)
                .fetch_one(db)
                .await?;
        if !class_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }
        TermService::get_term(db, dto.term_id).await?;

        let mut tx = db.begin().await?;

        let structure = sqlx::query_as::<_, FeeStructure>(&format!(
            "INSERT INTO fee_structures (name, class_id, term_id)
             VALUES ($1, $2, $3)
             RETURNING {STRUCTURE_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(dto.class_id)
        .bind(dto.term_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!(
                    "A fee structure already exists for this class and term"
                ));
            }
            AppError::from(e)
        })?;

        for item in &dto.items {
            sqlx::query(
                "INSERT INTO fee_structure_items (fee_structure_id, fee_item_id, amount)
                 VALUES ($1, $2, $3)",
            )
            .bind(structure.id)
            .bind(item.fee_item_id)
            .bind(item.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::not_found(anyhow::anyhow!(
                        "Fee item {} not found",
                        item.fee_item_id
                    ));
                }
                AppError::from(e)
            })?;
        }

        let items = Self::items(&mut *tx, structure.id).await?;
        tx.commit().await?;

        tracing::info!(
            fee_structure_id = %structure.id,
            items = items.len(),
            "Fee structure created"
        );

        Ok(FeeStructureDetail::new(structure, items))
    }

    pub(crate) async fn items<'e, E>(
        db: E,
        structure_id: FeeStructureId,
    ) -> Result<Vec<FeeStructureItem>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let items = sqlx::query_as::<_, FeeStructureItem>(
            r#"SELECT fsi.id, fsi.fee_item_id, fi.name AS fee_item_name,
                      fc.name AS category_name, fi.is_optional, fsi.amount
               FROM fee_structure_items fsi
               JOIN fee_items fi ON fi.id = fsi.fee_item_id
               JOIN fee_categories fc ON fc.id = fi.category_id
               WHERE fsi.fee_structure_id = $1
               ORDER BY fc.name ASC, fi.name ASC"#,
        )
        .bind(structure_id)
        .fetch_all(db)
        .await?;

        Ok(items)
    }

    #[instrument(skip(db))]
    pub async fn list_fee_structures(
        db: &PgPool,
        filters: FeeStructureFilterParams,
    ) -> Result<Vec<FeeStructure>, AppError> {
        let structures = sqlx::query_as::<_, FeeStructure>(&format!(
            "SELECT {STRUCTURE_COLUMNS} FROM fee_structures
             WHERE ($1::UUID IS NULL OR term_id = $1)
               AND ($2::UUID IS NULL OR class_id = $2)
             ORDER BY created_at DESC"
        ))
        .bind(filters.term_id)
        .bind(filters.class_id)
        .fetch_all(db)
        .await?;

        Ok(structures)
    }

    #[instrument(skip(db))]
    pub async fn get_fee_structure(
        db: &PgPool,
        id: FeeStructureId,
    ) -> Result<FeeStructureDetail, AppError> {
        let structure = sqlx::query_as::<_, FeeStructure>(&format!(
            "SELECT {STRUCTURE_COLUMNS} FROM fee_structures WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Fee structure not found")))?;

        let items = Self::items(db, id).await?;
        Ok(FeeStructureDetail::new(structure, items))
    }

    /// Total fees per class for a term.
    #[instrument(skip(db))]
    pub async fn term_summary(db: &PgPool, term_id: TermId) -> Result<TermFeeSummary, AppError> {
        TermService::get_term(db, term_id).await?;

        let classes = sqlx::query_as::<_, ClassFeeTotal>(
            r#"SELECT fs.id AS fee_structure_id, fs.name AS structure_name,
                      c.id AS class_id,
                      CASE WHEN c.arm IS NULL THEN c.name ELSE c.name || ' ' || c.arm END AS class_name,
                      COALESCE(SUM(fsi.amount), 0) AS total_amount,
                      fs.is_active
               FROM fee_structures fs
               JOIN classes c ON c.id = fs.class_id
               LEFT JOIN fee_structure_items fsi ON fsi.fee_structure_id = fs.id
               WHERE fs.term_id = $1
               GROUP BY fs.id, c.id
               ORDER BY c.level ASC, c.arm ASC NULLS FIRST"#,
        )
        .bind(term_id)
        .fetch_all(db)
        .await?;

        let grand_total: Decimal = classes
            .iter()
            .filter(|c| c.is_active)
            .map(|c| c.total_amount)
            .sum();

        Ok(TermFeeSummary {
            term_id,
            classes,
            grand_total,
        })
    }
}
