use sqlx::PgPool;
use tracing::instrument;

use schoolbook_core::AppError;
use schoolbook_core::grading::{check_weight_capacity, validate_weight_scheme};
use schoolbook_models::ids::ExamTypeId;

use crate::modules::exam_types::model::{
    CreateExamTypeDto, ExamType, UpdateExamTypeDto, WeightSchemeStatus,
};

const EXAM_TYPE_COLUMNS: &str =
    "id, name, weight, max_score, is_final, created_at, updated_at";

fn map_unique_name(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::conflict(anyhow::anyhow!(
            "An exam type with this name already exists"
        ));
    }
    AppError::from(e)
}

fn as_weight(value: i16) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

pub struct ExamTypeService;

impl ExamTypeService {
    #[instrument(skip(db))]
    pub async fn list_exam_types(db: &PgPool) -> Result<Vec<ExamType>, AppError> {
        let exam_types = sqlx::query_as::<_, ExamType>(&format!(
            "SELECT {EXAM_TYPE_COLUMNS} FROM exam_types ORDER BY weight ASC, name ASC"
        ))
        .fetch_all(db)
        .await?;

        Ok(exam_types)
    }

    /// Sum of all weights except `exclude`.
    async fn weight_total(db: &PgPool, exclude: Option<ExamTypeId>) -> Result<u32, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(weight), 0)::BIGINT FROM exam_types WHERE $1::UUID IS NULL OR id <> $1",
        )
        .bind(exclude)
        .fetch_one(db)
        .await?;

        Ok(u32::try_from(total).unwrap_or(u32::MAX))
    }

    #[instrument(skip(db))]
    pub async fn create_exam_type(
        db: &PgPool,
        dto: CreateExamTypeDto,
    ) -> Result<ExamType, AppError> {
        let existing = Self::weight_total(db, None).await?;
        check_weight_capacity([existing, as_weight(dto.weight)])
            .map_err(AppError::unprocessable)?;

        let exam_type = sqlx::query_as::<_, ExamType>(&format!(
            "INSERT INTO exam_types (name, weight, max_score, is_final)
             VALUES ($1, $2, $3, $4)
             RETURNING {EXAM_TYPE_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(dto.weight)
        .bind(dto.max_score)
        .bind(dto.is_final)
        .fetch_one(db)
        .await
        .map_err(map_unique_name)?;

        Ok(exam_type)
    }

    #[instrument(skip(db))]
    pub async fn update_exam_type(
        db: &PgPool,
        id: ExamTypeId,
        dto: UpdateExamTypeDto,
    ) -> Result<ExamType, AppError> {
        let current = sqlx::query_as::<_, ExamType>(&format!(
            "SELECT {EXAM_TYPE_COLUMNS} FROM exam_types WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam type not found")))?;

        if let Some(weight) = dto.weight {
            let others = Self::weight_total(db, Some(id)).await?;
            check_weight_capacity([others, as_weight(weight)]).map_err(AppError::unprocessable)?;
        }

        if let Some(max_score) = dto.max_score
            && max_score < current.max_score
        {
            let highest = sqlx::query_scalar::<_, Option<rust_decimal::Decimal>>(
                "SELECT MAX(score) FROM results WHERE exam_type_id = $1",
            )
            .bind(id)
            .fetch_one(db)
            .await?;

            if let Some(highest) = highest
                && highest > max_score
            {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "max_score cannot be lowered below an already recorded score of {highest}"
                )));
            }
        }

        let exam_type = sqlx::query_as::<_, ExamType>(&format!(
            "UPDATE exam_types
             SET name = COALESCE($2, name),
                 weight = COALESCE($3, weight),
                 max_score = COALESCE($4, max_score),
                 is_final = COALESCE($5, is_final),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {EXAM_TYPE_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.weight)
        .bind(dto.max_score)
        .bind(dto.is_final)
        .fetch_one(db)
        .await
        .map_err(map_unique_name)?;

        Ok(exam_type)
    }

    /// Deletes an exam type that has no recorded results.
    #[instrument(skip(db))]
    pub async fn delete_exam_type(db: &PgPool, id: ExamTypeId) -> Result<(), AppError> {
        let in_use = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM results WHERE exam_type_id = $1)",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        if in_use {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Exam type has recorded results and cannot be deleted"
            )));
        }

        let deleted = sqlx::query("DELETE FROM exam_types WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Exam type not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn weight_scheme_status(db: &PgPool) -> Result<WeightSchemeStatus, AppError> {
        let exam_types = Self::list_exam_types(db).await?;
        let weights: Vec<u32> = exam_types.iter().map(|e| as_weight(e.weight)).collect();
        let total_weight = weights.iter().sum();

        let (is_valid, message) = match validate_weight_scheme(weights) {
            Ok(_) => (true, None),
            Err(e) => (false, Some(e.to_string())),
        };

        Ok(WeightSchemeStatus {
            total_weight,
            is_valid,
            exam_types,
            message,
        })
    }
}
