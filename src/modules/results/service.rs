use sqlx::PgPool;
use tracing::instrument;

use schoolbook_core::AppError;
use schoolbook_core::grading::{GradeBreakdown, validate_score};
use schoolbook_models::exam_types::ExamType;
use schoolbook_models::ids::{ResultId, StudentId, TermId};
use schoolbook_observability::track_result_recorded;

use crate::modules::results::model::{
    GradePreviewRequest, GradePreviewResponse, ScoredResult, UpsertResultDto,
};
use crate::modules::terms::service::TermService;

/// Result rows joined with everything grading needs. Callers append a
/// `WHERE` clause and ordering.
pub(crate) const SCORED_RESULT_SELECT: &str = r#"
    SELECT r.id, r.student_id, r.term_id, r.subject_id,
           sub.name AS subject_name, sub.code AS subject_code,
           r.exam_type_id, et.name AS exam_type_name,
           r.score, et.max_score, et.weight, r.updated_at
    FROM results r
    JOIN subjects sub ON sub.id = r.subject_id
    JOIN exam_types et ON et.id = r.exam_type_id
"#;

#[derive(sqlx::FromRow)]
struct UpsertOutcome {
    id: ResultId,
    inserted: bool,
}

pub struct ResultService;

impl ResultService {
    /// Stores a score, replacing any earlier score for the same tuple.
    ///
    /// Returns the stored row and whether it was newly created.
    #[instrument(skip(db))]
    pub async fn upsert_result(
        db: &PgPool,
        dto: UpsertResultDto,
    ) -> Result<(ScoredResult, bool), AppError> {
        let exam_type = sqlx::query_as::<_, ExamType>(
            "SELECT id, name, weight, max_score, is_final, created_at, updated_at
             FROM exam_types WHERE id = $1",
        )
        .bind(dto.exam_type_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam type not found")))?;

        let score = f64::try_from(dto.score).unwrap_or(f64::NAN);
        let max_score = f64::try_from(exam_type.max_score).unwrap_or(0.0);
        validate_score(score, max_score).map_err(AppError::unprocessable)?;

        Self::ensure_exists(db, "students", dto.student_id.into_inner(), "Student not found")
            .await?;
        Self::ensure_exists(db, "subjects", dto.subject_id.into_inner(), "Subject not found")
            .await?;
        TermService::get_term(db, dto.term_id).await?;

        let outcome = sqlx::query_as::<_, UpsertOutcome>(
            r#"INSERT INTO results (student_id, term_id, subject_id, exam_type_id, score)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT ON CONSTRAINT unique_result_per_exam
               DO UPDATE SET score = EXCLUDED.score, updated_at = NOW()
               RETURNING id, (xmax = 0) AS inserted"#,
        )
        .bind(dto.student_id)
        .bind(dto.term_id)
        .bind(dto.subject_id)
        .bind(dto.exam_type_id)
        .bind(dto.score)
        .fetch_one(db)
        .await?;

        let stored = sqlx::query_as::<_, ScoredResult>(&format!(
            "{SCORED_RESULT_SELECT} WHERE r.id = $1"
        ))
        .bind(outcome.id)
        .fetch_one(db)
        .await?;

        track_result_recorded(outcome.inserted);
        tracing::info!(
            result_id = %outcome.id,
            created = outcome.inserted,
            "Result recorded"
        );

        Ok((stored, outcome.inserted))
    }

    async fn ensure_exists(
        db: &PgPool,
        table: &'static str,
        id: uuid::Uuid,
        message: &'static str,
    ) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"
        ))
        .bind(id)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!(message)));
        }
        Ok(())
    }

    /// All scores a student has for a term, ordered by subject then exam type.
    #[instrument(skip(db))]
    pub async fn get_student_results(
        db: &PgPool,
        student_id: StudentId,
        term_id: TermId,
    ) -> Result<Vec<ScoredResult>, AppError> {
        let results = sqlx::query_as::<_, ScoredResult>(&format!(
            "{SCORED_RESULT_SELECT}
             WHERE r.student_id = $1 AND r.term_id = $2
             ORDER BY sub.name ASC, et.weight ASC, et.name ASC"
        ))
        .bind(student_id)
        .bind(term_id)
        .fetch_all(db)
        .await?;

        Ok(results)
    }

    /// Resolves the term (current when absent) before listing.
    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: StudentId,
        term_id: Option<TermId>,
    ) -> Result<Vec<ScoredResult>, AppError> {
        Self::ensure_exists(db, "students", student_id.into_inner(), "Student not found").await?;
        let term = TermService::resolve_term(db, term_id).await?;
        Self::get_student_results(db, student_id, term.id).await
    }

    pub fn preview(request: &GradePreviewRequest) -> GradePreviewResponse {
        let components: Vec<schoolbook_core::grading::Component> =
            request.components.iter().map(Into::into).collect();
        GradeBreakdown::from_components(&components).into()
    }
}
