//! Stored exam results and grade previews.

use crate::ids::{ExamTypeId, ResultId, StudentId, SubjectId, TermId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schoolbook_core::grading::{Component, GradeBreakdown, LetterGrade, Weighted};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// A result joined with its subject and exam type, the shape every grading
/// query returns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScoredResult {
    pub id: ResultId,
    pub student_id: StudentId,
    pub term_id: TermId,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub subject_code: String,
    pub exam_type_id: ExamTypeId,
    pub exam_type_name: String,
    pub score: Decimal,
    pub max_score: Decimal,
    pub weight: i16,
    pub updated_at: DateTime<Utc>,
}

fn to_f64(value: Decimal) -> f64 {
    f64::try_from(value).unwrap_or(0.0)
}

impl Weighted for ScoredResult {
    fn score(&self) -> f64 {
        to_f64(self.score)
    }

    fn max_score(&self) -> f64 {
        to_f64(self.max_score)
    }

    fn weight(&self) -> f64 {
        f64::from(self.weight)
    }
}

fn validate_score_value(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("score").with_message("score cannot be negative".into()));
    }
    if value.scale() > 2 {
        return Err(ValidationError::new("score")
            .with_message("score cannot have more than 2 decimal places".into()));
    }
    Ok(())
}

/// Creates or replaces the score for one (student, term, subject, exam type).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertResultDto {
    pub student_id: StudentId,
    pub term_id: TermId,
    pub subject_id: SubjectId,
    pub exam_type_id: ExamTypeId,
    #[validate(custom(function = "validate_score_value"))]
    #[schema(value_type = String, example = "32.50")]
    pub score: Decimal,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ResultFilterParams {
    /// Defaults to the current term
    #[serde(default, deserialize_with = "schoolbook_core::serde::empty_string_as_none")]
    pub term_id: Option<TermId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GradeComponentInput {
    #[validate(range(min = 0.0, message = "score cannot be negative"))]
    pub score: f64,
    #[validate(range(exclusive_min = 0.0, message = "max_score must be greater than 0"))]
    pub max_score: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "weight must be between 0 and 100"))]
    pub weight: f64,
}

impl From<&GradeComponentInput> for Component {
    fn from(input: &GradeComponentInput) -> Self {
        Component::new(input.score, input.max_score, input.weight)
    }
}

/// Ad-hoc scores to run through the grade engine without storing anything.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradePreviewRequest {
    #[validate(length(min = 1, message = "at least one component is required"), nested)]
    pub components: Vec<GradeComponentInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GradePreviewResponse {
    pub final_score: f64,
    pub grade: LetterGrade,
    pub remark: String,
    pub total_weight: f64,
    pub is_complete: bool,
    pub contributions: Vec<f64>,
}

impl From<GradeBreakdown> for GradePreviewResponse {
    fn from(b: GradeBreakdown) -> Self {
        Self {
            final_score: b.final_score,
            grade: b.grade,
            remark: b.remark().to_string(),
            total_weight: b.total_weight,
            is_complete: b.is_complete(),
            contributions: b.contributions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scored(score: Decimal, max_score: Decimal, weight: i16) -> ScoredResult {
        ScoredResult {
            id: ResultId::new(),
            student_id: StudentId::new(),
            term_id: TermId::new(),
            subject_id: SubjectId::new(),
            subject_name: "Mathematics".into(),
            subject_code: "MTH".into(),
            exam_type_id: ExamTypeId::new(),
            exam_type_name: "CA".into(),
            score,
            max_score,
            weight,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stored_results_feed_the_engine() {
        let rows = vec![
            scored(dec!(32), dec!(40), 40),
            scored(dec!(50), dec!(60), 60),
        ];
        let breakdown = GradeBreakdown::from_components(&rows);
        assert!((breakdown.final_score - 82.0).abs() < 1e-9);
        assert_eq!(breakdown.grade, LetterGrade::A);
        assert!(breakdown.is_complete());
    }

    #[test]
    fn test_upsert_dto_rejects_negative_and_fine_grained_scores() {
        let dto = UpsertResultDto {
            student_id: StudentId::new(),
            term_id: TermId::new(),
            subject_id: SubjectId::new(),
            exam_type_id: ExamTypeId::new(),
            score: dec!(35.5),
        };
        assert!(dto.validate().is_ok());
        assert!(UpsertResultDto { score: dec!(-1), ..dto.clone() }.validate().is_err());
        assert!(UpsertResultDto { score: dec!(1.005), ..dto }.validate().is_err());
    }

    #[test]
    fn test_preview_request_validation() {
        let empty = GradePreviewRequest { components: vec![] };
        assert!(empty.validate().is_err());

        let bad_max: GradePreviewRequest = serde_json::from_str(
            r#"{"components":[{"score":10,"max_score":0,"weight":40}]}"#,
        )
        .unwrap();
        assert!(bad_max.validate().is_err());

        let ok: GradePreviewRequest = serde_json::from_str(
            r#"{"components":[{"score":32,"max_score":40,"weight":40}]}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());
    }
}
