//! Exam types and the weight scheme they form.

use crate::ids::ExamTypeId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// An assessment kind (CA, Exam, ...) with its share of the final score.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamType {
    pub id: ExamTypeId,
    pub name: String,
    /// Percentage contribution to the subject's final score (0-100)
    pub weight: i16,
    /// Highest raw score a result of this type may carry
    pub max_score: Decimal,
    pub is_final: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_max_score(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO || *value > Decimal::from(999) {
        return Err(ValidationError::new("max_score")
            .with_message("max_score must be greater than 0 and at most 999".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateExamTypeDto {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(range(min = 0, max = 100, message = "weight must be between 0 and 100"))]
    pub weight: i16,
    #[validate(custom(function = "validate_max_score"))]
    #[schema(value_type = String, example = "60.00")]
    pub max_score: Decimal,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateExamTypeDto {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 100, message = "weight must be between 0 and 100"))]
    pub weight: Option<i16>,
    #[validate(custom(function = "validate_max_score"))]
    #[schema(value_type = Option<String>)]
    pub max_score: Option<Decimal>,
    pub is_final: Option<bool>,
}

/// Whether the configured exam types form a complete scheme.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeightSchemeStatus {
    pub total_weight: u32,
    /// `true` when the weights total exactly 100
    pub is_valid: bool,
    pub exam_types: Vec<ExamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
