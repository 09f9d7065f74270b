//! Weighted grade computation.
//!
//! A subject's final score is the sum of each assessment's contribution,
//! `(score / max_score) * weight`. With a weight scheme that totals 100 the
//! result is a percentage in `[0, 100]`, which then maps to a letter grade
//! through fixed, inclusive lower bounds:
//!
//! | Score | Grade | Remark |
//! |-------|-------|--------|
//! | >= 90 | A+ | Excellent |
//! | >= 80 | A | Very Good |
//! | >= 70 | B | Good |
//! | >= 60 | C | Satisfactory |
//! | >= 50 | D | Needs Improvement |
//! | < 50  | F | Poor |
//!
//! The engine only sums what it is given. Whether a subject has every exam
//! type recorded is a caller concern; [`GradeBreakdown::is_complete`] exposes
//! the declared weight so callers can decide.
//!
//! ```
//! use schoolbook_core::grading::{Component, LetterGrade, compute_final_grade};
//!
//! let results = [
//!     Component::new(32.0, 40.0, 40.0), // CA
//!     Component::new(50.0, 60.0, 60.0), // Exam
//! ];
//! let (score, grade) = compute_final_grade(&results);
//! assert!((score - 82.0).abs() < 1e-9);
//! assert_eq!(grade, LetterGrade::A);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Weight total a complete scheme must reach.
pub const FULL_WEIGHT: u32 = 100;

const EPSILON: f64 = 1e-9;

/// A single weighted assessment score.
pub trait Weighted {
    /// Raw score obtained.
    fn score(&self) -> f64;
    /// Maximum raw score for the assessment.
    fn max_score(&self) -> f64;
    /// Percentage weight of the assessment in the subject total.
    fn weight(&self) -> f64;

    /// Points this assessment adds to the final percentage.
    fn contribution(&self) -> f64 {
        let max = self.max_score();
        if max <= 0.0 {
            return 0.0;
        }
        (self.score() / max) * self.weight()
    }
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn score(&self) -> f64 {
        (**self).score()
    }

    fn max_score(&self) -> f64 {
        (**self).max_score()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

/// Plain weighted score, for previews and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Component {
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
}

impl Component {
    pub const fn new(score: f64, max_score: f64, weight: f64) -> Self {
        Self {
            score,
            max_score,
            weight,
        }
    }
}

impl Weighted for Component {
    fn score(&self) -> f64 {
        self.score
    }

    fn max_score(&self) -> f64 {
        self.max_score
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Letter grade on the fixed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Maps a percentage to its grade. Non-finite scores grade as F.
    pub fn from_score(score: f64) -> Self {
        if !score.is_finite() {
            return Self::F;
        }
        match score {
            s if s >= 90.0 => Self::APlus,
            s if s >= 80.0 => Self::A,
            s if s >= 70.0 => Self::B,
            s if s >= 60.0 => Self::C,
            s if s >= 50.0 => Self::D,
            _ => Self::F,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub const fn remark(&self) -> &'static str {
        match self {
            Self::APlus => "Excellent",
            Self::A => "Very Good",
            Self::B => "Good",
            Self::C => "Satisfactory",
            Self::D => "Needs Improvement",
            Self::F => "Poor",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remark text for a percentage score.
pub fn remark_for(score: f64) -> &'static str {
    LetterGrade::from_score(score).remark()
}

/// Result of running the engine over one subject's assessments.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GradeBreakdown {
    pub final_score: f64,
    pub grade: LetterGrade,
    /// Sum of the weights of the assessments that were graded.
    pub total_weight: f64,
    /// Points each assessment added, in input order.
    pub contributions: Vec<f64>,
}

impl GradeBreakdown {
    pub fn from_components<I>(results: I) -> Self
    where
        I: IntoIterator,
        I::Item: Weighted,
    {
        let mut weighted_total = 0.0;
        let mut total_weight = 0.0;
        let mut contributions = Vec::new();

        for result in results {
            let contribution = result.contribution();
            weighted_total += contribution;
            total_weight += result.weight();
            contributions.push(contribution);
        }

        let final_score = if total_weight > 0.0 && weighted_total.is_finite() {
            weighted_total
        } else {
            0.0
        };

        Self {
            final_score,
            grade: LetterGrade::from_score(final_score),
            total_weight,
            contributions,
        }
    }

    /// Whether the graded assessments cover the full weight scheme.
    pub fn is_complete(&self) -> bool {
        self.total_weight + EPSILON >= f64::from(FULL_WEIGHT)
    }

    pub fn remark(&self) -> &'static str {
        self.grade.remark()
    }
}

/// Final percentage and letter grade for one subject's assessments.
///
/// A total declared weight of zero yields `(0.0, LetterGrade::F)`.
pub fn compute_final_grade<I>(results: I) -> (f64, LetterGrade)
where
    I: IntoIterator,
    I::Item: Weighted,
{
    let breakdown = GradeBreakdown::from_components(results);
    (breakdown.final_score, breakdown.grade)
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Standard competition rank ("1224") of `score` among `scores`.
pub fn competition_rank(score: f64, scores: &[f64]) -> usize {
    1 + scores.iter().filter(|&&other| other > score + EPSILON).count()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradingError {
    #[error("Score must be a finite number")]
    NonFiniteScore,
    #[error("Score cannot be negative")]
    NegativeScore,
    #[error("Score {score} exceeds the maximum of {max_score} for this exam type")]
    ScoreExceedsMax { score: f64, max_score: f64 },
    #[error("Maximum score must be greater than zero")]
    InvalidMaxScore,
    #[error("Exam type weights must total {FULL_WEIGHT}, found {total}")]
    WeightTotalMismatch { total: u32 },
    #[error("Exam type weights cannot exceed {FULL_WEIGHT} in total, would be {total}")]
    WeightTotalExceeded { total: u32 },
}

/// Checks `0 <= score <= max_score` before a result is stored.
pub fn validate_score(score: f64, max_score: f64) -> Result<(), GradingError> {
    if !score.is_finite() {
        return Err(GradingError::NonFiniteScore);
    }
    if !(max_score.is_finite() && max_score > 0.0) {
        return Err(GradingError::InvalidMaxScore);
    }
    if score < 0.0 {
        return Err(GradingError::NegativeScore);
    }
    if score > max_score {
        return Err(GradingError::ScoreExceedsMax { score, max_score });
    }
    Ok(())
}

/// Requires a complete scheme: the weights must total exactly 100.
pub fn validate_weight_scheme<I>(weights: I) -> Result<u32, GradingError>
where
    I: IntoIterator<Item = u32>,
{
    let total: u32 = weights.into_iter().sum();
    if total != FULL_WEIGHT {
        return Err(GradingError::WeightTotalMismatch { total });
    }
    Ok(total)
}

/// Allows a scheme to be built up one exam type at a time without overshooting 100.
pub fn check_weight_capacity<I>(weights: I) -> Result<u32, GradingError>
where
    I: IntoIterator<Item = u32>,
{
    let total: u32 = weights.into_iter().sum();
    if total > FULL_WEIGHT {
        return Err(GradingError::WeightTotalExceeded { total });
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ca_and_exam_combine_to_82() {
        let results = [Component::new(32.0, 40.0, 40.0), Component::new(50.0, 60.0, 60.0)];
        let (score, grade) = compute_final_grade(&results);
        assert!(approx(score, 82.0));
        assert_eq!(grade, LetterGrade::A);
    }

    #[test]
    fn test_zero_weight_is_zero_f() {
        let results = [Component::new(30.0, 40.0, 0.0), Component::new(10.0, 60.0, 0.0)];
        assert_eq!(compute_final_grade(&results), (0.0, LetterGrade::F));
    }

    #[test]
    fn test_no_results_is_zero_f() {
        let results: Vec<Component> = Vec::new();
        assert_eq!(compute_final_grade(&results), (0.0, LetterGrade::F));
    }

    #[test]
    fn test_threshold_boundaries_round_up() {
        assert_eq!(LetterGrade::from_score(90.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(89.999), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(80.0), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(70.0), LetterGrade::B);
        assert_eq!(LetterGrade::from_score(60.0), LetterGrade::C);
        assert_eq!(LetterGrade::from_score(50.0), LetterGrade::D);
        assert_eq!(LetterGrade::from_score(49.99), LetterGrade::F);
        assert_eq!(LetterGrade::from_score(f64::NAN), LetterGrade::F);
    }

    #[test]
    fn test_partial_term_sums_what_is_given() {
        let results = [Component::new(32.0, 40.0, 40.0)];
        let breakdown = GradeBreakdown::from_components(&results);
        assert!(approx(breakdown.final_score, 32.0));
        assert_eq!(breakdown.grade, LetterGrade::F);
        assert!(!breakdown.is_complete());
        assert_eq!(breakdown.contributions.len(), 1);
    }

    #[test]
    fn test_zero_max_score_contributes_nothing() {
        let results = [Component::new(10.0, 0.0, 40.0), Component::new(60.0, 60.0, 60.0)];
        let breakdown = GradeBreakdown::from_components(&results);
        assert!(approx(breakdown.final_score, 60.0));
        assert!(breakdown.is_complete());
    }

    #[test]
    fn test_remarks_follow_grades() {
        assert_eq!(remark_for(95.0), "Excellent");
        assert_eq!(remark_for(85.0), "Very Good");
        assert_eq!(remark_for(72.5), "Good");
        assert_eq!(remark_for(61.0), "Satisfactory");
        assert_eq!(remark_for(50.0), "Needs Improvement");
        assert_eq!(remark_for(12.0), "Poor");
    }

    #[test]
    fn test_grade_serializes_with_plus_sign() {
        assert_eq!(serde_json::to_string(&LetterGrade::APlus).unwrap(), r#""A+""#);
        assert_eq!(LetterGrade::APlus.to_string(), "A+");
        let parsed: LetterGrade = serde_json::from_str(r#""B""#).unwrap();
        assert_eq!(parsed, LetterGrade::B);
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score(40.0, 40.0).is_ok());
        assert!(validate_score(0.0, 40.0).is_ok());
        assert_eq!(validate_score(-1.0, 40.0), Err(GradingError::NegativeScore));
        assert_eq!(
            validate_score(41.0, 40.0),
            Err(GradingError::ScoreExceedsMax {
                score: 41.0,
                max_score: 40.0
            })
        );
        assert_eq!(validate_score(f64::INFINITY, 40.0), Err(GradingError::NonFiniteScore));
        assert_eq!(validate_score(1.0, 0.0), Err(GradingError::InvalidMaxScore));
    }

    #[test]
    fn test_weight_scheme_validation() {
        assert_eq!(validate_weight_scheme([40, 60]), Ok(100));
        assert_eq!(
            validate_weight_scheme([40, 50]),
            Err(GradingError::WeightTotalMismatch { total: 90 })
        );
        assert_eq!(check_weight_capacity([40, 50]), Ok(90));
        assert_eq!(
            check_weight_capacity([40, 70]),
            Err(GradingError::WeightTotalExceeded { total: 110 })
        );
    }

    #[test]
    fn test_mean_and_rank() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert!(approx(mean([80.0, 60.0, 70.0]).unwrap(), 70.0));

        let class = [82.0, 91.0, 82.0, 40.0];
        assert_eq!(competition_rank(91.0, &class), 1);
        assert_eq!(competition_rank(82.0, &class), 2);
        assert_eq!(competition_rank(40.0, &class), 4);
    }
}
