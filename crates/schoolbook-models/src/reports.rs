//! Term reports: the structure handed to the PDF renderer, comments and the
//! student performance dashboard.

use crate::ids::{ReportCommentId, StudentId, SubjectId, TermId, TermReportId};
use chrono::{DateTime, NaiveDate, Utc};
use schoolbook_core::grading::LetterGrade;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TermReport {
    pub id: TermReportId,
    pub student_id: StudentId,
    pub term_id: TermId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    Teacher,
    Principal,
}

impl CommentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Principal => "principal",
        }
    }
}

impl fmt::Display for CommentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(Self::Teacher),
            "principal" => Ok(Self::Principal),
            other => Err(format!("unknown comment type: {other}")),
        }
    }
}

impl TryFrom<String> for CommentType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReportComment {
    pub id: ReportCommentId,
    pub report_id: TermReportId,
    #[sqlx(try_from = "String")]
    pub comment_type: CommentType,
    pub comment: String,
    pub added_on: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertCommentDto {
    /// Defaults to the current term
    pub term_id: Option<TermId>,
    pub comment_type: CommentType,
    #[validate(length(min = 1, max = 2000, message = "comment must be 1-2000 characters"))]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ReportQueryParams {
    /// Defaults to the current term
    #[serde(default, deserialize_with = "schoolbook_core::serde::empty_string_as_none")]
    pub term_id: Option<TermId>,
}

/// Points one exam type added to a subject total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComponentScore {
    pub exam_type: String,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// One subject line of a term report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubjectGrade {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub subject_code: String,
    /// Raw score of the `CA` exam type, if recorded
    pub ca_score: Option<f64>,
    /// Raw score of the `Exam` exam type, if recorded
    pub exam_score: Option<f64>,
    pub total_score: f64,
    pub grade: LetterGrade,
    pub remark: String,
    pub class_avg: Option<f64>,
    /// `total_score - class_avg`
    pub difference: Option<f64>,
    /// Competition rank within the class for this subject
    pub position: Option<usize>,
    pub has_all_results: bool,
    pub components: Vec<ComponentScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Above,
    Below,
    At,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportHeader {
    pub student_id: StudentId,
    pub student_name: String,
    pub student_number: String,
    pub class_name: Option<String>,
    pub class_code: Option<String>,
    pub term_id: TermId,
    pub term_name: String,
    pub session_name: String,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportCommentView {
    pub comment: String,
    pub added_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    pub overall_avg: f64,
    pub overall_grade: LetterGrade,
    pub overall_remark: String,
    pub class_overall_avg: Option<f64>,
    pub comparison: Option<Comparison>,
    pub subject_count: usize,
}

/// Everything the PDF renderer needs for one student's term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TermReportDocument {
    pub report_id: TermReportId,
    pub header: ReportHeader,
    pub subjects: Vec<SubjectGrade>,
    pub summary: ReportSummary,
    pub teacher_comment: Option<ReportCommentView>,
    pub principal_comment: Option<ReportCommentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TermAverage {
    pub term_id: TermId,
    pub term_name: String,
    pub session_name: String,
    pub term_start: NaiveDate,
    pub term_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubjectPerformance {
    pub subject_name: String,
    pub subject_code: String,
    pub final_score: f64,
    pub grade: LetterGrade,
    pub avg_raw_score: f64,
    pub highest_raw_score: f64,
    pub lowest_raw_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PerformanceDashboard {
    pub student_id: StudentId,
    pub current_term: Option<String>,
    pub term_history: Vec<TermAverage>,
    pub subjects: Vec<SubjectPerformance>,
    /// Active students in the student's class
    pub class_size: i64,
    /// Mean subject final score across the class for the current term
    pub class_average: Option<f64>,
}
