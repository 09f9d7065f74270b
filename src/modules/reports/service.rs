use std::collections::{BTreeMap, HashMap};

use sqlx::PgPool;
use tracing::instrument;

use schoolbook_core::AppError;
use schoolbook_core::grading::{GradeBreakdown, Weighted, mean};
use schoolbook_models::academics::{SchoolClass, Student};
use schoolbook_models::ids::{ClassId, StudentId, SubjectId, TermId};
use schoolbook_observability::track_report_assembled;

use crate::modules::reports::assembler::{ClassScores, assemble_subjects, summarize};
use crate::modules::reports::model::{
    CommentType, PerformanceDashboard, ReportComment, ReportCommentView, ReportHeader,
    SubjectPerformance, TermAverage, TermReport, TermReportDocument, UpsertCommentDto,
};
use crate::modules::results::model::ScoredResult;
use crate::modules::results::service::{ResultService, SCORED_RESULT_SELECT};
use crate::modules::terms::model::TermWithSession;
use crate::modules::terms::service::TermService;

pub struct ReportService;

impl ReportService {
    async fn get_student(db: &PgPool, student_id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            "SELECT id, student_number, first_name, last_name, current_class_id, is_active
             FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    async fn get_class(db: &PgPool, class_id: ClassId) -> Result<Option<SchoolClass>, AppError> {
        let class = sqlx::query_as::<_, SchoolClass>(
            "SELECT id, name, short_name, level, arm FROM classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_optional(db)
        .await?;

        Ok(class)
    }

    /// Fetches the report row for (student, term), creating it on first use.
    #[instrument(skip(db))]
    pub async fn get_or_create_report(
        db: &PgPool,
        student_id: StudentId,
        term_id: TermId,
    ) -> Result<TermReport, AppError> {
        sqlx::query(
            "INSERT INTO term_reports (student_id, term_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT unique_report_per_student_term DO NOTHING",
        )
        .bind(student_id)
        .bind(term_id)
        .execute(db)
        .await?;

        let report = sqlx::query_as::<_, TermReport>(
            "SELECT id, student_id, term_id, created_at FROM term_reports
             WHERE student_id = $1 AND term_id = $2",
        )
        .bind(student_id)
        .bind(term_id)
        .fetch_one(db)
        .await?;

        Ok(report)
    }

    async fn class_results(
        db: &PgPool,
        class_id: ClassId,
        term_id: TermId,
    ) -> Result<Vec<ScoredResult>, AppError> {
        let results = sqlx::query_as::<_, ScoredResult>(&format!(
            "{SCORED_RESULT_SELECT}
             JOIN students st ON st.id = r.student_id
             WHERE st.current_class_id = $1 AND st.is_active AND r.term_id = $2"
        ))
        .bind(class_id)
        .bind(term_id)
        .fetch_all(db)
        .await?;

        Ok(results)
    }

    async fn class_scores(
        db: &PgPool,
        class_id: Option<ClassId>,
        term_id: TermId,
    ) -> Result<Option<ClassScores>, AppError> {
        let Some(class_id) = class_id else {
            return Ok(None);
        };
        let results = Self::class_results(db, class_id, term_id).await?;
        Ok(Some(ClassScores::from_results(&results)))
    }

    /// Assembles the full term report for a student.
    ///
    /// `term_id` defaults to the current term. A student without a class gets
    /// no class statistics.
    #[instrument(skip(db))]
    pub async fn get_report(
        db: &PgPool,
        student_id: StudentId,
        term_id: Option<TermId>,
    ) -> Result<TermReportDocument, AppError> {
        let student = Self::get_student(db, student_id).await?;
        let term = TermService::resolve_term(db, term_id).await?;
        let report = Self::get_or_create_report(db, student.id, term.id).await?;

        let class = match student.current_class_id {
            Some(class_id) => Self::get_class(db, class_id).await?,
            None => None,
        };

        let results = ResultService::get_student_results(db, student.id, term.id).await?;
        let class_scores =
            Self::class_scores(db, class.as_ref().map(|c| c.id), term.id).await?;

        let subjects = assemble_subjects(&results, class_scores.as_ref());
        let summary = summarize(&subjects, class_scores.as_ref());

        let comments = sqlx::query_as::<_, ReportComment>(
            "SELECT id, report_id, comment_type, comment, added_on
             FROM report_comments WHERE report_id = $1",
        )
        .bind(report.id)
        .fetch_all(db)
        .await?;

        let comment_of = |kind: CommentType| {
            comments
                .iter()
                .find(|c| c.comment_type == kind)
                .map(|c| ReportCommentView {
                    comment: c.comment.clone(),
                    added_on: c.added_on,
                })
        };

        let document = TermReportDocument {
            report_id: report.id,
            header: Self::header(&student, class.as_ref(), &term),
            teacher_comment: comment_of(CommentType::Teacher),
            principal_comment: comment_of(CommentType::Principal),
            subjects,
            summary,
        };

        track_report_assembled(document.subjects.len());
        Ok(document)
    }

    fn header(
        student: &Student,
        class: Option<&SchoolClass>,
        term: &TermWithSession,
    ) -> ReportHeader {
        ReportHeader {
            student_id: student.id,
            student_name: student.full_name(),
            student_number: student.student_number.clone(),
            class_name: class.map(SchoolClass::full_name),
            class_code: class.map(SchoolClass::display_code),
            term_id: term.id,
            term_name: term.name.clone(),
            session_name: term.session_name.clone(),
            term_start: term.start_date,
            term_end: term.end_date,
        }
    }

    /// Sets the teacher or principal comment on a report, replacing any
    /// earlier comment of the same type.
    #[instrument(skip(db))]
    pub async fn upsert_comment(
        db: &PgPool,
        student_id: StudentId,
        dto: UpsertCommentDto,
    ) -> Result<ReportComment, AppError> {
        let student = Self::get_student(db, student_id).await?;
        let term = TermService::resolve_term(db, dto.term_id).await?;
        let report = Self::get_or_create_report(db, student.id, term.id).await?;

        let comment = sqlx::query_as::<_, ReportComment>(
            r#"INSERT INTO report_comments (report_id, comment_type, comment)
               VALUES ($1, $2, $3)
               ON CONFLICT ON CONSTRAINT unique_comment_type_per_report
               DO UPDATE SET comment = EXCLUDED.comment, added_on = CURRENT_DATE
               RETURNING id, report_id, comment_type, comment, added_on"#,
        )
        .bind(report.id)
        .bind(dto.comment_type.as_str())
        .bind(dto.comment.trim())
        .fetch_one(db)
        .await?;

        Ok(comment)
    }

    /// Term-by-term averages plus a breakdown of the current term.
    #[instrument(skip(db))]
    pub async fn get_performance(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<PerformanceDashboard, AppError> {
        let student = Self::get_student(db, student_id).await?;
        let current_term = TermService::get_current_term(db).await?;

        let all_results = sqlx::query_as::<_, ScoredResult>(&format!(
            "{SCORED_RESULT_SELECT} WHERE r.student_id = $1"
        ))
        .bind(student.id)
        .fetch_all(db)
        .await?;

        let term_history = Self::term_history(db, &all_results).await?;

        let (subjects, class_size, class_average) = match &current_term {
            Some(term) => {
                let current: Vec<&ScoredResult> =
                    all_results.iter().filter(|r| r.term_id == term.id).collect();
                let subjects = subject_performance(&current);

                let (class_size, class_average) = match student.current_class_id {
                    Some(class_id) => {
                        let size = sqlx::query_scalar::<_, i64>(
                            "SELECT COUNT(*) FROM students WHERE current_class_id = $1 AND is_active",
                        )
                        .bind(class_id)
                        .fetch_one(db)
                        .await?;
                        let scores = Self::class_scores(db, Some(class_id), term.id).await?;
                        (size, scores.and_then(|s| s.overall_average()))
                    }
                    None => (0, None),
                };
                (subjects, class_size, class_average)
            }
            None => (Vec::new(), 0, None),
        };

        Ok(PerformanceDashboard {
            student_id: student.id,
            current_term: current_term.map(|t| format!("{} {}", t.session_name, t.name)),
            term_history,
            subjects,
            class_size,
            class_average,
        })
    }

    async fn term_history(
        db: &PgPool,
        results: &[ScoredResult],
    ) -> Result<Vec<TermAverage>, AppError> {
        let mut by_term: HashMap<TermId, HashMap<SubjectId, Vec<&ScoredResult>>> = HashMap::new();
        for r in results {
            by_term
                .entry(r.term_id)
                .or_default()
                .entry(r.subject_id)
                .or_default()
                .push(r);
        }

        let mut history = Vec::with_capacity(by_term.len());
        for (term_id, subjects) in by_term {
            let Some(term) = TermService::find_term(db, term_id).await? else {
                continue;
            };
            let finals = subjects
                .into_values()
                .map(|rows| GradeBreakdown::from_components(rows).final_score);

            history.push(TermAverage {
                term_id,
                term_name: term.name,
                session_name: term.session_name,
                term_start: term.start_date,
                term_avg: mean(finals).unwrap_or(0.0),
            });
        }

        history.sort_by_key(|t| t.term_start);
        Ok(history)
    }
}

/// Final grade and raw-score spread per subject, ordered by subject name.
fn subject_performance(results: &[&ScoredResult]) -> Vec<SubjectPerformance> {
    let mut by_subject: BTreeMap<(&str, SubjectId), Vec<&ScoredResult>> = BTreeMap::new();
    for r in results {
        by_subject
            .entry((r.subject_name.as_str(), r.subject_id))
            .or_default()
            .push(*r);
    }

    by_subject
        .into_iter()
        .map(|((name, _), rows)| {
            let raw: Vec<f64> = rows.iter().map(|r| r.score()).collect();
            let breakdown = GradeBreakdown::from_components(rows.iter().copied());
            SubjectPerformance {
                subject_name: name.to_string(),
                subject_code: rows[0].subject_code.clone(),
                final_score: breakdown.final_score,
                grade: breakdown.grade,
                avg_raw_score: mean(raw.iter().copied()).unwrap_or(0.0),
                highest_raw_score: raw.iter().copied().fold(f64::MIN, f64::max),
                lowest_raw_score: raw.iter().copied().fold(f64::MAX, f64::min),
            }
        })
        .collect()
}
