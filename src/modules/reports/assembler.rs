use std::collections::{BTreeMap, HashMap};

use schoolbook_core::grading::{
    GradeBreakdown, LetterGrade, Weighted, competition_rank, mean,
};
use schoolbook_models::ids::{StudentId, SubjectId};

use crate::modules::reports::model::{
    Comparison, ComponentScore, ReportSummary, SubjectGrade,
};
use crate::modules::results::model::ScoredResult;

const CA_EXAM_TYPE: &str = "ca";
const FINAL_EXAM_TYPE: &str = "exam";

/// Final scores of every student in a class, per subject, for one term.
#[derive(Debug, Default, Clone)]
pub struct ClassScores {
    by_subject: HashMap<SubjectId, Vec<f64>>,
}

impl ClassScores {
    /// Grades each (student, subject) group in `results`.
    pub fn from_results(results: &[ScoredResult]) -> Self {
        let mut groups: HashMap<(StudentId, SubjectId), Vec<&ScoredResult>> = HashMap::new();
        for result in results {
            groups
                .entry((result.student_id, result.subject_id))
                .or_default()
                .push(result);
        }

        let mut by_subject: HashMap<SubjectId, Vec<f64>> = HashMap::new();
        for ((_, subject_id), rows) in groups {
            let breakdown = GradeBreakdown::from_components(rows);
            by_subject
                .entry(subject_id)
                .or_default()
                .push(breakdown.final_score);
        }

        Self { by_subject }
    }

    pub fn subject_scores(&self, subject_id: SubjectId) -> Option<&[f64]> {
        self.by_subject
            .get(&subject_id)
            .map(Vec::as_slice)
            .filter(|s| !s.is_empty())
    }

    /// Mean over every subject score in the class.
    pub fn overall_average(&self) -> Option<f64> {
        mean(self.by_subject.values().flatten().copied())
    }
}

fn raw_score_named(rows: &[&ScoredResult], name: &str) -> Option<f64> {
    rows.iter()
        .find(|r| r.exam_type_name.trim().eq_ignore_ascii_case(name))
        .map(|r| r.score())
}

fn component_scores(rows: &[&ScoredResult]) -> Vec<ComponentScore> {
    rows.iter()
        .map(|r| ComponentScore {
            exam_type: r.exam_type_name.clone(),
            score: r.score(),
            max_score: r.max_score(),
            weight: r.weight(),
            contribution: r.contribution(),
        })
        .collect()
}

/// One graded row per subject, ordered by subject name.
///
/// `class` supplies the class average and position; without it those fields
/// stay empty.
pub fn assemble_subjects(
    student_results: &[ScoredResult],
    class: Option<&ClassScores>,
) -> Vec<SubjectGrade> {
    let mut by_subject: BTreeMap<(String, SubjectId), Vec<&ScoredResult>> = BTreeMap::new();
    for result in student_results {
        by_subject
            .entry((result.subject_name.clone(), result.subject_id))
            .or_default()
            .push(result);
    }

    by_subject
        .into_iter()
        .map(|((subject_name, subject_id), rows)| {
            let breakdown = GradeBreakdown::from_components(rows.iter().copied());
            let class_scores = class.and_then(|c| c.subject_scores(subject_id));
            let class_avg = class_scores.and_then(|s| mean(s.iter().copied()));

            SubjectGrade {
                subject_id,
                subject_name,
                subject_code: rows[0].subject_code.clone(),
                ca_score: raw_score_named(&rows, CA_EXAM_TYPE),
                exam_score: raw_score_named(&rows, FINAL_EXAM_TYPE),
                total_score: breakdown.final_score,
                grade: breakdown.grade,
                remark: breakdown.remark().to_string(),
                class_avg,
                difference: class_avg.map(|avg| breakdown.final_score - avg),
                position: class_scores.map(|s| competition_rank(breakdown.final_score, s)),
                has_all_results: breakdown.is_complete(),
                components: component_scores(&rows),
            }
        })
        .collect()
}

/// Overall average, its grade and how it compares with the class.
pub fn summarize(subjects: &[SubjectGrade], class: Option<&ClassScores>) -> ReportSummary {
    let overall_avg = mean(subjects.iter().map(|s| s.total_score)).unwrap_or(0.0);
    let overall_grade = LetterGrade::from_score(overall_avg);
    let class_overall_avg = class.and_then(ClassScores::overall_average);

    let comparison = class_overall_avg
        .filter(|_| !subjects.is_empty())
        .map(|class_avg| {
            let difference = overall_avg - class_avg;
            if difference.abs() < 1e-9 {
                Comparison::At
            } else if difference > 0.0 {
                Comparison::Above
            } else {
                Comparison::Below
            }
        });

    ReportSummary {
        overall_avg,
        overall_grade,
        overall_remark: overall_grade.remark().to_string(),
        class_overall_avg,
        comparison,
        subject_count: subjects.len(),
    }
}
