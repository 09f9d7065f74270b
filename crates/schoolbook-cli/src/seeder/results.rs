//! Result seeding for a term.

use fake::Fake;
use rayon::prelude::*;
use rust_decimal::Decimal;
use schoolbook_models::ids::{StudentId, SubjectId, TermId};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{ExamTypeSeed, ResultSeed};

/// A score between 35% and 100% of `max_score`, in hundredths.
fn random_score(max_score: Decimal) -> Decimal {
    let max_cents = (max_score * Decimal::ONE_HUNDRED)
        .trunc()
        .try_into()
        .unwrap_or(0_i64);
    let cents: i64 = ((max_cents * 35 / 100)..=max_cents).fake();
    Decimal::new(cents, 2)
}

/// One result per (student, subject, exam type).
pub fn generate_results(
    students: &[StudentId],
    subjects: &[SubjectId],
    exam_types: &[ExamTypeSeed],
) -> Vec<ResultSeed> {
    students
        .par_iter()
        .flat_map(|&student_id| {
            let mut rows = Vec::with_capacity(subjects.len() * exam_types.len());
            for &subject_id in subjects {
                for exam_type in exam_types {
                    rows.push(ResultSeed {
                        student_id,
                        subject_id,
                        exam_type_id: exam_type.id,
                        score: random_score(exam_type.max_score),
                    });
                }
            }
            rows
        })
        .collect()
}

pub async fn seed_results(
    db: &PgPool,
    term_id: TermId,
    students: &[StudentId],
    subjects: &[SubjectId],
    exam_types: &[ExamTypeSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let results = generate_results(students, subjects, exam_types);
    println!(
        "📊 Seeding {} results ({} students × {} subjects × {} exam types)...",
        results.len(),
        students.len(),
        subjects.len(),
        exam_types.len()
    );

    let mut tx = db.begin().await?;

    // 5 params per result
    const BATCH_SIZE: usize = 2000;
    let mut inserted = 0;
    for chunk in results.chunks(BATCH_SIZE) {
        inserted += insert_results_chunk(&mut tx, term_id, chunk).await?;
    }

    tx.commit().await?;

    println!("   ✓ Upserted {} results in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}

async fn insert_results_chunk(
    tx: &mut Transaction<'_, Postgres>,
    term_id: TermId,
    results: &[ResultSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if results.is_empty() {
        return Ok(0);
    }

    let mut query = String::from(
        "INSERT INTO results (student_id, term_id, subject_id, exam_type_id, score) VALUES ",
    );
    for (i, _) in results.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5
        ));
    }
    query.push_str(
        " ON CONFLICT ON CONSTRAINT unique_result_per_exam
          DO UPDATE SET score = EXCLUDED.score, updated_at = NOW()",
    );

    let mut q = sqlx::query(&query);
    for result in results {
        q = q
            .bind(result.student_id)
            .bind(term_id)
            .bind(result.subject_id)
            .bind(result.exam_type_id)
            .bind(result.score);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

/// Regenerates every result for the current term.
pub async fn reseed_current_term(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let term_id = sqlx::query_scalar::<_, TermId>("SELECT id FROM terms WHERE is_current")
        .fetch_optional(db)
        .await?
        .ok_or("No current term found. Run `seed` first.")?;

    let students = sqlx::query_scalar::<_, StudentId>(
        "SELECT id FROM students WHERE is_active AND current_class_id IS NOT NULL ORDER BY student_number",
    )
    .fetch_all(db)
    .await?;
    let subjects = sqlx::query_scalar::<_, SubjectId>("SELECT id FROM subjects ORDER BY name")
        .fetch_all(db)
        .await?;

    let mut tx = db.begin().await?;
    let exam_types = super::academics::load_exam_types(&mut tx).await?;
    let cleared = sqlx::query("DELETE FROM results WHERE term_id = $1")
        .bind(term_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;
    println!("🗑️  Cleared {} results for the current term", cleared);

    seed_results(db, term_id, &students, &subjects, &exam_types).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolbook_models::ids::ExamTypeId;

    #[test]
    fn test_random_score_stays_within_bounds() {
        let max = Decimal::from(40);
        for _ in 0..200 {
            let score = random_score(max);
            assert!(score >= Decimal::from(14), "{score} below 35%");
            assert!(score <= max, "{score} above max");
            assert!(score.scale() <= 2);
        }
    }

    #[test]
    fn test_generate_results_covers_every_combination() {
        let students = [StudentId::new(), StudentId::new(), StudentId::new()];
        let subjects = [SubjectId::new(), SubjectId::new()];
        let exam_types = [
            ExamTypeSeed {
                id: ExamTypeId::new(),
                max_score: Decimal::from(40),
            },
            ExamTypeSeed {
                id: ExamTypeId::new(),
                max_score: Decimal::from(60),
            },
        ];

        let results = generate_results(&students, &subjects, &exam_types);
        assert_eq!(results.len(), 12);
        for exam_type in &exam_types {
            assert!(
                results
                    .iter()
                    .filter(|r| r.exam_type_id == exam_type.id)
                    .all(|r| r.score <= exam_type.max_score)
            );
        }
    }
}
