//! Academic calendar, classes, subjects and exam types.
//!
//! These are fixed reference rows; only their number varies.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use schoolbook_models::academics::ClassArm;
use schoolbook_models::ids::{AcademicSessionId, ClassId, ExamTypeId, SubjectId, TermId};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::ExamTypeSeed;

const CLASS_LEVELS: [(&str, &str); 6] = [
    ("JSS 1", "J1"),
    ("JSS 2", "J2"),
    ("JSS 3", "J3"),
    ("SSS 1", "S1"),
    ("SSS 2", "S2"),
    ("SSS 3", "S3"),
];

const SUBJECTS: [(&str, &str); 10] = [
    ("Mathematics", "MTH"),
    ("English Language", "ENG"),
    ("Basic Science", "BSC"),
    ("Social Studies", "SOS"),
    ("Civic Education", "CVE"),
    ("Computer Studies", "CMP"),
    ("Agricultural Science", "AGR"),
    ("French", "FRE"),
    ("Fine Arts", "ART"),
    ("Physical Education", "PHE"),
];

/// `(name, weight, max_score, is_final)`; weights sum to 100.
const EXAM_TYPES: [(&str, i16, i64, bool); 2] = [("CA", 40, 40, false), ("Exam", 60, 60, true)];

pub struct Calendar {
    pub session_id: AcademicSessionId,
    pub current_term_id: TermId,
}

/// School year containing `today`; years start in September.
pub fn session_start_year(today: NaiveDate) -> i32 {
    if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    }
}

/// `(name, start, end)` for the three terms of a session starting in `year`.
pub fn term_dates(year: i32) -> Vec<(&'static str, NaiveDate, NaiveDate)> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        ("First Term", date(year, 9, 8), date(year, 12, 15)),
        ("Second Term", date(year + 1, 1, 6), date(year + 1, 4, 4)),
        ("Third Term", date(year + 1, 4, 28), date(year + 1, 7, 25)),
    ]
}

/// Index of the term containing `today`, or of the next one to start.
pub fn current_term_index(terms: &[(&str, NaiveDate, NaiveDate)], today: NaiveDate) -> usize {
    terms
        .iter()
        .position(|(_, _, end)| today <= *end)
        .unwrap_or(terms.len().saturating_sub(1))
}

/// Inserts the current session and its terms, marking the term for today as current.
pub async fn seed_calendar(db: &PgPool) -> Result<Calendar, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let today = Utc::now().date_naive();
    let year = session_start_year(today);
    let terms = term_dates(year);
    let current = current_term_index(&terms, today);

    println!("📅 Seeding academic session {}/{}...", year, year + 1);

    let mut tx = db.begin().await?;

    sqlx::query("UPDATE terms SET is_current = FALSE WHERE is_current")
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE academic_sessions SET is_current = FALSE WHERE is_current")
        .execute(&mut *tx)
        .await?;

    let session_id = sqlx::query_scalar::<_, AcademicSessionId>(
        "INSERT INTO academic_sessions (name, start_date, end_date, is_current)
         VALUES ($1, $2, $3, TRUE)
         RETURNING id",
    )
    .bind(format!("{}/{}", year, year + 1))
    .bind(terms[0].1)
    .bind(terms[terms.len() - 1].2)
    .fetch_one(&mut *tx)
    .await?;

    let mut current_term_id = None;
    for (i, (name, start, end)) in terms.iter().enumerate() {
        let id = sqlx::query_scalar::<_, TermId>(
            "INSERT INTO terms (academic_session_id, name, start_date, end_date, is_current)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(session_id)
        .bind(*name)
        .bind(*start)
        .bind(*end)
        .bind(i == current)
        .fetch_one(&mut *tx)
        .await?;
        if i == current {
            current_term_id = Some(id);
        }
    }

    tx.commit().await?;

    let current_term_id = current_term_id.ok_or("no current term was inserted")?;
    println!(
        "   ✓ Inserted session with {} terms ({} is current) in {:?}",
        terms.len(),
        terms[current].0,
        start_time.elapsed()
    );

    Ok(Calendar {
        session_id,
        current_term_id,
    })
}

/// Class rows as `(name, short_name, level, arm)`.
pub fn generate_classes(levels: usize, arms_per_level: usize) -> Vec<(&'static str, &'static str, i16, ClassArm)> {
    CLASS_LEVELS
        .iter()
        .take(levels)
        .enumerate()
        .flat_map(|(i, &(name, short))| {
            ClassArm::ALL
                .into_iter()
                .take(arms_per_level)
                .map(move |arm| (name, short, (i + 1) as i16, arm))
        })
        .collect()
}

pub async fn seed_classes(
    db: &PgPool,
    levels: usize,
    arms_per_level: usize,
) -> Result<Vec<ClassId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let classes = generate_classes(levels, arms_per_level);
    println!("🏫 Seeding {} classes...", classes.len());

    if classes.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO classes (name, short_name, level, arm) VALUES ");
    for (i, _) in classes.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for (name, short_name, level, arm) in &classes {
        q = q.bind(*name).bind(*short_name).bind(*level).bind(arm.as_str());
    }

    let ids: Vec<ClassId> = q.fetch_all(db).await?;
    println!("   ✓ Inserted {} classes in {:?}", ids.len(), start_time.elapsed());

    Ok(ids)
}

pub async fn seed_subjects(
    db: &PgPool,
    count: usize,
) -> Result<Vec<SubjectId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let subjects = &SUBJECTS[..count.min(SUBJECTS.len())];
    println!("📘 Seeding {} subjects...", subjects.len());

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(subjects.len());
    for (name, code) in subjects {
        let id = sqlx::query_scalar::<_, SubjectId>(
            "INSERT INTO subjects (name, code) VALUES ($1, $2)
             ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(*name)
        .bind(*code)
        .fetch_one(&mut *tx)
        .await?;
        ids.push(id);
    }
    tx.commit().await?;

    println!("   ✓ Inserted {} subjects in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

/// Inserts the CA and Exam types unless they already exist.
pub async fn seed_exam_types(db: &PgPool) -> Result<Vec<ExamTypeSeed>, Box<dyn std::error::Error>> {
    println!("📝 Seeding exam types...");
    let mut tx = db.begin().await?;

    for (name, weight, max_score, is_final) in EXAM_TYPES {
        sqlx::query(
            "INSERT INTO exam_types (name, weight, max_score, is_final)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(weight)
        .bind(Decimal::from(max_score))
        .bind(is_final)
        .execute(&mut *tx)
        .await?;
    }

    let exam_types = load_exam_types(&mut tx).await?;
    tx.commit().await?;

    println!("   ✓ {} exam types ready", exam_types.len());
    Ok(exam_types)
}

pub(crate) async fn load_exam_types(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<ExamTypeSeed>, Box<dyn std::error::Error>> {
    let rows = sqlx::query_as::<_, (ExamTypeId, Decimal)>(
        "SELECT id, max_score FROM exam_types ORDER BY weight ASC, name ASC",
    )
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, max_score)| ExamTypeSeed { id, max_score })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_session_starts_in_september() {
        assert_eq!(session_start_year(date(2026, 10, 19)), 2026);
        assert_eq!(session_start_year(date(2027, 3, 1)), 2026);
        assert_eq!(session_start_year(date(2026, 8, 31)), 2025);
    }

    #[test]
    fn test_current_term_follows_the_calendar() {
        let terms = term_dates(2026);
        assert_eq!(current_term_index(&terms, date(2026, 10, 19)), 0);
        assert_eq!(current_term_index(&terms, date(2026, 12, 20)), 1);
        assert_eq!(current_term_index(&terms, date(2027, 5, 2)), 2);
        assert_eq!(current_term_index(&terms, date(2027, 8, 15)), 2);
    }

    #[test]
    fn test_generate_classes_caps_levels_and_arms() {
        let classes = generate_classes(2, 3);
        assert_eq!(classes.len(), 6);
        assert_eq!(classes[0], ("JSS 1", "J1", 1, ClassArm::Alpha));
        assert_eq!(classes[5], ("JSS 2", "J2", 2, ClassArm::Gamma));
        assert_eq!(generate_classes(10, 10).len(), 24);
    }

    #[test]
    fn test_exam_type_weights_sum_to_hundred() {
        let total: i16 = EXAM_TYPES.iter().map(|(_, weight, _, _)| weight).sum();
        assert_eq!(total, 100);
    }
}
