//! Student seeding.

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use schoolbook_models::ids::{ClassId, StudentId};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::StudentSeed;

/// Generates `per_class` students for every class in parallel.
///
/// Student numbers continue from `first_number` so reseeding never collides.
pub fn generate_students(class_ids: &[ClassId], per_class: usize, first_number: i64) -> Vec<StudentSeed> {
    class_ids
        .par_iter()
        .enumerate()
        .flat_map(|(class_idx, &class_id)| {
            (0..per_class)
                .map(|student_idx| {
                    let sequence = first_number + (class_idx * per_class + student_idx) as i64;
                    StudentSeed {
                        student_number: format!("SB{sequence:06}"),
                        first_name: FirstName().fake(),
                        last_name: LastName().fake(),
                        class_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_students(
    db: &PgPool,
    class_ids: &[ClassId],
    per_class: usize,
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students ({} per class)...",
        class_ids.len() * per_class,
        per_class
    );

    let first_number = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) + 1 FROM students")
        .fetch_one(db)
        .await?;
    let students = generate_students(class_ids, per_class, first_number);
    let ids = insert_students_batch(db, &students).await?;

    println!("   ✓ Inserted {} students in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

pub async fn insert_students_batch(
    db: &PgPool,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 4 params per student
    const BATCH_SIZE: usize = 1000;
    let mut all_ids = Vec::with_capacity(students.len());

    for chunk in students.chunks(BATCH_SIZE) {
        let ids = insert_students_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    if students.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO students (student_number, first_name, last_name, current_class_id) VALUES ",
    );
    for (i, _) in students.iter().enumerate() {
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
    for student in students {
        q = q
            .bind(&student.student_number)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(student.class_id);
    }

    let ids: Vec<StudentId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_students_numbers_are_sequential_per_class() {
        let classes = [ClassId::new(), ClassId::new()];
        let students = generate_students(&classes, 3, 10);

        assert_eq!(students.len(), 6);
        let numbers: Vec<&str> = students.iter().map(|s| s.student_number.as_str()).collect();
        assert_eq!(
            numbers,
            ["SB000010", "SB000011", "SB000012", "SB000013", "SB000014", "SB000015"]
        );
        assert!(students[..3].iter().all(|s| s.class_id == classes[0]));
        assert!(students[3..].iter().all(|s| s.class_id == classes[1]));
    }
}
