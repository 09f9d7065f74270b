//! Database seeding.
//!
//! `seed_all` builds a complete school for the current session: calendar,
//! classes, subjects, exam types, students, current-term results and fee
//! structures. Invoices and payments are left to the API.

pub mod academics;
pub mod finance;
pub mod models;
pub mod results;
pub mod students;

use sqlx::PgPool;
use std::time::Instant;

pub use models::SeedConfig;

pub async fn seed_all(db: &PgPool, config: &SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "\n🌱 Seeding {} classes with {} students...\n",
        config.total_classes(),
        config.total_students()
    );

    let calendar = academics::seed_calendar(db).await?;
    let class_ids = academics::seed_classes(db, config.levels, config.arms_per_level).await?;
    let subject_ids = academics::seed_subjects(db, config.subjects).await?;
    let exam_types = academics::seed_exam_types(db).await?;
    let student_ids = students::seed_students(db, &class_ids, config.students_per_class).await?;

    results::seed_results(
        db,
        calendar.current_term_id,
        &student_ids,
        &subject_ids,
        &exam_types,
    )
    .await?;

    let fee_items = finance::seed_fee_items(db).await?;
    finance::seed_fee_structures(db, calendar.current_term_id, &class_ids, &fee_items).await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    Ok(())
}

/// Tables in dependency order, children first.
const SEEDED_TABLES: [&str; 16] = [
    "payments",
    "invoice_line_items",
    "invoices",
    "fee_structure_items",
    "fee_structures",
    "fee_items",
    "fee_categories",
    "report_comments",
    "term_reports",
    "results",
    "students",
    "exam_types",
    "subjects",
    "classes",
    "terms",
    "academic_sessions",
];

/// Deletes every academic and finance row.
pub async fn clear_all(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;
    let mut total = 0;
    for table in SEEDED_TABLES {
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted > 0 {
            println!("   ✓ {table}: {deleted}");
        }
        total += deleted;
    }
    tx.commit().await?;

    println!("   ✓ Deleted {} rows in {:?}", total, start_time.elapsed());
    Ok(total)
}
