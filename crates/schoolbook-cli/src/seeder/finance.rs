//! Fee categories, fee items and one fee structure per class for a term.

use rust_decimal::Decimal;
use schoolbook_models::ids::{ClassId, FeeCategoryId, FeeItemId, FeeStructureId, TermId};
use sqlx::{FromRow, PgPool};
use std::time::Instant;

/// `(category, item, is_optional, base amount)`
const FEE_ITEMS: [(&str, &str, bool, i64); 5] = [
    ("Tuition", "Tuition Fee", false, 45_000),
    ("Development", "Development Levy", false, 10_000),
    ("Activities", "Sports Fee", false, 2_500),
    ("Activities", "Excursion", true, 5_000),
    ("Materials", "Textbooks", true, 12_000),
];

/// Tuition grows with the class level; every other item is flat.
pub fn fee_amount(item: &str, base: i64, level: i16) -> Decimal {
    if item == "Tuition Fee" {
        Decimal::from(base + i64::from(level.max(1) - 1) * 5_000)
    } else {
        Decimal::from(base)
    }
}

#[derive(FromRow)]
struct ClassRow {
    id: ClassId,
    name: String,
    arm: Option<String>,
    level: i16,
}

pub async fn seed_fee_items(db: &PgPool) -> Result<Vec<(FeeItemId, &'static str)>, Box<dyn std::error::Error>> {
    println!("💰 Seeding fee categories and items...");
    let mut tx = db.begin().await?;
    let mut items = Vec::with_capacity(FEE_ITEMS.len());

    for (category, item, is_optional, _) in FEE_ITEMS {
        let category_id = sqlx::query_scalar::<_, FeeCategoryId>(
            "INSERT INTO fee_categories (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(category)
        .fetch_one(&mut *tx)
        .await?;

        let item_id = sqlx::query_scalar::<_, FeeItemId>(
            "INSERT INTO fee_items (category_id, name, is_optional)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(category_id)
        .bind(item)
        .bind(is_optional)
        .fetch_one(&mut *tx)
        .await?;

        items.push((item_id, item));
    }

    tx.commit().await?;
    println!("   ✓ {} fee items ready", items.len());
    Ok(items)
}

/// One active structure per class for `term_id`, containing every fee item.
pub async fn seed_fee_structures(
    db: &PgPool,
    term_id: TermId,
    class_ids: &[ClassId],
    items: &[(FeeItemId, &'static str)],
) -> Result<Vec<FeeStructureId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧾 Seeding fee structures for {} classes...", class_ids.len());

    let classes = sqlx::query_as::<_, ClassRow>(
        "SELECT id, name, arm, level FROM classes WHERE id = ANY($1) ORDER BY level, arm",
    )
    .bind(class_ids)
    .fetch_all(db)
    .await?;

    let term_name = sqlx::query_scalar::<_, String>("SELECT name FROM terms WHERE id = $1")
        .bind(term_id)
        .fetch_one(db)
        .await?;

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(classes.len());

    for class in &classes {
        let class_name = match &class.arm {
            Some(arm) => format!("{} {}", class.name, arm),
            None => class.name.clone(),
        };
        let structure_id = sqlx::query_scalar::<_, FeeStructureId>(
            "INSERT INTO fee_structures (name, class_id, term_id)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(format!("{class_name} {term_name} Fees"))
        .bind(class.id)
        .bind(term_id)
        .fetch_one(&mut *tx)
        .await?;

        for (item_id, item_name) in items {
            let base = FEE_ITEMS
                .iter()
                .find(|(_, name, _, _)| name == item_name)
                .map(|(_, _, _, base)| *base)
                .unwrap_or_default();

            sqlx::query(
                "INSERT INTO fee_structure_items (fee_structure_id, fee_item_id, amount)
                 VALUES ($1, $2, $3)",
            )
            .bind(structure_id)
            .bind(item_id)
            .bind(fee_amount(item_name, base, class.level))
            .execute(&mut *tx)
            .await?;
        }

        ids.push(structure_id);
    }

    tx.commit().await?;
    println!(
        "   ✓ Inserted {} fee structures in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuition_scales_with_level() {
        assert_eq!(fee_amount("Tuition Fee", 45_000, 1), Decimal::from(45_000));
        assert_eq!(fee_amount("Tuition Fee", 45_000, 4), Decimal::from(60_000));
        assert_eq!(fee_amount("Sports Fee", 2_500, 6), Decimal::from(2_500));
    }
}
