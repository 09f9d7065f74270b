#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use schoolbook::router::init_router;
use schoolbook::state::AppState;
use schoolbook_config::{CorsConfig, FinanceConfig};
use schoolbook_models::ids::{
    ClassId, ExamTypeId, FeeItemId, FeeStructureId, StudentId, SubjectId, TermId,
};
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    let state = AppState {
        db: pool,
        cors_config: CorsConfig::default(),
        finance_config: FinanceConfig::default(),
    };
    init_router(state)
}

/// Sends one request through a fresh router and returns the status and JSON body.
///
/// Empty bodies (204) come back as `Value::Null`.
pub async fn send(pool: &PgPool, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let app = setup_test_app(pool.clone());

    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Money as it appears on the wire (`"2500.00"`).
pub fn money(body: &Value) -> Decimal {
    body.as_str()
        .map(|s| s.parse().unwrap())
        .or_else(|| body.as_f64().map(|f| Decimal::try_from(f).unwrap()))
        .unwrap_or_else(|| panic!("not a money value: {body}"))
}

pub struct TestCalendar {
    pub previous_term: TermId,
    pub current_term: TermId,
}

/// `2025/2026` session with a finished First Term and a current Second Term.
pub async fn create_calendar(tx: &mut Transaction<'_, Postgres>) -> TestCalendar {
    let session_id: Uuid = sqlx::query_scalar(
        "INSERT INTO academic_sessions (name, start_date, end_date, is_current)
         VALUES ('2025/2026', '2025-09-08', '2026-07-25', TRUE)
         RETURNING id",
    )
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    let previous_term = create_term(tx, session_id, "First Term", date(2025, 9, 8), date(2025, 12, 15), false).await;
    let current_term = create_term(tx, session_id, "Second Term", date(2026, 1, 6), date(2026, 4, 4), true).await;

    TestCalendar {
        previous_term,
        current_term,
    }
}

pub async fn create_term(
    tx: &mut Transaction<'_, Postgres>,
    session_id: Uuid,
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
    is_current: bool,
) -> TermId {
    sqlx::query_scalar(
        "INSERT INTO terms (academic_session_id, name, start_date, end_date, is_current)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(session_id)
    .bind(name)
    .bind(start)
    .bind(end)
    .bind(is_current)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub async fn create_class(tx: &mut Transaction<'_, Postgres>, level: i16, arm: Option<&str>) -> ClassId {
    sqlx::query_scalar(
        "INSERT INTO classes (name, short_name, level, arm) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(format!("JSS {level}"))
    .bind(format!("J{level}"))
    .bind(level)
    .bind(arm)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub async fn create_student(
    tx: &mut Transaction<'_, Postgres>,
    first_name: &str,
    last_name: &str,
    class_id: Option<ClassId>,
) -> StudentId {
    sqlx::query_scalar(
        "INSERT INTO students (student_number, first_name, last_name, current_class_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(format!("T{}", &Uuid::new_v4().simple().to_string()[..10]))
    .bind(first_name)
    .bind(last_name)
    .bind(class_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub async fn create_subject(tx: &mut Transaction<'_, Postgres>, name: &str, code: &str) -> SubjectId {
    sqlx::query_scalar("INSERT INTO subjects (name, code) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(code)
        .fetch_one(&mut **tx)
        .await
        .unwrap()
}

pub async fn create_exam_type(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    weight: i16,
    max_score: Decimal,
) -> ExamTypeId {
    sqlx::query_scalar(
        "INSERT INTO exam_types (name, weight, max_score, is_final) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(weight)
    .bind(max_score)
    .bind(name == "Exam")
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// CA out of 40 weighted 40, Exam out of 60 weighted 60.
pub async fn create_standard_exam_types(tx: &mut Transaction<'_, Postgres>) -> (ExamTypeId, ExamTypeId) {
    let ca = create_exam_type(tx, "CA", 40, Decimal::from(40)).await;
    let exam = create_exam_type(tx, "Exam", 60, Decimal::from(60)).await;
    (ca, exam)
}

pub async fn insert_result(
    tx: &mut Transaction<'_, Postgres>,
    student_id: StudentId,
    term_id: TermId,
    subject_id: SubjectId,
    exam_type_id: ExamTypeId,
    score: Decimal,
) {
    sqlx::query(
        "INSERT INTO results (student_id, term_id, subject_id, exam_type_id, score)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(student_id)
    .bind(term_id)
    .bind(subject_id)
    .bind(exam_type_id)
    .bind(score)
    .execute(&mut **tx)
    .await
    .unwrap();
}

pub async fn create_fee_item(tx: &mut Transaction<'_, Postgres>, category: &str, name: &str) -> FeeItemId {
    let category_id: Uuid = sqlx::query_scalar(
        "INSERT INTO fee_categories (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(category)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    sqlx::query_scalar("INSERT INTO fee_items (category_id, name) VALUES ($1, $2) RETURNING id")
        .bind(category_id)
        .bind(name)
        .fetch_one(&mut **tx)
        .await
        .unwrap()
}

pub async fn create_fee_structure(
    tx: &mut Transaction<'_, Postgres>,
    class_id: ClassId,
    term_id: TermId,
    items: &[(FeeItemId, Decimal)],
    is_active: bool,
) -> FeeStructureId {
    let id: FeeStructureId = sqlx::query_scalar(
        "INSERT INTO fee_structures (name, class_id, term_id, is_active)
         VALUES ('Term Fees', $1, $2, $3)
         RETURNING id",
    )
    .bind(class_id)
    .bind(term_id)
    .bind(is_active)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    for (item_id, amount) in items {
        sqlx::query(
            "INSERT INTO fee_structure_items (fee_structure_id, fee_item_id, amount) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(item_id)
        .bind(amount)
        .execute(&mut **tx)
        .await
        .unwrap();
    }

    id
}

/// Tuition 2000 + Levy 500 for JSS 1, a student in that class and the calendar.
pub struct FinanceFixture {
    pub calendar: TestCalendar,
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub fee_structure_id: FeeStructureId,
    pub tuition: FeeItemId,
    pub levy: FeeItemId,
}

pub async fn create_finance_fixture(pool: &PgPool) -> FinanceFixture {
    let mut tx = pool.begin().await.unwrap();
    let calendar = create_calendar(&mut tx).await;
    let class_id = create_class(&mut tx, 1, Some("Alpha")).await;
    let student_id = create_student(&mut tx, "Ada", "Obi", Some(class_id)).await;
    let tuition = create_fee_item(&mut tx, "Tuition", "Tuition Fee").await;
    let levy = create_fee_item(&mut tx, "Development", "Development Levy").await;
    let fee_structure_id = create_fee_structure(
        &mut tx,
        class_id,
        calendar.current_term,
        &[(tuition, Decimal::from(2000)), (levy, Decimal::from(500))],
        true,
    )
    .await;
    tx.commit().await.unwrap();

    FinanceFixture {
        calendar,
        class_id,
        student_id,
        fee_structure_id,
        tuition,
        levy,
    }
}
