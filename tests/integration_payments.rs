mod common;

use axum::http::StatusCode;
use common::{FinanceFixture, create_finance_fixture, money, send};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;

/// Issues the fixture student's invoice (total 2500) and returns its id.
async fn issue_invoice(pool: &PgPool, f: &FinanceFixture) -> String {
    let (status, body) = send(
        pool,
        "POST",
        "/api/invoices",
        Some(json!({
            "student_id": f.student_id,
            "fee_structure_id": f.fee_structure_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn pay(pool: &PgPool, invoice_id: &str, payment: Value) -> (StatusCode, Value) {
    send(
        pool,
        "POST",
        &format!("/api/invoices/{invoice_id}/payments"),
        Some(payment),
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_then_full_payment(pool: PgPool) {
    let f = create_finance_fixture(&pool).await;
    let invoice_id = issue_invoice(&pool, &f).await;

    let (status, receipt) = pay(
        &pool,
        &invoice_id,
        json!({
            "amount": "1000.00",
            "payment_method": "bank",
            "payment_date": "2026-01-20",
            "transaction_reference": "TRX-001"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{receipt}");
    assert_eq!(receipt["invoice_number"], "INV00001");
    assert_eq!(receipt["payment"]["payment_method"], "bank");
    assert_eq!(receipt["payment"]["payment_date"], "2026-01-20");
    assert_eq!(receipt["payment"]["transaction_reference"], "TRX-001");
    assert_eq!(money(&receipt["reconciliation"]["paid"]), Decimal::from(1000));
    assert_eq!(money(&receipt["reconciliation"]["balance"]), Decimal::from(1500));
    assert_eq!(receipt["reconciliation"]["is_paid"], false);

    let (_, invoice) = send(&pool, "GET", &format!("/api/invoices/{invoice_id}"), None).await;
    assert_eq!(invoice["is_paid"], false);
    assert_eq!(money(&invoice["paid_amount"]), Decimal::from(1000));

    let (status, receipt) = pay(
        &pool,
        &invoice_id,
        json!({ "amount": "1500", "payment_method": "cash" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(money(&receipt["reconciliation"]["balance"]), Decimal::ZERO);
    assert_eq!(receipt["reconciliation"]["is_paid"], true);

    let (_, invoice) = send(&pool, "GET", &format!("/api/invoices/{invoice_id}"), None).await;
    assert_eq!(invoice["is_paid"], true);
    assert_eq!(money(&invoice["reconciliation"]["paid"]), Decimal::from(2500));
    assert_eq!(invoice["payments"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_overpayment_is_rejected(pool: PgPool) {
    let f = create_finance_fixture(&pool).await;
    let invoice_id = issue_invoice(&pool, &f).await;
    pay(&pool, &invoice_id, json!({ "amount": "2000", "payment_method": "cash" })).await;

    let (status, body) = pay(
        &pool,
        &invoice_id,
        json!({ "amount": "500.01", "payment_method": "cash" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("exceeds the outstanding balance"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_paid_invoice_accepts_no_more_payments(pool: PgPool) {
    let f = create_finance_fixture(&pool).await;
    let invoice_id = issue_invoice(&pool, &f).await;
    pay(&pool, &invoice_id, json!({ "amount": "2500", "payment_method": "card" })).await;

    let (status, body) = pay(
        &pool,
        &invoice_id,
        json!({ "amount": "1", "payment_method": "card" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invoice is already fully paid");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_validation(pool: PgPool) {
    let f = create_finance_fixture(&pool).await;
    let invoice_id = issue_invoice(&pool, &f).await;

    for amount in ["0", "-10", "10.005"] {
        let (status, _) = pay(
            &pool,
            &invoice_id,
            json!({ "amount": amount, "payment_method": "cash" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "amount {amount}");
    }

    let (status, _) = pay(
        &pool,
        &invoice_id,
        json!({ "amount": "10", "payment_method": "cheque" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = pay(&pool, &invoice_id, json!({ "payment_method": "cash" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "amount is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_on_unknown_invoice(pool: PgPool) {
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = pay(
        &pool,
        &missing,
        json!({ "amount": "10", "payment_method": "cash" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invoice not found");

    let (status, _) = send(&pool, "GET", &format!("/api/invoices/{missing}/payments"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_payments_in_date_order(pool: PgPool) {
    let f = create_finance_fixture(&pool).await;
    let invoice_id = issue_invoice(&pool, &f).await;

    pay(
        &pool,
        &invoice_id,
        json!({ "amount": "300", "payment_method": "mobile", "payment_date": "2026-02-10" }),
    )
    .await;
    pay(
        &pool,
        &invoice_id,
        json!({ "amount": "200", "payment_method": "cash", "payment_date": "2026-01-15" }),
    )
    .await;

    let (status, body) = send(&pool, "GET", &format!("/api/invoices/{invoice_id}/payments"), None).await;

    assert_eq!(status, StatusCode::OK);
    let payments = body.as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["payment_date"], "2026-01-15");
    assert_eq!(money(&payments[0]["amount"]), Decimal::from(200));
    assert_eq!(payments[1]["payment_method"], "mobile");
}
