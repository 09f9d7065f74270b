use chrono::NaiveDate;
use rust_decimal_macros::dec;
use schoolbook::schoolbook_core::ledger::{
    LedgerError, Reconciliation, compute_balance, format_invoice_number, is_overdue,
    validate_payment,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_two_payments_settle_invoice() {
    assert_eq!(
        compute_balance(dec!(100), [dec!(40), dec!(60)]),
        (dec!(100), dec!(0), true)
    );
}

#[test]
fn test_balance_keeps_cents() {
    let (paid, balance, is_paid) = compute_balance(dec!(2500.50), [dec!(1000.25), dec!(0.25)]);

    assert_eq!(paid, dec!(1000.50));
    assert_eq!(balance, dec!(1500.00));
    assert!(!is_paid);
}

#[test]
fn test_zero_total_invoice_is_paid() {
    let r = Reconciliation::new(dec!(0), []);
    assert!(r.is_paid);
    assert_eq!(r.balance, dec!(0));
}

#[test]
fn test_payment_up_to_balance_is_accepted() {
    let r = validate_payment(dec!(2500), [dec!(1000)], dec!(1500)).unwrap();

    assert_eq!(r.paid, dec!(2500));
    assert_eq!(r.balance, dec!(0));
    assert!(r.is_paid);
}

#[test]
fn test_payment_rejections() {
    assert_eq!(
        validate_payment(dec!(2500), [dec!(2000)], dec!(500.01)),
        Err(LedgerError::ExceedsBalance {
            amount: dec!(500.01),
            balance: dec!(500)
        })
    );
    assert_eq!(
        validate_payment(dec!(2500), [dec!(2500)], dec!(1)),
        Err(LedgerError::AlreadyPaid)
    );
    assert_eq!(
        validate_payment(dec!(2500), [], dec!(0)),
        Err(LedgerError::NonPositiveAmount)
    );
}

#[test]
fn test_overdue_only_after_due_date_when_unpaid() {
    let due = date(2026, 3, 1);

    assert!(!is_overdue(due, date(2026, 3, 1), false));
    assert!(is_overdue(due, date(2026, 3, 2), false));
    assert!(!is_overdue(due, date(2026, 3, 2), true));
}

#[test]
fn test_invoice_numbers_are_zero_padded() {
    assert_eq!(format_invoice_number("INV", 1), "INV00001");
    assert_eq!(format_invoice_number("INV", 123456), "INV123456");
    assert_eq!(format_invoice_number("SCH-", 42), "SCH-00042");
}
