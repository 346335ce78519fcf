use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use debt_ledger_rs::{
    CsvTableStore, DebtManager, EditPhase, LedgerConfig, LedgerError, Money, Payment,
    PaymentEdit, SafeTimeProvider, SessionContext, TimeSource,
};
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_manager(dir: &TempDir) -> DebtManager<CsvTableStore> {
    let config = LedgerConfig::village_default(dir.path());
    let tables = &config.tables;
    let store = CsvTableStore::create(
        dir.path(),
        &[
            (tables.debtors_table.as_str(), tables.debtor_columns.ordered()),
            (tables.payments_table.as_str(), tables.payment_columns.ordered()),
        ],
    )
    .unwrap();
    DebtManager::new(store, config).unwrap()
}

#[test]
fn test_csv_ledger_lifecycle() {
    let dir = TempDir::new().unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 3, 6, 8, 0, 0).unwrap(),
    ));
    let mut manager = open_manager(&dir);
    let mut session = SessionContext::new();

    manager.add_debtor("สมชาย", Money::from_major(100_000), &time).unwrap();
    manager.add_debtor("สมศรี", Money::from_major(50_000), &time).unwrap();
    manager
        .record_payment(
            &mut session,
            Payment::new("สมชาย", day(2025, 6, 1), Money::from_major(5_000), "เงินสด"),
            &time,
        )
        .unwrap();
    manager
        .record_payment(
            &mut session,
            Payment::new("สมศรี", day(2025, 7, 1), Money::from_major(12_500), ""),
            &time,
        )
        .unwrap();

    let pay = fs::read_to_string(dir.path().join("pay.csv")).unwrap();
    assert_eq!(pay.lines().count(), 3);
    assert!(pay.lines().next().unwrap().contains("ผู้จ่าย"));

    // 20,000 short in the first period, fined 15%
    let summary = manager.summary("สมชาย", &time).unwrap();
    assert_eq!(summary.total_paid, Money::from_major(5_000));
    assert_eq!(summary.total_fines, Money::from_major(3_000));
    assert_eq!(summary.remaining_with_fines, Money::from_major(98_000));

    // the latest receipt belongs to the last payment recorded
    let receipt = manager.receipt_for_latest(&session, &time).unwrap();
    assert_eq!(receipt.file_name, "ใบเสร็จ_สมศรี_20250701.txt");
    assert!(receipt.body.contains("สมศรี"));

    // a fresh manager over the same files sees the same ledger
    let reopened = CsvTableStore::open(dir.path()).unwrap();
    let mut manager = DebtManager::new(reopened, LedgerConfig::village_default(dir.path())).unwrap();
    let original = Payment::new("สมชาย", day(2025, 6, 1), Money::from_major(5_000), "เงินสด");
    manager.begin_edit(&mut session, &original).unwrap();
    let edited = manager
        .submit_edit(
            &mut session,
            &PaymentEdit {
                paid_on: day(2025, 6, 2),
                amount: Money::from_major(25_000),
                note: "เงินสด".to_string(),
            },
            &time,
        )
        .unwrap();
    assert_eq!(edited.amount, Money::from_major(25_000));
    assert_eq!(session.edit.phase(), EditPhase::Idle);

    let summary = manager.summary("สมชาย", &time).unwrap();
    assert_eq!(summary.total_fines, Money::ZERO);
    assert_eq!(summary.remaining_with_fines, Money::from_major(75_000));

    // deleting a debtor removes their payments and keeps everyone else's
    let report = manager.delete_debtor(&mut session, "สมชาย", &time).unwrap();
    assert_eq!(report.payments_removed, 1);
    let customers = fs::read_to_string(dir.path().join("customers.csv")).unwrap();
    assert!(!customers.contains("สมชาย"));
    let pay = fs::read_to_string(dir.path().join("pay.csv")).unwrap();
    assert_eq!(pay.lines().count(), 2);
    assert!(pay.contains("สมศรี"));

    let history = manager.payment_history("สมศรี", &time).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn test_edit_of_row_changed_on_disk_is_rejected() {
    let dir = TempDir::new().unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 5, 2, 8, 0, 0).unwrap(),
    ));
    let mut manager = open_manager(&dir);
    let mut session = SessionContext::new();

    manager.add_debtor("สมชาย", Money::from_major(100_000), &time).unwrap();
    let payment = Payment::new("สมชาย", day(2025, 5, 1), Money::from_major(500), "");
    manager.record_payment(&mut session, payment.clone(), &time).unwrap();
    manager.begin_edit(&mut session, &payment).unwrap();

    // someone else corrects the amount in the file
    let path = dir.path().join("pay.csv");
    let pay = fs::read_to_string(&path).unwrap().replace(",500,", ",700,");
    fs::write(&path, pay).unwrap();
    manager.refresh(&time).unwrap();

    let result = manager.submit_edit(
        &mut session,
        &PaymentEdit {
            paid_on: day(2025, 5, 1),
            amount: Money::from_major(900),
            note: String::new(),
        },
        &time,
    );
    assert!(matches!(result, Err(LedgerError::RecordNotFound { .. })));
    assert_eq!(session.edit.phase(), EditPhase::Rejected);

    let history = manager.payment_history("สมชาย", &time).unwrap();
    assert_eq!(history[0].amount, Money::from_major(700));
}

#[test]
fn test_open_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let result = CsvTableStore::open(dir.path().join("missing"));
    assert!(matches!(result, Err(LedgerError::StoreUnavailable { .. })));
}
