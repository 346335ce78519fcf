/// edit flow - correct a payment, then watch a stale edit get rejected
use debt_ledger_rs::chrono::NaiveDate;
use debt_ledger_rs::{
    DebtManager, LedgerConfig, LedgerError, MemoryTableStore, Money, Payment, PaymentEdit,
    SafeTimeProvider, SessionContext, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== edit flow example ===\n");

    let mut store = MemoryTableStore::new();
    store.insert("customers", Vec::new());
    store.insert("pay", Vec::new());
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut manager = DebtManager::new(store, LedgerConfig::village_default("data"))?;
    let mut session = SessionContext::new();

    let day = NaiveDate::from_ymd_opt(2025, 5, 1).ok_or("bad date")?;
    manager.add_debtor("สมชาย", Money::from_major(100_000), &time)?;
    let payment = Payment::new("สมชาย", day, Money::from_major(500), "");
    manager.record_payment(&mut session, payment.clone(), &time)?;

    // typo: it was 5,000 not 500
    let ticket = manager.begin_edit(&mut session, &payment)?;
    println!("editing with ticket {}", ticket);
    let fixed = manager.submit_edit(
        &mut session,
        &PaymentEdit {
            paid_on: day,
            amount: Money::from_major(5_000),
            note: "แก้ไขยอด".to_string(),
        },
        &time,
    )?;
    println!("updated to {} ({:?})", fixed.amount.format_grouped(2), session.edit.phase());

    // an edit of the old values no longer finds its row
    match manager.begin_edit(&mut session, &payment) {
        Err(LedgerError::RecordNotFound { .. }) => {
            println!("the 500 baht row is gone, reload the history and retry")
        }
        other => println!("unexpected: {:?}", other),
    }

    for event in manager.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
