/// quick start - add a debtor, record a payment, print the receipt
use debt_ledger_rs::chrono::NaiveDate;
use debt_ledger_rs::{
    DebtManager, LedgerConfig, MemoryTableStore, Money, Payment, SafeTimeProvider,
    SessionContext, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = MemoryTableStore::new();
    store.insert("customers", Vec::new());
    store.insert("pay", Vec::new());

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut manager = DebtManager::new(store, LedgerConfig::village_default("data"))?;
    let mut session = SessionContext::new();

    // a 100,000 baht loan repaid over four yearly periods
    manager.add_debtor("สมชาย", Money::from_major(100_000), &time)?;

    let paid_on = NaiveDate::from_ymd_opt(2025, 6, 1).ok_or("bad date")?;
    manager.record_payment(
        &mut session,
        Payment::new("สมชาย", paid_on, Money::from_major(5_000), "เงินสด"),
        &time,
    )?;

    let receipt = manager.receipt_for_latest(&session, &time)?;
    println!("{}\n", receipt.file_name);
    println!("{}", receipt.body);

    Ok(())
}
