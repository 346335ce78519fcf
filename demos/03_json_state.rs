/// json state - dump summaries and history for scripting
use debt_ledger_rs::chrono::NaiveDate;
use debt_ledger_rs::{
    history_to_json_pretty, DebtManager, DebtorSummaryView, LedgerConfig, MemoryTableStore,
    Money, Payment, SafeTimeProvider, SessionContext, TimeSource,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 3, 6, 0, 0, 0).unwrap(),
    ));

    let mut store = MemoryTableStore::new();
    store.insert("customers", Vec::new());
    store.insert("pay", Vec::new());
    let config = LedgerConfig::village_default("data");
    println!("config:\n{}\n", config.to_json_pretty()?);

    let mut manager = DebtManager::new(store, config)?;
    let mut session = SessionContext::new();

    manager.add_debtor("สมชาย", Money::from_major(100_000), &time)?;
    manager.add_debtor("สมศรี", Money::from_major(50_000), &time)?;
    let day = NaiveDate::from_ymd_opt(2025, 9, 15).ok_or("bad date")?;
    manager.record_payment(
        &mut session,
        Payment::new("สมศรี", day, Money::from_major(12_500), "โอน"),
        &time,
    )?;

    let views: Vec<DebtorSummaryView> = manager
        .summaries(&time)?
        .iter()
        .map(|(debtor, summary)| DebtorSummaryView::new(debtor, summary))
        .collect();
    println!("summaries:\n{}\n", serde_json::to_string_pretty(&views)?);

    let history = manager.payment_history("สมศรี", &time)?;
    println!("history:\n{}", history_to_json_pretty(&history)?);

    Ok(())
}
