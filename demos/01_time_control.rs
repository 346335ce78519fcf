/// time control - watch fines appear as periods close
use chrono::{Duration, TimeZone, Utc};
use debt_ledger_rs::{
    DebtManager, LedgerConfig, MemoryTableStore, Money, Payment, SafeTimeProvider,
    SessionContext, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let mut store = MemoryTableStore::new();
    store.insert("customers", Vec::new());
    store.insert("pay", Vec::new());
    let mut manager = DebtManager::new(store, LedgerConfig::village_default("data"))?;
    let mut session = SessionContext::new();

    manager.add_debtor("สมศรี", Money::from_major(100_000), &time)?;
    manager.record_payment(
        &mut session,
        Payment::new("สมศรี", time.now().date_naive(), Money::from_major(10_000), ""),
        &time,
    )?;

    // before the first period closes nothing is fined
    print_state(&mut manager, &time)?;

    // into the second period, 6 april 2026
    controller.advance(Duration::days(361));
    print_state(&mut manager, &time)?;

    // later payments count toward the second period; the first fine stays
    manager.record_payment(
        &mut session,
        Payment::new("สมศรี", time.now().date_naive(), Money::from_major(15_000), "ชำระส่วนขาด"),
        &time,
    )?;
    print_state(&mut manager, &time)?;

    // two years on
    controller.advance(Duration::days(730));
    print_state(&mut manager, &time)?;

    Ok(())
}

fn print_state(
    manager: &mut DebtManager<MemoryTableStore>,
    time: &SafeTimeProvider,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = manager.summary("สมศรี", time)?;
    println!("as of {}", summary.evaluated_on.format("%Y-%m-%d"));
    for period in &summary.periods {
        println!(
            "  {} paid {:>8} short {:>8} {} {}",
            period.label,
            period.paid.format_grouped(0),
            period.shortfall.format_grouped(0),
            period.fine_status.symbol(),
            period.fine_status
        );
    }
    println!(
        "  fines {}  remaining {}\n",
        summary.total_fines.format_grouped(2),
        summary.remaining_with_fines.format_grouped(2)
    );
    Ok(())
}
