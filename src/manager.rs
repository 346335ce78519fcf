use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::SnapshotCache;
use crate::config::{LedgerConfig, TableLayout};
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{EventStore, LedgerEvent};
use crate::ledger::{
    locate_payment, new_payment_row, replacement_row, retain_payments_not_from, Ledger,
    PaymentColumnIndex,
};
use crate::receipt::{Receipt, ReceiptDocument, ReceiptKind};
use crate::schedule::{DebtCalculator, YearlySummary};
use crate::session::{EditPhase, SessionContext};
use crate::store::{load_table, save_table, Table, TableStore};
use crate::types::{Debtor, Payment, PaymentEdit};

/// outcome of deleting a debtor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub debtor: Debtor,
    pub payments_removed: usize,
}

/// runs every user action against a table store
///
/// Reads go through a snapshot cache; every write, successful or not,
/// invalidates it. Mutations always start from a fresh read of the store.
pub struct DebtManager<S: TableStore> {
    store: S,
    pub config: LedgerConfig,
    calculator: DebtCalculator,
    cache: SnapshotCache<Ledger>,
    pub events: EventStore,
}

impl<S: TableStore> DebtManager<S> {
    pub fn new(store: S, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        let calculator = DebtCalculator::new(config.schedule.clone())?;
        let cache = SnapshotCache::new(config.cache_ttl_seconds);
        Ok(Self {
            store,
            config,
            calculator,
            cache,
            events: EventStore::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.cache.invalidate();
        &mut self.store
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        self.events.take_events()
    }

    /// current ledger, from the cache when fresh
    pub fn ledger(&mut self, time: &SafeTimeProvider) -> Result<&Ledger> {
        cached_ledger(&mut self.cache, &self.store, &self.config.tables, time)
    }

    /// drop the cache and read the store again
    pub fn refresh(&mut self, time: &SafeTimeProvider) -> Result<&Ledger> {
        self.cache.invalidate();
        self.ledger(time)
    }

    /// add a debtor numbered after the current last one
    pub fn add_debtor(
        &mut self,
        name: &str,
        total_loan: Money,
        time: &SafeTimeProvider,
    ) -> Result<Debtor> {
        let mut ledger = read_ledger(&self.store, &self.config.tables)?;
        let debtor = ledger.add_debtor(name, total_loan)?.clone();
        self.save_debtors(&ledger)?;

        info!(name = %debtor.name, sequence = debtor.sequence_number, "debtor added");
        self.events.emit(LedgerEvent::DebtorAdded {
            name: debtor.name.clone(),
            sequence_number: debtor.sequence_number,
            total_loan: debtor.total_loan,
            timestamp: time.now(),
        });
        Ok(debtor)
    }

    /// change a debtor's total loan, returning the previous amount
    pub fn update_loan(
        &mut self,
        name: &str,
        total_loan: Money,
        time: &SafeTimeProvider,
    ) -> Result<Money> {
        let mut ledger = read_ledger(&self.store, &self.config.tables)?;
        let old_amount = ledger.set_loan(name, total_loan)?;
        self.save_debtors(&ledger)?;

        info!(name, %old_amount, new_amount = %total_loan, "loan amount changed");
        self.events.emit(LedgerEvent::LoanAmountChanged {
            name: name.to_string(),
            old_amount,
            new_amount: total_loan,
            timestamp: time.now(),
        });
        Ok(old_amount)
    }

    /// remove a debtor, then every payment row they made
    ///
    /// The debtor table is written first. If that write fails nothing has
    /// changed. If the payment write fails afterwards the debtor is gone but
    /// their payments remain, reported as [`LedgerError::CascadeIncomplete`].
    pub fn delete_debtor(
        &mut self,
        session: &mut SessionContext,
        name: &str,
        time: &SafeTimeProvider,
    ) -> Result<DeletionReport> {
        let layout = &self.config.tables;
        let mut ledger = read_ledger(&self.store, layout)?;
        let payments = load_table(
            &self.store,
            &layout.payments_table,
            &layout.payment_columns.ordered(),
        )?;
        let index = PaymentColumnIndex::resolve(&payments, &layout.payment_columns)?;

        let debtor = ledger.remove_debtor(name)?;
        self.save_debtors(&ledger)?;
        session.forget_debtor(name);
        self.events.emit(LedgerEvent::DebtorDeleted {
            name: name.to_string(),
            timestamp: time.now(),
        });

        let (kept, removed) = retain_payments_not_from(&payments, &index, name);
        if removed > 0 {
            let remaining = Table {
                rows: kept,
                ..payments
            };
            let written = self
                .store
                .write_values(&remaining.name, &remaining.to_values());
            self.cache.invalidate();
            if let Err(source) = written {
                warn!(name, error = %source, "payment cleanup failed after debtor removal");
                return Err(LedgerError::CascadeIncomplete {
                    debtor: name.to_string(),
                    source: Box::new(source),
                });
            }
            self.events.emit(LedgerEvent::PaymentsCascadeDeleted {
                debtor: name.to_string(),
                rows_removed: removed,
                timestamp: time.now(),
            });
        } else {
            debug!(name, "debtor had no payment rows");
        }

        info!(name, payments_removed = removed, "debtor deleted");
        Ok(DeletionReport {
            debtor,
            payments_removed: removed,
        })
    }

    /// append a payment row; it becomes the session's pending receipt
    pub fn record_payment(
        &mut self,
        session: &mut SessionContext,
        payment: Payment,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        let layout = &self.config.tables;
        read_ledger(&self.store, layout)?.validate_payment(&payment)?;

        let table = load_table(
            &self.store,
            &layout.payments_table,
            &layout.payment_columns.ordered(),
        )?;
        let index = PaymentColumnIndex::resolve(&table, &layout.payment_columns)?;
        let row = new_payment_row(&table, &index, &payment);

        let written = if table.persisted {
            self.store.append_row(&table.name, &row)
        } else {
            // the table has no header yet
            save_table(&mut self.store, &table.name, &table.header, &[row])
        };
        self.cache.invalidate();
        written?;

        info!(payer = %payment.payer_name, paid_on = %payment.paid_on, amount = %payment.amount, "payment recorded");
        self.events.emit(LedgerEvent::PaymentRecorded {
            payer: payment.payer_name.clone(),
            paid_on: payment.paid_on,
            amount: payment.amount,
            timestamp: time.now(),
        });
        session.select(payment.payer_name.clone());
        session.pending_receipt = Some(payment);
        Ok(())
    }

    /// a debtor's payments, most recent first
    pub fn payment_history(&mut self, name: &str, time: &SafeTimeProvider) -> Result<Vec<Payment>> {
        let ledger = self.ledger(time)?;
        ledger.require_debtor(name)?;
        Ok(ledger.history(name))
    }

    /// a debtor's yearly summary as of the provider's current day
    pub fn summary(&mut self, name: &str, time: &SafeTimeProvider) -> Result<YearlySummary> {
        let today = today(time);
        let ledger = cached_ledger(&mut self.cache, &self.store, &self.config.tables, time)?;
        let debtor = ledger.require_debtor(name)?;
        Ok(self
            .calculator
            .summarize(name, debtor.total_loan, ledger.payments(), today))
    }

    /// every debtor with their summary, in sequence order
    pub fn summaries(&mut self, time: &SafeTimeProvider) -> Result<Vec<(Debtor, YearlySummary)>> {
        let today = today(time);
        let ledger = cached_ledger(&mut self.cache, &self.store, &self.config.tables, time)?;
        Ok(ledger
            .debtors()
            .iter()
            .map(|debtor| {
                let summary = self.calculator.summarize(
                    &debtor.name,
                    debtor.total_loan,
                    ledger.payments(),
                    today,
                );
                (debtor.clone(), summary)
            })
            .collect())
    }

    /// locate `payment` in the store and open an edit for it
    ///
    /// Fails with [`LedgerError::RecordNotFound`] when no row holds exactly
    /// this payment; the caller should reload.
    pub fn begin_edit(&mut self, session: &mut SessionContext, payment: &Payment) -> Result<Uuid> {
        if session.edit.phase() != EditPhase::Idle {
            return Err(LedgerError::InvalidEditTransition {
                phase: session.edit.phase(),
                action: "begin an edit",
            });
        }
        let (table, index) = self.payment_table()?;
        let row = locate_payment(&table, &index, payment).ok_or_else(|| not_found(payment))?;
        let pending = session.edit.begin(payment.clone(), row)?;
        debug!(ticket = %pending.ticket, row, "edit started");
        Ok(pending.ticket)
    }

    /// locate the edited payment again and overwrite its row
    ///
    /// If the row has vanished the edit moves to `Rejected` and nothing is
    /// written.
    pub fn submit_edit(
        &mut self,
        session: &mut SessionContext,
        edit: &PaymentEdit,
        time: &SafeTimeProvider,
    ) -> Result<Payment> {
        let pending = match (session.edit.phase(), session.edit.pending()) {
            (EditPhase::Editing, Some(pending)) => pending.clone(),
            (phase, _) => {
                return Err(LedgerError::InvalidEditTransition {
                    phase,
                    action: "submit",
                })
            }
        };
        if edit.amount.is_negative() {
            return Err(LedgerError::InvalidAmount {
                amount: edit.amount,
            });
        }

        let (table, index) = self.payment_table()?;
        let Some(row) = locate_payment(&table, &index, &pending.original) else {
            session.edit.reject()?;
            self.cache.invalidate();
            warn!(ticket = %pending.ticket, "edited payment no longer in store");
            self.events.emit(LedgerEvent::EditRejected {
                ticket: pending.ticket,
                payer: pending.original.payer_name.clone(),
                paid_on: pending.original.paid_on,
                amount: pending.original.amount,
                timestamp: time.now(),
            });
            return Err(not_found(&pending.original));
        };

        session.edit.submit()?;
        let updated = edit.apply_to(&pending.original);
        let written = self.store.update_row(
            &table.name,
            row,
            &replacement_row(&table, &index, row, &updated),
        );
        session.edit.finish()?;
        self.cache.invalidate();
        written?;

        if session.pending_receipt.as_ref() == Some(&pending.original) {
            session.pending_receipt = Some(updated.clone());
        }
        info!(ticket = %pending.ticket, row, "payment edited");
        self.events.emit(LedgerEvent::PaymentEdited {
            ticket: pending.ticket,
            payer: updated.payer_name.clone(),
            row,
            old_amount: pending.original.amount,
            new_amount: updated.amount,
            old_date: pending.original.paid_on,
            new_date: updated.paid_on,
            timestamp: time.now(),
        });
        Ok(updated)
    }

    pub fn cancel_edit(&mut self, session: &mut SessionContext) -> Result<()> {
        let pending = session.edit.cancel()?;
        debug!(ticket = %pending.ticket, "edit cancelled");
        Ok(())
    }

    pub fn acknowledge_rejection(&mut self, session: &mut SessionContext) -> Result<()> {
        session.edit.acknowledge_rejection()
    }

    /// receipt for the payment most recently recorded in this session
    pub fn receipt_for_latest(
        &mut self,
        session: &SessionContext,
        time: &SafeTimeProvider,
    ) -> Result<ReceiptDocument> {
        let payment = session
            .pending_receipt
            .clone()
            .ok_or(LedgerError::NoRecentPayment)?;
        self.receipt(payment, ReceiptKind::Latest, time)
    }

    /// receipt for any row of a debtor's history
    pub fn receipt_for_payment(
        &mut self,
        payment: &Payment,
        time: &SafeTimeProvider,
    ) -> Result<ReceiptDocument> {
        self.receipt(payment.clone(), ReceiptKind::Historical, time)
    }

    fn receipt(
        &mut self,
        payment: Payment,
        kind: ReceiptKind,
        time: &SafeTimeProvider,
    ) -> Result<ReceiptDocument> {
        let summary = self.summary(&payment.payer_name, time)?;
        Ok(Receipt::new(payment, &summary).to_document(&self.config.receipt, kind))
    }

    fn payment_table(&self) -> Result<(Table, PaymentColumnIndex)> {
        let layout = &self.config.tables;
        let table = load_table(
            &self.store,
            &layout.payments_table,
            &layout.payment_columns.ordered(),
        )?;
        let index = PaymentColumnIndex::resolve(&table, &layout.payment_columns)?;
        Ok((table, index))
    }

    fn save_debtors(&mut self, ledger: &Ledger) -> Result<()> {
        let layout = &self.config.tables;
        let written = save_table(
            &mut self.store,
            &layout.debtors_table,
            &layout.debtor_columns.ordered(),
            &ledger.debtor_rows(),
        );
        self.cache.invalidate();
        written
    }
}

fn today(time: &SafeTimeProvider) -> NaiveDate {
    time.now().date_naive()
}

fn not_found(payment: &Payment) -> LedgerError {
    LedgerError::RecordNotFound {
        payer: payment.payer_name.clone(),
        paid_on: payment.paid_on,
        amount: payment.amount,
    }
}

fn read_ledger<S: TableStore>(store: &S, layout: &TableLayout) -> Result<Ledger> {
    let debtors = load_table(store, &layout.debtors_table, &layout.debtor_columns.ordered())?;
    let payments = load_table(store, &layout.payments_table, &layout.payment_columns.ordered())?;
    Ledger::from_tables(&debtors, &payments, layout)
}

fn cached_ledger<'a, S: TableStore>(
    cache: &'a mut SnapshotCache<Ledger>,
    store: &S,
    layout: &TableLayout,
    time: &SafeTimeProvider,
) -> Result<&'a Ledger> {
    cache.get_or_try_load(time.now(), || read_ledger(store, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTableStore;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap(),
        ))
    }

    fn seeded_store() -> MemoryTableStore {
        let mut store = MemoryTableStore::new();
        store.insert(
            "customers",
            vec![
                row(&["ลำดับที่", "ชื่อ", "รวมเงินกู้ทั้งหมด"]),
                row(&["1", "สมชาย", "100000"]),
                row(&["2", "สมศรี", "50,000"]),
            ],
        );
        store.insert(
            "pay",
            vec![
                row(&["ผู้จ่าย", "วันที่จ่าย", "จำนวน", "หมายเหตุ"]),
                row(&["สมศรี", "2025-05-01", "1,000", ""]),
                row(&["สมชาย", "2025-05-01", "500", ""]),
                row(&["สมศรี", "05/02/2025", "2000", "โอน"]),
                row(&["สมชาย", "2025-05-01", "700", ""]),
            ],
        );
        store
    }

    fn manager(store: MemoryTableStore) -> DebtManager<MemoryTableStore> {
        DebtManager::new(store, LedgerConfig::village_default("unused")).unwrap()
    }

    fn payment(payer: &str, on: NaiveDate, amount: i64, note: &str) -> Payment {
        Payment::new(payer, on, Money::from_major(amount), note)
    }

    #[test]
    fn test_add_debtor_rewrites_numbered_table() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let added = manager.add_debtor("มานี", Money::from_major(20_000), &time).unwrap();
        assert_eq!(added.sequence_number, 3);

        let customers = manager.store().table("customers").unwrap();
        assert_eq!(customers.last().unwrap(), &row(&["3", "มานี", "20000"]));
        assert_eq!(customers[2], row(&["2", "สมศรี", "50000"]));
        assert!(matches!(
            manager.take_events().as_slice(),
            [LedgerEvent::DebtorAdded { sequence_number: 3, .. }]
        ));
    }

    #[test]
    fn test_duplicate_debtor_writes_nothing() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let before = manager.store().table("customers").unwrap().clone();
        assert!(matches!(
            manager.add_debtor("สมชาย", Money::ZERO, &time),
            Err(LedgerError::DuplicateDebtor { .. })
        ));
        assert_eq!(manager.store().table("customers").unwrap(), &before);
        assert!(manager.events.events().is_empty());
    }

    #[test]
    fn test_update_loan() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let old = manager.update_loan("สมศรี", Money::from_major(60_000), &time).unwrap();
        assert_eq!(old, Money::from_major(50_000));
        let summary = manager.summary("สมศรี", &time).unwrap();
        assert_eq!(summary.total_loan, Money::from_major(60_000));
    }

    #[test]
    fn test_record_payment_appends_and_prints_latest() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let mut session = SessionContext::new();

        let paid = payment("สมชาย", date(2025, 6, 1), 24_300, "งวดแรก");
        manager.record_payment(&mut session, paid.clone(), &time).unwrap();

        let pay = manager.store().table("pay").unwrap();
        assert_eq!(pay.len(), 6);
        assert_eq!(pay[5], row(&["สมชาย", "2025-06-01", "24300", "งวดแรก"]));
        assert_eq!(session.pending_receipt, Some(paid));
        assert_eq!(session.selected_debtor.as_deref(), Some("สมชาย"));

        let receipt = manager.receipt_for_latest(&session, &time).unwrap();
        assert_eq!(receipt.file_name, "ใบเสร็จ_สมชาย_20250601.txt");
        // 500 + 700 + 24,300
        assert!(receipt.body.contains("25,500.00 บาท"));
        assert!(receipt.body.contains("74,500.00 บาท"));
    }

    #[test]
    fn test_record_payment_for_unknown_debtor() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let mut session = SessionContext::new();
        let result = manager.record_payment(&mut session, payment("มานี", date(2025, 6, 1), 1, ""), &time);
        assert!(matches!(result, Err(LedgerError::DebtorNotFound { .. })));
        assert_eq!(manager.store().table("pay").unwrap().len(), 5);
        assert!(matches!(
            manager.receipt_for_latest(&session, &time),
            Err(LedgerError::NoRecentPayment)
        ));
    }

    #[test]
    fn test_record_payment_into_empty_table_writes_header() {
        let time = clock(2025, 6, 1);
        let mut store = seeded_store();
        store.insert("pay", Vec::new());
        let mut manager = manager(store);
        let mut session = SessionContext::new();
        manager
            .record_payment(&mut session, payment("สมชาย", date(2025, 6, 1), 100, ""), &time)
            .unwrap();
        let pay = manager.store().table("pay").unwrap();
        assert_eq!(pay[0], row(&["ผู้จ่าย", "วันที่จ่าย", "จำนวน", "หมายเหตุ"]));
        assert_eq!(pay[1], row(&["สมชาย", "2025-06-01", "100", ""]));
    }

    #[test]
    fn test_edit_touches_only_the_matching_row() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let mut session = SessionContext::new();
        let original = payment("สมชาย", date(2025, 5, 1), 700, "");

        manager.begin_edit(&mut session, &original).unwrap();
        assert_eq!(session.edit.phase(), EditPhase::Editing);

        let edit = PaymentEdit {
            paid_on: date(2025, 5, 2),
            amount: Money::from_major(750),
            note: "แก้ไข".to_string(),
        };
        let updated = manager.submit_edit(&mut session, &edit, &time).unwrap();
        assert_eq!(updated.payer_name, "สมชาย");
        assert_eq!(session.edit.phase(), EditPhase::Idle);

        let pay = manager.store().table("pay").unwrap();
        assert_eq!(pay[2], row(&["สมชาย", "2025-05-01", "500", ""]));
        assert_eq!(pay[4], row(&["สมชาย", "2025-05-02", "750", "แก้ไข"]));
        assert_eq!(pay[1], row(&["สมศรี", "2025-05-01", "1,000", ""]));
        assert_eq!(pay[3], row(&["สมศรี", "05/02/2025", "2000", "โอน"]));

        let history = manager.payment_history("สมชาย", &time).unwrap();
        assert_eq!(history[0].amount, Money::from_major(750));
    }

    #[test]
    fn test_edit_of_vanished_row_is_rejected() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let mut session = SessionContext::new();
        let original = payment("สมชาย", date(2025, 5, 1), 500, "");
        manager.begin_edit(&mut session, &original).unwrap();

        // another user removes the row in the meantime
        let mut pay = manager.store().table("pay").unwrap().clone();
        pay.remove(2);
        manager.store_mut().insert("pay", pay.clone());

        let edit = PaymentEdit {
            paid_on: date(2025, 5, 1),
            amount: Money::from_major(900),
            note: String::new(),
        };
        let result = manager.submit_edit(&mut session, &edit, &time);
        assert!(matches!(result, Err(LedgerError::RecordNotFound { .. })));
        assert!(result.unwrap_err().is_recoverable());
        assert_eq!(session.edit.phase(), EditPhase::Rejected);
        assert_eq!(manager.store().table("pay").unwrap(), &pay);

        manager.acknowledge_rejection(&mut session).unwrap();
        assert_eq!(session.edit.phase(), EditPhase::Idle);
    }

    #[test]
    fn test_begin_edit_for_unknown_row() {
        let mut manager = manager(seeded_store());
        let mut session = SessionContext::new();
        let missing = payment("สมชาย", date(2025, 5, 1), 501, "");
        assert!(matches!(
            manager.begin_edit(&mut session, &missing),
            Err(LedgerError::RecordNotFound { .. })
        ));
        assert_eq!(session.edit.phase(), EditPhase::Idle);
    }

    #[test]
    fn test_cancel_edit() {
        let mut manager = manager(seeded_store());
        let mut session = SessionContext::new();
        manager
            .begin_edit(&mut session, &payment("สมศรี", date(2025, 5, 2), 2_000, "โอน"))
            .unwrap();
        manager.cancel_edit(&mut session).unwrap();
        assert_eq!(session.edit.phase(), EditPhase::Idle);
        assert!(manager.cancel_edit(&mut session).is_err());
    }

    #[test]
    fn test_delete_cascades_and_keeps_other_rows_in_order() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let mut session = SessionContext::new();
        session.select("สมชาย");

        let report = manager.delete_debtor(&mut session, "สมชาย", &time).unwrap();
        assert_eq!(report.payments_removed, 2);
        assert_eq!(session.selected_debtor, None);

        let customers = manager.store().table("customers").unwrap();
        assert_eq!(
            customers,
            &vec![
                row(&["ลำดับที่", "ชื่อ", "รวมเงินกู้ทั้งหมด"]),
                row(&["1", "สมศรี", "50000"]),
            ]
        );
        let pay = manager.store().table("pay").unwrap();
        assert_eq!(
            pay,
            &vec![
                row(&["ผู้จ่าย", "วันที่จ่าย", "จำนวน", "หมายเหตุ"]),
                row(&["สมศรี", "2025-05-01", "1,000", ""]),
                row(&["สมศรี", "05/02/2025", "2000", "โอน"]),
            ]
        );
        assert_eq!(manager.take_events().len(), 2);
    }

    #[test]
    fn test_failed_payment_cleanup_is_reported() {
        let time = clock(2025, 6, 1);
        let mut store = seeded_store();
        store.reject_writes_to("pay");
        let mut manager = manager(store);
        let mut session = SessionContext::new();

        let err = manager.delete_debtor(&mut session, "สมชาย", &time).unwrap_err();
        assert!(matches!(err, LedgerError::CascadeIncomplete { .. }));
        assert!(manager.ledger(&time).unwrap().debtor("สมชาย").is_none());
        assert_eq!(manager.store().table("pay").unwrap().len(), 5);
    }

    #[test]
    fn test_cache_serves_until_ttl_or_write() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        assert_eq!(manager.ledger(&time).unwrap().debtors().len(), 2);

        // another writer changes the table behind the cache
        let mut customers = manager.store().table("customers").unwrap().clone();
        customers.push(row(&["3", "มานี", "1"]));
        manager.store.insert("customers", customers);
        assert_eq!(manager.ledger(&time).unwrap().debtors().len(), 2);

        time.test_control().unwrap().advance(Duration::hours(1));
        assert_eq!(manager.ledger(&time).unwrap().debtors().len(), 3);

        manager.add_debtor("ปิติ", Money::ZERO, &time).unwrap();
        assert_eq!(manager.ledger(&time).unwrap().debtors().len(), 4);
    }

    #[test]
    fn test_summary_scenarios() {
        let mut store = seeded_store();
        store.insert(
            "pay",
            vec![
                row(&["ผู้จ่าย", "วันที่จ่าย", "จำนวน", "หมายเหตุ"]),
                row(&["สมศรี", "2025-04-05", "12,500", ""]),
            ],
        );
        let mut manager = manager(store);
        let time = clock(2026, 3, 6);

        let missed = manager.summary("สมชาย", &time).unwrap();
        assert_eq!(missed.periods[0].fine(), Money::from_major(3_750));
        assert_eq!(missed.remaining_with_fines, Money::from_major(103_750));

        let met = manager.summary("สมศรี", &time).unwrap();
        assert_eq!(met.periods[0].shortfall, Money::ZERO);
        assert_eq!(met.remaining_with_fines, Money::from_major(37_500));

        assert!(matches!(
            manager.summary("มานี", &time),
            Err(LedgerError::DebtorNotFound { .. })
        ));
    }

    #[test]
    fn test_historical_receipt_name_carries_amount() {
        let time = clock(2025, 6, 1);
        let mut manager = manager(seeded_store());
        let history = manager.payment_history("สมศรี", &time).unwrap();
        let receipt = manager.receipt_for_payment(&history[0], &time).unwrap();
        assert_eq!(receipt.file_name, "ใบเสร็จ_สมศรี_20250502_2000.txt");
        assert!(receipt.body.contains("วันที่ชำระ: 02/05/2025"));
    }

    #[test]
    fn test_missing_column_is_an_access_error() {
        let time = clock(2025, 6, 1);
        let mut store = seeded_store();
        store.insert("pay", vec![row(&["ผู้จ่าย", "วันที่", "จำนวน", "หมายเหตุ"])]);
        let mut manager = manager(store);
        let err = manager.ledger(&time).unwrap_err();
        assert_eq!(err.category(), crate::errors::ErrorCategory::Access);
    }
}
