use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // debtor events
    DebtorAdded {
        name: String,
        sequence_number: u32,
        total_loan: Money,
        timestamp: DateTime<Utc>,
    },
    LoanAmountChanged {
        name: String,
        old_amount: Money,
        new_amount: Money,
        timestamp: DateTime<Utc>,
    },
    DebtorDeleted {
        name: String,
        timestamp: DateTime<Utc>,
    },
    PaymentsCascadeDeleted {
        debtor: String,
        rows_removed: usize,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        payer: String,
        paid_on: NaiveDate,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentEdited {
        ticket: Uuid,
        payer: String,
        row: usize,
        old_amount: Money,
        new_amount: Money,
        old_date: NaiveDate,
        new_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    EditRejected {
        ticket: Uuid,
        payer: String,
        paid_on: NaiveDate,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LedgerEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        store.emit(LedgerEvent::DebtorDeleted {
            name: "สมชาย".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        });
        assert_eq!(store.events().len(), 1);
        assert_eq!(store.take_events().len(), 1);
        assert!(store.events().is_empty());
    }
}
