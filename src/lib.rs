pub mod cache;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod manager;
pub mod receipt;
pub mod schedule;
pub mod session;
pub mod store;
pub mod types;
pub mod views;

// re-export key types
pub use config::{LedgerConfig, ReceiptConfig, ScheduleConfig, TableLayout};
pub use decimal::{Money, Rate};
pub use errors::{ErrorCategory, LedgerError, Result};
pub use events::{EventStore, LedgerEvent};
pub use ledger::{parse_payment_date, Ledger};
pub use manager::{DebtManager, DeletionReport};
pub use receipt::{Receipt, ReceiptDocument, ReceiptKind};
pub use schedule::{
    calculate_yearly_summary, DebtCalculator, DebtPeriod, FineStatus, PeriodSummary,
    YearlySummary,
};
pub use session::{EditFlow, EditPhase, SessionContext};
pub use store::{CsvTableStore, MemoryTableStore, TableStore};
pub use types::{Debtor, Payment, PaymentEdit};
pub use views::{history_to_json_pretty, DebtorSummaryView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
