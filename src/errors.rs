use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;
use crate::session::EditPhase;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("store unavailable at {location}: {message}")]
    StoreUnavailable {
        location: String,
        message: String,
    },

    #[error("table not found: {table}")]
    TableNotFound {
        table: String,
    },

    #[error("table '{table}' is missing required columns: {} (expected: {})", .missing.join(", "), .expected.join(", "))]
    SchemaMismatch {
        table: String,
        missing: Vec<String>,
        expected: Vec<String>,
    },

    #[error("debtor already exists: {name}")]
    DuplicateDebtor {
        name: String,
    },

    #[error("debtor not found: {name}")]
    DebtorNotFound {
        name: String,
    },

    #[error("debtor name must not be blank")]
    BlankDebtorName,

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("payment record not found: {payer} paid {amount} on {paid_on}")]
    RecordNotFound {
        payer: String,
        paid_on: NaiveDate,
        amount: Money,
    },

    #[error("write to table '{table}' failed: {message}")]
    WriteFailed {
        table: String,
        message: String,
    },

    #[error("debtor '{debtor}' was removed but payment cleanup failed, payments may remain: {source}")]
    CascadeIncomplete {
        debtor: String,
        source: Box<LedgerError>,
    },

    #[error("cannot {action} while edit is {phase:?}")]
    InvalidEditTransition {
        phase: EditPhase,
        action: &'static str,
    },

    #[error("no payment has been recorded in this session")]
    NoRecentPayment,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// how a failure should be surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// configuration, store reachability, missing table or column
    Access,
    /// malformed stored data that could not be coerced
    Data,
    /// edit target vanished; reload and retry
    RecordNotFound,
    /// store write failed; state may diverge until reload
    Write,
    /// rejected user input
    Input,
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::InvalidConfiguration { .. }
            | LedgerError::StoreUnavailable { .. }
            | LedgerError::TableNotFound { .. }
            | LedgerError::SchemaMismatch { .. }
            | LedgerError::Io(_)
            | LedgerError::Json(_) => ErrorCategory::Access,
            LedgerError::Csv(_) => ErrorCategory::Data,
            LedgerError::RecordNotFound { .. } => ErrorCategory::RecordNotFound,
            LedgerError::WriteFailed { .. } | LedgerError::CascadeIncomplete { .. } => {
                ErrorCategory::Write
            }
            LedgerError::DuplicateDebtor { .. }
            | LedgerError::DebtorNotFound { .. }
            | LedgerError::BlankDebtorName
            | LedgerError::InvalidAmount { .. }
            | LedgerError::InvalidEditTransition { .. }
            | LedgerError::NoRecentPayment => ErrorCategory::Input,
        }
    }

    /// only a vanished record is worth retrying after a reload
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::RecordNotFound
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
