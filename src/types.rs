use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// storage format for payment dates
pub const DATE_CELL_FORMAT: &str = "%Y-%m-%d";

/// a person owing money to the village fund
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debtor {
    /// display rank, renumbered 1..N on every load
    pub sequence_number: u32,
    /// unique name; the only key payments refer to
    pub name: String,
    pub total_loan: Money,
}

/// one recorded transfer from a debtor
///
/// Payments carry no identifier. Two payments are the same record when all
/// four fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payer_name: String,
    pub paid_on: NaiveDate,
    pub amount: Money,
    /// empty when no note was given
    pub note: String,
}

impl Payment {
    pub fn new(
        payer_name: impl Into<String>,
        paid_on: NaiveDate,
        amount: Money,
        note: impl Into<String>,
    ) -> Self {
        Self {
            payer_name: payer_name.into(),
            paid_on,
            amount,
            note: note.into(),
        }
    }

    /// paid-on date as stored in the payment table
    pub fn date_cell(&self) -> String {
        self.paid_on.format(DATE_CELL_FORMAT).to_string()
    }

    pub fn note(&self) -> Option<&str> {
        if self.note.is_empty() {
            None
        } else {
            Some(&self.note)
        }
    }

    pub fn is_from(&self, name: &str) -> bool {
        self.payer_name == name
    }
}

/// replacement values for an edited payment; the payer never changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEdit {
    pub paid_on: NaiveDate,
    pub amount: Money,
    pub note: String,
}

impl PaymentEdit {
    pub fn apply_to(&self, payment: &Payment) -> Payment {
        Payment {
            payer_name: payment.payer_name.clone(),
            paid_on: self.paid_on,
            amount: self.amount,
            note: self.note.clone(),
        }
    }
}
