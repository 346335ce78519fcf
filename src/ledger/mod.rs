pub mod dates;
pub mod matching;

pub use dates::parse_payment_date;
pub use matching::{
    locate_payment, new_payment_row, replacement_row, retain_payments_not_from,
    PaymentColumnIndex,
};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::TableLayout;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::store::Table;
use crate::types::{Debtor, Payment};

/// every debtor and every payment with a readable date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    debtors: Vec<Debtor>,
    payments: Vec<Payment>,
    /// payment rows left out because their date could not be read
    skipped_payment_rows: usize,
}

impl Ledger {
    pub fn new(debtors: Vec<Debtor>, payments: Vec<Payment>) -> Self {
        Self {
            debtors,
            payments,
            skipped_payment_rows: 0,
        }
    }

    /// build from loaded tables; both tables must already carry the layout's
    /// columns
    pub fn from_tables(debtors: &Table, payments: &Table, layout: &TableLayout) -> Result<Self> {
        let debtors = read_debtors(debtors, layout)?;
        let (payments, skipped) = read_payments(payments, layout)?;
        if skipped > 0 {
            warn!(skipped, "dropped payment rows with unreadable dates");
        }
        debug!(
            debtors = debtors.len(),
            payments = payments.len(),
            "ledger loaded"
        );
        Ok(Self {
            debtors,
            payments,
            skipped_payment_rows: skipped,
        })
    }

    pub fn debtors(&self) -> &[Debtor] {
        &self.debtors
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn skipped_payment_rows(&self) -> usize {
        self.skipped_payment_rows
    }

    pub fn debtor(&self, name: &str) -> Option<&Debtor> {
        self.debtors.iter().find(|d| d.name == name)
    }

    pub fn require_debtor(&self, name: &str) -> Result<&Debtor> {
        self.debtor(name).ok_or_else(|| LedgerError::DebtorNotFound {
            name: name.to_string(),
        })
    }

    /// payments by this debtor in table order
    pub fn payments_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Payment> + 'a {
        self.payments.iter().filter(move |p| p.is_from(name))
    }

    /// payments by this debtor, most recent first
    pub fn history(&self, name: &str) -> Vec<Payment> {
        let mut history: Vec<Payment> = self.payments_of(name).cloned().collect();
        history.sort_by(|a, b| b.paid_on.cmp(&a.paid_on));
        history
    }

    /// the payment shown first in a debtor's history
    pub fn latest_payment(&self, name: &str) -> Option<Payment> {
        self.history(name).into_iter().next()
    }

    /// add a debtor after the current last one
    pub fn add_debtor(&mut self, name: &str, total_loan: Money) -> Result<&Debtor> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::BlankDebtorName);
        }
        if total_loan.is_negative() {
            return Err(LedgerError::InvalidAmount { amount: total_loan });
        }
        if self.debtor(name).is_some() {
            return Err(LedgerError::DuplicateDebtor {
                name: name.to_string(),
            });
        }

        let sequence_number = self
            .debtors
            .iter()
            .map(|d| d.sequence_number)
            .max()
            .unwrap_or(0)
            + 1;
        self.debtors.push(Debtor {
            sequence_number,
            name: name.to_string(),
            total_loan,
        });
        Ok(&self.debtors[self.debtors.len() - 1])
    }

    /// change a debtor's loan, returning the previous amount
    pub fn set_loan(&mut self, name: &str, total_loan: Money) -> Result<Money> {
        if total_loan.is_negative() {
            return Err(LedgerError::InvalidAmount { amount: total_loan });
        }
        let debtor = self
            .debtors
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| LedgerError::DebtorNotFound {
                name: name.to_string(),
            })?;
        Ok(std::mem::replace(&mut debtor.total_loan, total_loan))
    }

    /// remove every debtor row with this name and every payment they made,
    /// then renumber the rest 1..N
    pub fn remove_debtor(&mut self, name: &str) -> Result<Debtor> {
        let position = self
            .debtors
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| LedgerError::DebtorNotFound {
                name: name.to_string(),
            })?;
        let removed = self.debtors.remove(position);
        self.debtors.retain(|d| d.name != name);
        renumber(&mut self.debtors);
        self.payments.retain(|p| !p.is_from(name));
        Ok(removed)
    }

    /// check a payment before it is written
    pub fn validate_payment(&self, payment: &Payment) -> Result<()> {
        self.require_debtor(&payment.payer_name)?;
        if payment.amount.is_negative() {
            return Err(LedgerError::InvalidAmount {
                amount: payment.amount,
            });
        }
        Ok(())
    }

    /// debtor table rows in column order
    pub fn debtor_rows(&self) -> Vec<Vec<String>> {
        self.debtors
            .iter()
            .map(|d| {
                vec![
                    d.sequence_number.to_string(),
                    d.name.clone(),
                    d.total_loan.to_cell(),
                ]
            })
            .collect()
    }
}

fn read_debtors(table: &Table, layout: &TableLayout) -> Result<Vec<Debtor>> {
    let columns = &layout.debtor_columns;
    let (sequence, name, total_loan) = match (
        table.column(&columns.sequence),
        table.column(&columns.name),
        table.column(&columns.total_loan),
    ) {
        (Some(s), Some(n), Some(l)) => (s, n, l),
        _ => {
            return Err(LedgerError::SchemaMismatch {
                table: table.name.clone(),
                missing: table.missing_columns(&columns.ordered()),
                expected: columns.ordered(),
            })
        }
    };

    let mut debtors: Vec<Debtor> = (0..table.len())
        .map(|row| Debtor {
            sequence_number: parse_sequence(&table.cell(row, sequence)),
            name: table.cell(row, name),
            total_loan: Money::coerce(&table.cell(row, total_loan)),
        })
        .collect();

    // stable sort keeps table order among equal or unreadable numbers
    debtors.sort_by_key(|d| d.sequence_number);
    renumber(&mut debtors);
    Ok(debtors)
}

fn renumber(debtors: &mut [Debtor]) {
    for (position, debtor) in debtors.iter_mut().enumerate() {
        debtor.sequence_number = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }
}

fn read_payments(table: &Table, layout: &TableLayout) -> Result<(Vec<Payment>, usize)> {
    let index = PaymentColumnIndex::resolve(table, &layout.payment_columns)?;
    let mut payments = Vec::with_capacity(table.len());
    let mut skipped = 0;

    for row in 0..table.len() {
        let raw_date = table.cell(row, index.paid_on);
        let Some(paid_on) = parse_payment_date(&raw_date) else {
            debug!(row = row + 2, date = %raw_date, "skipping payment with unreadable date");
            skipped += 1;
            continue;
        };
        payments.push(Payment {
            payer_name: table.cell(row, index.payer),
            paid_on,
            amount: Money::coerce(&table.cell(row, index.amount)),
            note: table.cell(row, index.note),
        });
    }
    Ok((payments, skipped))
}

/// sequence cell as a whole number; anything unreadable sorts first as 0
fn parse_sequence(cell: &str) -> u32 {
    Decimal::from_str(cell)
        .ok()
        .and_then(|d| d.trunc().to_u32())
        .unwrap_or(0)
}
