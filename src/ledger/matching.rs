//! Locating payment rows by value.
//!
//! Payment rows carry no identifier, so a row is found again by scanning the
//! current table top to bottom for the first row whose payer, date, amount and
//! note all equal the payment being edited.

use crate::config::PaymentColumns;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::ledger::dates::same_calendar_day;
use crate::store::{fit_row, normalize_cell, Table};
use crate::types::Payment;

/// header positions of the four payment columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentColumnIndex {
    pub payer: usize,
    pub paid_on: usize,
    pub amount: usize,
    pub note: usize,
}

impl PaymentColumnIndex {
    pub fn resolve(table: &Table, columns: &PaymentColumns) -> Result<Self> {
        let expected = columns.ordered();
        let missing = table.missing_columns(&expected);
        let position = |name: &str| table.column(name);
        match (
            position(&columns.payer),
            position(&columns.paid_on),
            position(&columns.amount),
            position(&columns.note),
        ) {
            (Some(payer), Some(paid_on), Some(amount), Some(note)) => Ok(Self {
                payer,
                paid_on,
                amount,
                note,
            }),
            _ => Err(LedgerError::SchemaMismatch {
                table: table.name.clone(),
                missing,
                expected,
            }),
        }
    }

    fn width(&self) -> usize {
        1 + self.payer.max(self.paid_on).max(self.amount).max(self.note)
    }
}

/// whether data row `row` holds exactly this payment
pub fn row_matches(table: &Table, index: &PaymentColumnIndex, row: usize, payment: &Payment) -> bool {
    table.cell(row, index.payer) == payment.payer_name
        && same_calendar_day(&table.cell(row, index.paid_on), payment.paid_on)
        && Money::coerce(&table.cell(row, index.amount)) == payment.amount
        && table.cell(row, index.note) == normalize_cell(&payment.note)
}

/// first data row holding this payment
pub fn locate_payment(table: &Table, index: &PaymentColumnIndex, payment: &Payment) -> Option<usize> {
    (0..table.len()).find(|&row| row_matches(table, index, row, payment))
}

/// a new data row in header order holding `payment`
pub fn new_payment_row(table: &Table, index: &PaymentColumnIndex, payment: &Payment) -> Vec<String> {
    fill_payment(fit_row(&[], table.header.len().max(index.width())), index, payment)
}

/// the row at `row` with its four payment fields overwritten; cells in any
/// other column are kept
pub fn replacement_row(
    table: &Table,
    index: &PaymentColumnIndex,
    row: usize,
    payment: &Payment,
) -> Vec<String> {
    let current = table.rows.get(row).map(Vec::as_slice).unwrap_or(&[]);
    fill_payment(
        fit_row(current, table.header.len().max(index.width())),
        index,
        payment,
    )
}

fn fill_payment(mut cells: Vec<String>, index: &PaymentColumnIndex, payment: &Payment) -> Vec<String> {
    cells[index.payer] = payment.payer_name.clone();
    cells[index.paid_on] = payment.date_cell();
    cells[index.amount] = payment.amount.to_cell();
    cells[index.note] = payment.note.clone();
    cells
}

/// data rows not paid by `payer`, in their original order and untouched,
/// together with how many rows were dropped
pub fn retain_payments_not_from(
    table: &Table,
    index: &PaymentColumnIndex,
    payer: &str,
) -> (Vec<Vec<String>>, usize) {
    let mut removed = 0;
    let kept = table
        .rows
        .iter()
        .enumerate()
        .filter(|(row, _)| {
            let from_payer = table.cell(*row, index.payer) == payer;
            if from_payer {
                removed += 1;
            }
            !from_payer
        })
        .map(|(_, cells)| cells.clone())
        .collect();
    (kept, removed)
}
