//! Tabular store access.
//!
//! A store holds named tables of text cells. The first row of a table is its
//! header. [`load_table`] validates the header against the columns a caller
//! needs and [`save_table`] replaces a table wholesale.

pub mod csv_store;
pub mod memory;

use tracing::{debug, warn};

use crate::errors::{LedgerError, Result};

pub use csv_store::CsvTableStore;
pub use memory::MemoryTableStore;

/// raw table values, header row first
pub type Values = Vec<Vec<String>>;

/// backend holding named tables of text cells
pub trait TableStore {
    /// every value of the table including the header row; an existing but
    /// empty table yields no rows
    fn read_values(&self, table: &str) -> Result<Values>;

    /// replace the whole table
    fn write_values(&mut self, table: &str, values: &[Vec<String>]) -> Result<()>;

    /// append one data row after the last row
    fn append_row(&mut self, table: &str, row: &[String]) -> Result<()> {
        let mut values = self.read_values(table)?;
        values.push(row.to_vec());
        self.write_values(table, &values)
    }

    /// replace the data row at `index` (0 is the first row after the header)
    fn update_row(&mut self, table: &str, index: usize, row: &[String]) -> Result<()> {
        let mut values = self.read_values(table)?;
        let slot = values
            .get_mut(index + 1)
            .ok_or_else(|| LedgerError::WriteFailed {
                table: table.to_string(),
                message: format!("row {} does not exist", index + 1),
            })?;
        *slot = row.to_vec();
        self.write_values(table, &values)
    }
}

/// strip surrounding whitespace and invisible characters picked up from
/// spreadsheet exports
pub fn normalize_cell(text: &str) -> String {
    text.replace('\u{feff}', "")
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// a loaded table with a normalized header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub header: Vec<String>,
    /// data rows exactly as read
    pub rows: Vec<Vec<String>>,
    /// false when the store holds no header row yet
    pub persisted: bool,
}

impl Table {
    /// table with a header and no data rows
    pub fn empty(name: &str, header: &[String]) -> Self {
        Self {
            name: name.to_string(),
            header: header.to_vec(),
            rows: Vec::new(),
            persisted: false,
        }
    }

    pub fn from_values(name: &str, values: Values) -> Self {
        let persisted = !values.is_empty();
        let mut rows = values.into_iter();
        let header = rows
            .next()
            .map(|raw| raw.iter().map(|h| normalize_cell(h)).collect())
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            header,
            rows: rows.collect(),
            persisted,
        }
    }

    /// position of a column in the header
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// required columns absent from the header, in the order given
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|c| self.column(c).is_none())
            .cloned()
            .collect()
    }

    /// normalized cell text; short rows read as empty
    pub fn cell(&self, row: usize, column: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|c| normalize_cell(c))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// header followed by every data row
    pub fn to_values(&self) -> Values {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        values.push(self.header.clone());
        values.extend(self.rows.iter().cloned());
        values
    }
}

/// read a table and check that every required column is present
pub fn load_table<S: TableStore + ?Sized>(
    store: &S,
    name: &str,
    required: &[String],
) -> Result<Table> {
    let values = store.read_values(name)?;
    if values.is_empty() {
        warn!(table = name, "table is empty");
        return Ok(Table::empty(name, required));
    }

    let table = Table::from_values(name, values);
    let missing = table.missing_columns(required);
    if !missing.is_empty() {
        return Err(LedgerError::SchemaMismatch {
            table: name.to_string(),
            missing,
            expected: required.to_vec(),
        });
    }

    debug!(table = name, rows = table.len(), "loaded table");
    Ok(table)
}

/// replace a table: header first, then each row padded or cut to the
/// column count
pub fn save_table<S: TableStore + ?Sized>(
    store: &mut S,
    name: &str,
    column_order: &[String],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut values = Vec::with_capacity(rows.len() + 1);
    values.push(column_order.to_vec());
    for row in rows {
        values.push(fit_row(row, column_order.len()));
    }
    store.write_values(name, &values)?;
    debug!(table = name, rows = rows.len(), "saved table");
    Ok(())
}

/// pad with empty cells or truncate to `width`
pub fn fit_row(row: &[String], width: usize) -> Vec<String> {
    let mut fitted: Vec<String> = row.iter().take(width).cloned().collect();
    fitted.resize(width, String::new());
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("\u{feff}ผู้จ่าย "), "ผู้จ่าย");
        assert_eq!(normalize_cell("\u{a0}จำนวน\u{a0}"), "จำนวน");
        assert_eq!(normalize_cell("a\u{a0}b"), "a b");
    }

    #[test]
    fn test_load_normalizes_header() {
        let mut store = MemoryTableStore::new();
        store.insert(
            "pay",
            vec![
                cols(&["\u{feff}ผู้จ่าย", " วันที่จ่าย", "จำนวน\u{a0}", "หมายเหตุ"]),
                cols(&["สมชาย", "2025-04-05", "100", ""]),
            ],
        );
        let required = cols(&["ผู้จ่าย", "วันที่จ่าย", "จำนวน", "หมายเหตุ"]);
        let table = load_table(&store, "pay", &required).unwrap();
        assert_eq!(table.header, required);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 0), "สมชาย");
    }

    #[test]
    fn test_load_reports_missing_columns() {
        let mut store = MemoryTableStore::new();
        store.insert("pay", vec![cols(&["ผู้จ่าย", "จำนวน"])]);
        let required = cols(&["ผู้จ่าย", "วันที่จ่าย", "จำนวน", "หมายเหตุ"]);
        match load_table(&store, "pay", &required) {
            Err(LedgerError::SchemaMismatch { missing, .. }) => {
                assert_eq!(missing, cols(&["วันที่จ่าย", "หมายเหตุ"]));
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_load_empty_table_uses_required_header() {
        let mut store = MemoryTableStore::new();
        store.insert("customers", Vec::new());
        let required = cols(&["ลำดับที่", "ชื่อ", "รวมเงินกู้ทั้งหมด"]);
        let table = load_table(&store, "customers", &required).unwrap();
        assert!(table.is_empty());
        assert!(!table.persisted);
        assert_eq!(table.header, required);
    }

    #[test]
    fn test_load_missing_table() {
        let store = MemoryTableStore::new();
        assert!(matches!(
            load_table(&store, "pay", &[]),
            Err(LedgerError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_save_pads_and_restates_header() {
        let mut store = MemoryTableStore::new();
        store.insert("pay", Vec::new());
        let order = cols(&["a", "b", "c"]);
        save_table(
            &mut store,
            "pay",
            &order,
            &[cols(&["1"]), cols(&["1", "2", "3", "4"])],
        )
        .unwrap();
        let values = store.read_values("pay").unwrap();
        assert_eq!(values[0], order);
        assert_eq!(values[1], cols(&["1", "", ""]));
        assert_eq!(values[2], cols(&["1", "2", "3"]));
    }

    #[test]
    fn test_short_rows_read_as_empty_cells() {
        let table = Table::from_values("pay", vec![cols(&["a", "b"]), cols(&["x"])]);
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }
}
