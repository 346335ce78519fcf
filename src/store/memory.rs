use std::collections::{HashMap, HashSet};

use crate::errors::{LedgerError, Result};
use crate::store::{TableStore, Values};

/// tables held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: HashMap<String, Values>,
    read_only: HashSet<String>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// create or replace a table
    pub fn insert(&mut self, table: &str, values: Values) {
        self.tables.insert(table.to_string(), values);
    }

    /// make every later write to `table` fail
    pub fn reject_writes_to(&mut self, table: &str) {
        self.read_only.insert(table.to_string());
    }

    pub fn table(&self, table: &str) -> Option<&Values> {
        self.tables.get(table)
    }

    fn writable(&mut self, table: &str) -> Result<&mut Values> {
        if self.read_only.contains(table) {
            return Err(LedgerError::WriteFailed {
                table: table.to_string(),
                message: "table is read-only".to_string(),
            });
        }
        self.tables
            .get_mut(table)
            .ok_or_else(|| LedgerError::TableNotFound {
                table: table.to_string(),
            })
    }
}

impl TableStore for MemoryTableStore {
    fn read_values(&self, table: &str) -> Result<Values> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| LedgerError::TableNotFound {
                table: table.to_string(),
            })
    }

    fn write_values(&mut self, table: &str, values: &[Vec<String>]) -> Result<()> {
        *self.writable(table)? = values.to_vec();
        Ok(())
    }

    fn append_row(&mut self, table: &str, row: &[String]) -> Result<()> {
        self.writable(table)?.push(row.to_vec());
        Ok(())
    }

    fn update_row(&mut self, table: &str, index: usize, row: &[String]) -> Result<()> {
        let values = self.writable(table)?;
        let slot = values
            .get_mut(index + 1)
            .ok_or_else(|| LedgerError::WriteFailed {
                table: table.to_string(),
                message: format!("row {} does not exist", index + 1),
            })?;
        *slot = row.to_vec();
        Ok(())
    }
}
