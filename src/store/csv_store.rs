use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::errors::{LedgerError, Result};
use crate::store::{TableStore, Values};

/// directory of csv files, one `<table>.csv` per table
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    directory: PathBuf,
}

impl CsvTableStore {
    /// open an existing store directory
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(LedgerError::StoreUnavailable {
                location: directory.display().to_string(),
                message: "directory does not exist".to_string(),
            });
        }
        Ok(Self { directory })
    }

    /// create the directory if needed and any missing table with the given
    /// header; existing tables are left alone
    pub fn create(directory: impl Into<PathBuf>, tables: &[(&str, Vec<String>)]) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| LedgerError::StoreUnavailable {
            location: directory.display().to_string(),
            message: e.to_string(),
        })?;
        let mut store = Self { directory };
        for (table, header) in tables {
            if !store.table_path(table).exists() {
                store.write_values(table, &[header.clone()])?;
                info!(table = *table, "created table");
            }
        }
        Ok(store)
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", table))
    }

    fn write_failed(table: &str, err: impl ToString) -> LedgerError {
        LedgerError::WriteFailed {
            table: table.to_string(),
            message: err.to_string(),
        }
    }
}

impl TableStore for CsvTableStore {
    fn read_values(&self, table: &str) -> Result<Values> {
        if !self.directory.is_dir() {
            return Err(LedgerError::StoreUnavailable {
                location: self.directory.display().to_string(),
                message: "directory does not exist".to_string(),
            });
        }
        let path = self.table_path(table);
        let file = File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LedgerError::TableNotFound {
                table: table.to_string(),
            },
            _ => LedgerError::Io(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut values = Vec::new();
        for record in reader.records() {
            let record = record?;
            values.push(record.iter().map(str::to_string).collect());
        }
        debug!(table, rows = values.len(), "read csv table");
        Ok(values)
    }

    fn write_values(&mut self, table: &str, values: &[Vec<String>]) -> Result<()> {
        let path = self.table_path(table);
        // write beside the target then rename so readers never see half a table
        let temp_path = path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| Self::write_failed(table, e))?;

            let mut writer = WriterBuilder::new()
                .flexible(true)
                .from_writer(BufWriter::new(file));
            for row in values {
                writer
                    .write_record(row)
                    .map_err(|e| Self::write_failed(table, e))?;
            }
            writer.flush().map_err(|e| Self::write_failed(table, e))?;
        }

        fs::rename(&temp_path, &path).map_err(|e| Self::write_failed(table, e))?;
        debug!(table, rows = values.len(), "wrote csv table");
        Ok(())
    }
}
