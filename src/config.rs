use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::decimal::Rate;
use crate::errors::{LedgerError, Result};

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub store: StoreConfig,
    pub tables: TableLayout,
    pub schedule: ScheduleConfig,
    pub receipt: ReceiptConfig,
    /// seconds a loaded snapshot may be reused before the store is read again
    pub cache_ttl_seconds: u64,
}

/// where the tables live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// directory holding one `<table>.csv` per table
    pub directory: PathBuf,
}

/// table names and the exact header text of each column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub debtors_table: String,
    pub payments_table: String,
    pub debtor_columns: DebtorColumns,
    pub payment_columns: PaymentColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtorColumns {
    pub sequence: String,
    pub name: String,
    pub total_loan: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentColumns {
    pub payer: String,
    pub paid_on: String,
    pub amount: String,
    pub note: String,
}

/// repayment schedule terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// first day of the first period
    pub contract_start: NaiveDate,
    /// month of the last day of each period, in the following year
    pub period_end_month: u32,
    /// day of the last day of each period
    pub period_end_day: u32,
    pub period_count: u32,
    /// share of the total loan due in each period
    pub yearly_target_rate: Rate,
    /// fine charged on a period's shortfall once it is over
    pub fine_rate: Rate,
}

/// receipt wording and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptConfig {
    pub title: String,
    pub currency_label: String,
    /// printable width in columns
    pub width: usize,
}

impl DebtorColumns {
    /// columns in table order
    pub fn ordered(&self) -> Vec<String> {
        vec![self.sequence.clone(), self.name.clone(), self.total_loan.clone()]
    }
}

impl PaymentColumns {
    /// columns in table order
    pub fn ordered(&self) -> Vec<String> {
        vec![
            self.payer.clone(),
            self.paid_on.clone(),
            self.amount.clone(),
            self.note.clone(),
        ]
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            debtors_table: "customers".to_string(),
            payments_table: "pay".to_string(),
            debtor_columns: DebtorColumns {
                sequence: "ลำดับที่".to_string(),
                name: "ชื่อ".to_string(),
                total_loan: "รวมเงินกู้ทั้งหมด".to_string(),
            },
            payment_columns: PaymentColumns {
                payer: "ผู้จ่าย".to_string(),
                paid_on: "วันที่จ่าย".to_string(),
                amount: "จำนวน".to_string(),
                note: "หมายเหตุ".to_string(),
            },
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            contract_start: NaiveDate::from_ymd_opt(2025, 4, 5).unwrap_or_default(),
            period_end_month: 3,
            period_end_day: 5,
            period_count: 4,
            yearly_target_rate: Rate::from_percentage(25),
            fine_rate: Rate::from_percentage(15),
        }
    }
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            title: "ใบเสร็จรับเงิน".to_string(),
            currency_label: "บาท".to_string(),
            width: 64,
        }
    }
}

impl LedgerConfig {
    /// village fund preset: four yearly periods from 5 April 2025, 25% due
    /// per period, 15% fine on shortfalls
    pub fn village_default(directory: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig {
                directory: directory.into(),
            },
            tables: TableLayout::default(),
            schedule: ScheduleConfig::default(),
            receipt: ReceiptConfig::default(),
            cache_ttl_seconds: 3600,
        }
    }

    /// parse and validate a json configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// read, parse and validate a json configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| LedgerError::InvalidConfiguration {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let tables = &self.tables;
        if tables.debtors_table.trim().is_empty() || tables.payments_table.trim().is_empty() {
            return Err(invalid("table names must not be empty"));
        }
        if tables.debtors_table == tables.payments_table {
            return Err(invalid("debtor and payment tables must differ"));
        }
        check_columns(&tables.debtor_columns.ordered())?;
        check_columns(&tables.payment_columns.ordered())?;

        let schedule = &self.schedule;
        if schedule.period_count == 0 {
            return Err(invalid("period_count must be at least 1"));
        }
        // day 29 of february would vanish in non-leap years
        let probe_year = 2001;
        if NaiveDate::from_ymd_opt(probe_year, schedule.period_end_month, schedule.period_end_day)
            .is_none()
        {
            return Err(invalid(&format!(
                "period end {}/{} is not a valid day of every year",
                schedule.period_end_day, schedule.period_end_month
            )));
        }
        if schedule.yearly_target_rate.is_negative() || schedule.fine_rate.is_negative() {
            return Err(invalid("rates must not be negative"));
        }
        if self.receipt.width < 40 {
            return Err(invalid("receipt width must be at least 40 columns"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> LedgerError {
    LedgerError::InvalidConfiguration {
        message: message.to_string(),
    }
}

fn check_columns(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if column.trim().is_empty() {
            return Err(invalid("column names must not be empty"));
        }
        if !seen.insert(column.as_str()) {
            return Err(invalid(&format!("duplicate column name: {}", column)));
        }
    }
    Ok(())
}
