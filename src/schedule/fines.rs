use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Money, Rate};
use crate::schedule::periods::DebtPeriod;

/// where a period stands with respect to fines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "fine", rename_all = "snake_case")]
pub enum FineStatus {
    /// the period has not ended yet; no fine regardless of shortfall
    NotYetDue,
    /// the period has ended with its target met
    FullyPaid,
    /// the period has ended short; carries the whole-baht fine
    Fined(Money),
}

impl FineStatus {
    pub fn fine(&self) -> Money {
        match self {
            FineStatus::Fined(amount) => *amount,
            FineStatus::NotYetDue | FineStatus::FullyPaid => Money::ZERO,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FineStatus::NotYetDue => "⏳",
            FineStatus::FullyPaid => "✅",
            FineStatus::Fined(_) => "❌",
        }
    }
}

impl fmt::Display for FineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FineStatus::NotYetDue => write!(f, "ยังไม่ครบกำหนดคิดค่าปรับ"),
            FineStatus::FullyPaid => write!(f, "จ่ายครบแล้ว"),
            FineStatus::Fined(amount) => write!(f, "มีค่าปรับ {} บาท", amount.format_grouped(0)),
        }
    }
}

/// fine status of a period as seen on `today`
///
/// The fine is the shortfall times the fine rate rounded to whole baht, half
/// to even.
pub fn assess_fine(period: &DebtPeriod, shortfall: Money, today: NaiveDate, fine_rate: Rate) -> FineStatus {
    if !period.is_over(today) {
        return FineStatus::NotYetDue;
    }
    if shortfall.is_positive() {
        FineStatus::Fined(shortfall.apply(fine_rate).round_whole())
    } else {
        FineStatus::FullyPaid
    }
}
