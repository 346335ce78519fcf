use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::errors::{LedgerError, Result};

/// one yearly repayment window, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtPeriod {
    /// 1-based position in the schedule
    pub number: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DebtPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// fines become due once today is past the last day
    pub fn is_over(&self, today: NaiveDate) -> bool {
        today > self.end
    }

    pub fn label(&self) -> String {
        format!("ปีที่ {} ({}/{})", self.number, self.start.year(), self.end.year())
    }
}

/// the schedule's periods in order
///
/// Period i starts on the contract start date shifted by i years and ends on
/// the configured month and day of the following year.
pub fn debt_periods(schedule: &ScheduleConfig) -> Result<Vec<DebtPeriod>> {
    (0..schedule.period_count)
        .map(|i| {
            let start = schedule
                .contract_start
                .checked_add_months(Months::new(12 * i))
                .ok_or_else(|| out_of_range(i))?;
            let end = NaiveDate::from_ymd_opt(
                start.year() + 1,
                schedule.period_end_month,
                schedule.period_end_day,
            )
            .ok_or_else(|| out_of_range(i))?;
            Ok(DebtPeriod {
                number: i + 1,
                start,
                end,
            })
        })
        .collect()
}

fn out_of_range(i: u32) -> LedgerError {
    LedgerError::InvalidConfiguration {
        message: format!("period {} has no valid calendar dates", i + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_village_periods() {
        let periods = debt_periods(&ScheduleConfig::default()).unwrap();
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].start, date(2025, 4, 5));
        assert_eq!(periods[0].end, date(2026, 3, 5));
        assert_eq!(periods[3].start, date(2028, 4, 5));
        assert_eq!(periods[3].end, date(2029, 3, 5));
        assert_eq!(periods[1].label(), "ปีที่ 2 (2026/2027)");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let period = debt_periods(&ScheduleConfig::default()).unwrap()[0];
        assert!(period.contains(date(2025, 4, 5)));
        assert!(period.contains(date(2026, 3, 5)));
        assert!(!period.contains(date(2025, 4, 4)));
        assert!(!period.contains(date(2026, 3, 6)));
    }

    #[test]
    fn test_gap_between_periods() {
        let periods = debt_periods(&ScheduleConfig::default()).unwrap();
        let gap = date(2026, 3, 20);
        assert!(periods.iter().all(|p| !p.contains(gap)));
    }

    #[test]
    fn test_is_over_only_after_end() {
        let period = debt_periods(&ScheduleConfig::default()).unwrap()[0];
        assert!(!period.is_over(date(2026, 3, 5)));
        assert!(period.is_over(date(2026, 3, 6)));
    }
}
