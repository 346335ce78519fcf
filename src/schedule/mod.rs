//! Yearly repayment targets and late fines.
//!
//! The calculator is pure: the same debtor, loan, payments and evaluation day
//! always give the same summary.

pub mod fines;
pub mod periods;

pub use fines::{assess_fine, FineStatus};
pub use periods::{debt_periods, DebtPeriod};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::types::Payment;

/// one period of a debtor's schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: DebtPeriod,
    pub label: String,
    pub target: Money,
    pub paid: Money,
    pub shortfall: Money,
    pub fine_status: FineStatus,
}

impl PeriodSummary {
    pub fn fine(&self) -> Money {
        self.fine_status.fine()
    }
}

/// a debtor's schedule with its aggregates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub debtor_name: String,
    pub total_loan: Money,
    pub evaluated_on: NaiveDate,
    pub periods: Vec<PeriodSummary>,
    /// sum of payments that fall inside some period
    pub total_paid: Money,
    pub total_fines: Money,
    /// unpaid loan, floored at zero, plus every fine
    pub remaining_with_fines: Money,
}

impl YearlySummary {
    pub fn remaining_principal(&self) -> Money {
        (self.total_loan - self.total_paid).non_negative()
    }
}

/// computes yearly summaries for one schedule
#[derive(Debug, Clone)]
pub struct DebtCalculator {
    pub schedule: ScheduleConfig,
    periods: Vec<DebtPeriod>,
}

impl DebtCalculator {
    pub fn new(schedule: ScheduleConfig) -> Result<Self> {
        let periods = debt_periods(&schedule)?;
        Ok(Self { schedule, periods })
    }

    pub fn periods(&self) -> &[DebtPeriod] {
        &self.periods
    }

    /// summarize `debtor_name`'s repayments as of `today`
    ///
    /// Only payments made by the debtor and dated inside a period count.
    /// A non-positive loan is treated as zero. Overpaying one period does not
    /// reduce the next period's target.
    pub fn summarize(
        &self,
        debtor_name: &str,
        total_loan: Money,
        payments: &[Payment],
        today: NaiveDate,
    ) -> YearlySummary {
        let loan = total_loan.non_negative();
        let target = loan.apply(self.schedule.yearly_target_rate);

        let mut periods = Vec::with_capacity(self.periods.len());
        let mut total_paid = Money::ZERO;
        let mut total_fines = Money::ZERO;

        for period in &self.periods {
            let paid: Money = payments
                .iter()
                .filter(|p| p.is_from(debtor_name) && period.contains(p.paid_on))
                .map(|p| p.amount)
                .sum();
            let shortfall = (target - paid).non_negative();
            let fine_status = assess_fine(period, shortfall, today, self.schedule.fine_rate);

            total_paid += paid;
            total_fines += fine_status.fine();
            periods.push(PeriodSummary {
                period: *period,
                label: period.label(),
                target,
                paid,
                shortfall,
                fine_status,
            });
        }

        YearlySummary {
            debtor_name: debtor_name.to_string(),
            total_loan,
            evaluated_on: today,
            periods,
            total_paid,
            total_fines,
            remaining_with_fines: (loan - total_paid).non_negative() + total_fines,
        }
    }
}

/// one-shot summary with a fresh calculator
pub fn calculate_yearly_summary(
    debtor_name: &str,
    total_loan: Money,
    payments: &[Payment],
    today: NaiveDate,
    schedule: &ScheduleConfig,
) -> Result<YearlySummary> {
    Ok(DebtCalculator::new(schedule.clone())?.summarize(debtor_name, total_loan, payments, today))
}
