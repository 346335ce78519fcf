/// serializable views for scripting and json output
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::schedule::{FineStatus, PeriodSummary, YearlySummary};
use crate::types::{Debtor, Payment};

/// a debtor with their schedule as of one day
#[derive(Debug, Serialize, Deserialize)]
pub struct DebtorSummaryView {
    pub sequence_number: u32,
    pub name: String,
    pub evaluated_on: NaiveDate,
    pub totals: TotalsView,
    pub periods: Vec<PeriodView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalsView {
    pub total_loan: Money,
    pub total_paid: Money,
    pub total_fines: Money,
    pub remaining_principal: Money,
    pub remaining_with_fines: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeriodView {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target: Money,
    pub paid: Money,
    pub shortfall: Money,
    pub fine: Money,
    pub status: FineStatus,
    /// status as shown to people
    pub status_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentView {
    pub paid_on: NaiveDate,
    pub amount: Money,
    pub note: Option<String>,
}

impl DebtorSummaryView {
    pub fn new(debtor: &Debtor, summary: &YearlySummary) -> Self {
        DebtorSummaryView {
            sequence_number: debtor.sequence_number,
            name: debtor.name.clone(),
            evaluated_on: summary.evaluated_on,
            totals: TotalsView {
                total_loan: summary.total_loan,
                total_paid: summary.total_paid,
                total_fines: summary.total_fines,
                remaining_principal: summary.remaining_principal(),
                remaining_with_fines: summary.remaining_with_fines,
            },
            periods: summary.periods.iter().map(PeriodView::from_summary).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl PeriodView {
    fn from_summary(period: &PeriodSummary) -> Self {
        PeriodView {
            label: period.label.clone(),
            start: period.period.start,
            end: period.period.end,
            target: period.target,
            paid: period.paid,
            shortfall: period.shortfall,
            fine: period.fine(),
            status: period.fine_status,
            status_text: period.fine_status.to_string(),
        }
    }
}

impl From<&Payment> for PaymentView {
    fn from(payment: &Payment) -> Self {
        PaymentView {
            paid_on: payment.paid_on,
            amount: payment.amount,
            note: payment.note().map(str::to_string),
        }
    }
}

/// payment history as pretty json
pub fn history_to_json_pretty(history: &[Payment]) -> Result<String, serde_json::Error> {
    let views: Vec<PaymentView> = history.iter().map(PaymentView::from).collect();
    serde_json::to_string_pretty(&views)
}
