//! Printable payment receipts.
//!
//! Rendering is pure: a payment and the debtor's yearly summary go in, a fixed
//! plain-text page comes out.

pub mod format;

use serde::{Deserialize, Serialize};

use crate::config::ReceiptConfig;
use crate::decimal::Money;
use crate::schedule::YearlySummary;
use crate::types::Payment;

use self::format::{center, justify, rule};

const RECEIPT_DATE_FORMAT: &str = "%d/%m/%Y";
const FILE_DATE_FORMAT: &str = "%Y%m%d";
const SIGNATURE_LINE: &str = "___________________";
const PAYER_SIGNATURE: &str = "(     ผู้ชำระเงิน     )";
const RECEIVER_SIGNATURE: &str = "(     ผู้รับเงิน     )";

/// which payment a receipt was printed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptKind {
    /// the payment just recorded
    Latest,
    /// any row picked from the history
    Historical,
}

/// the figures printed on one receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub payment: Payment,
    pub total_loan: Money,
    pub total_paid: Money,
    pub total_fines: Money,
    pub remaining_with_fines: Money,
}

/// a rendered receipt ready to save or print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDocument {
    pub file_name: String,
    pub body: String,
}

impl Receipt {
    pub fn new(payment: Payment, summary: &YearlySummary) -> Self {
        Self {
            payment,
            total_loan: summary.total_loan,
            total_paid: summary.total_paid,
            total_fines: summary.total_fines,
            remaining_with_fines: summary.remaining_with_fines,
        }
    }

    pub fn render(&self, config: &ReceiptConfig) -> String {
        let width = config.width;
        let amount = |value: Money| format!("{} {}", value.format_grouped(2), config.currency_label);

        let lines = vec![
            center(&config.title, width),
            String::new(),
            format!("ชื่อลูกหนี้: {}", self.payment.payer_name),
            format!(
                "วันที่ชำระ: {}",
                self.payment.paid_on.format(RECEIPT_DATE_FORMAT)
            ),
            justify("จำนวนเงินที่ชำระ:", &amount(self.payment.amount), width),
            String::new(),
            rule(width),
            String::new(),
            justify("ยอดหนี้ทั้งหมด:", &amount(self.total_loan), width),
            justify("ยอดที่ชำระแล้วทั้งหมด:", &amount(self.total_paid), width),
            justify("ค่าปรับรวมทั้งหมด:", &amount(self.total_fines), width),
            justify(
                "ยอดหนี้คงเหลือทั้งหมด (รวมค่าปรับ):",
                &amount(self.remaining_with_fines),
                width,
            ),
            String::new(),
            rule(width),
            String::new(),
            String::new(),
            justify(SIGNATURE_LINE, SIGNATURE_LINE, width),
            justify(PAYER_SIGNATURE, RECEIVER_SIGNATURE, width),
        ];

        let mut body = lines.join("\n");
        body.push('\n');
        body
    }

    /// `ใบเสร็จ_<name>_<YYYYMMDD>.txt`, with the amount appended for
    /// historical rows
    pub fn file_name(&self, kind: ReceiptKind) -> String {
        let name = self.payment.payer_name.replace(['/', '\\'], "_");
        let date = self.payment.paid_on.format(FILE_DATE_FORMAT);
        match kind {
            ReceiptKind::Latest => format!("ใบเสร็จ_{}_{}.txt", name, date),
            ReceiptKind::Historical => {
                format!("ใบเสร็จ_{}_{}_{}.txt", name, date, self.payment.amount.to_cell())
            }
        }
    }

    pub fn to_document(&self, config: &ReceiptConfig, kind: ReceiptKind) -> ReceiptDocument {
        ReceiptDocument {
            file_name: self.file_name(kind),
            body: self.render(config),
        }
    }
}
