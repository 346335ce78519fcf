use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::types::Payment;

/// where a payment edit stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditPhase {
    Idle,
    /// the row was located and new values are being prepared
    Editing,
    /// the replacement row is being written
    Submitted,
    /// the row vanished before the edit could be written
    Rejected,
}

/// an edit in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub ticket: Uuid,
    /// the payment as it was when the edit began
    pub original: Payment,
    /// data row it was found at; only a hint, the row is located again on
    /// submit
    pub located_row: usize,
}

/// edit state machine
///
/// ```text
/// Idle -> Editing -> Submitted -> Idle
/// Editing -> Idle               (cancel)
/// Editing -> Rejected -> Idle   (row gone at submit)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFlow {
    phase: EditPhase,
    pending: Option<PendingEdit>,
}

impl Default for EditFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl EditFlow {
    pub fn new() -> Self {
        Self {
            phase: EditPhase::Idle,
            pending: None,
        }
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    pub fn begin(&mut self, original: Payment, located_row: usize) -> Result<&PendingEdit> {
        self.require_phase(EditPhase::Idle, "begin an edit")?;
        self.phase = EditPhase::Editing;
        Ok(self.pending.insert(PendingEdit {
            ticket: Uuid::new_v4(),
            original,
            located_row,
        }))
    }

    pub fn cancel(&mut self) -> Result<PendingEdit> {
        self.require_phase(EditPhase::Editing, "cancel")?;
        self.phase = EditPhase::Idle;
        self.take_pending("cancel")
    }

    /// mark the write as issued
    pub fn submit(&mut self) -> Result<&PendingEdit> {
        self.require_phase(EditPhase::Editing, "submit")?;
        self.phase = EditPhase::Submitted;
        self.pending
            .as_ref()
            .ok_or(LedgerError::InvalidEditTransition {
                phase: EditPhase::Editing,
                action: "submit",
            })
    }

    /// the write has finished, successfully or not
    pub fn finish(&mut self) -> Result<PendingEdit> {
        self.require_phase(EditPhase::Submitted, "finish")?;
        self.phase = EditPhase::Idle;
        self.take_pending("finish")
    }

    /// the edited row could not be found again
    pub fn reject(&mut self) -> Result<PendingEdit> {
        self.require_phase(EditPhase::Editing, "reject")?;
        self.phase = EditPhase::Rejected;
        self.take_pending("reject")
    }

    pub fn acknowledge_rejection(&mut self) -> Result<()> {
        self.require_phase(EditPhase::Rejected, "acknowledge a rejection")?;
        self.phase = EditPhase::Idle;
        Ok(())
    }

    fn require_phase(&self, phase: EditPhase, action: &'static str) -> Result<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(LedgerError::InvalidEditTransition {
                phase: self.phase,
                action,
            })
        }
    }

    fn take_pending(&mut self, action: &'static str) -> Result<PendingEdit> {
        self.pending.take().ok_or(LedgerError::InvalidEditTransition {
            phase: self.phase,
            action,
        })
    }
}

/// per-user state carried between actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub selected_debtor: Option<String>,
    pub edit: EditFlow,
    /// last payment recorded in this session; its receipt can be printed
    pub pending_receipt: Option<Payment>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, debtor: impl Into<String>) {
        self.selected_debtor = Some(debtor.into());
    }

    /// drop anything that refers to a debtor that no longer exists
    pub fn forget_debtor(&mut self, name: &str) {
        if self.selected_debtor.as_deref() == Some(name) {
            self.selected_debtor = None;
        }
        if self
            .pending_receipt
            .as_ref()
            .is_some_and(|p| p.is_from(name))
        {
            self.pending_receipt = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use chrono::NaiveDate;

    fn payment() -> Payment {
        Payment::new(
            "สมชาย",
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            Money::from_major(500),
            "",
        )
    }

    #[test]
    fn test_happy_path() {
        let mut flow = EditFlow::new();
        flow.begin(payment(), 3).unwrap();
        assert_eq!(flow.phase(), EditPhase::Editing);
        assert_eq!(flow.submit().unwrap().located_row, 3);
        assert_eq!(flow.phase(), EditPhase::Submitted);
        assert_eq!(flow.finish().unwrap().original, payment());
        assert_eq!(flow.phase(), EditPhase::Idle);
        assert!(flow.pending().is_none());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut flow = EditFlow::new();
        flow.begin(payment(), 0).unwrap();
        flow.cancel().unwrap();
        assert_eq!(flow.phase(), EditPhase::Idle);
    }

    #[test]
    fn test_rejection_must_be_acknowledged() {
        let mut flow = EditFlow::new();
        flow.begin(payment(), 0).unwrap();
        flow.reject().unwrap();
        assert_eq!(flow.phase(), EditPhase::Rejected);
        assert!(matches!(
            flow.begin(payment(), 0),
            Err(LedgerError::InvalidEditTransition {
                phase: EditPhase::Rejected,
                ..
            })
        ));
        flow.acknowledge_rejection().unwrap();
        assert_eq!(flow.phase(), EditPhase::Idle);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut flow = EditFlow::new();
        assert!(flow.submit().is_err());
        assert!(flow.cancel().is_err());
        assert!(flow.finish().is_err());
        flow.begin(payment(), 0).unwrap();
        assert!(flow.begin(payment(), 0).is_err());
        assert!(flow.acknowledge_rejection().is_err());
    }

    #[test]
    fn test_each_edit_gets_its_own_ticket() {
        let mut flow = EditFlow::new();
        let first = flow.begin(payment(), 0).unwrap().ticket;
        flow.cancel().unwrap();
        let second = flow.begin(payment(), 0).unwrap().ticket;
        assert_ne!(first, second);
    }

    #[test]
    fn test_forget_debtor() {
        let mut session = SessionContext::new();
        session.select("สมชาย");
        session.pending_receipt = Some(payment());
        session.forget_debtor("สมศรี");
        assert!(session.selected_debtor.is_some());
        session.forget_debtor("สมชาย");
        assert!(session.selected_debtor.is_none());
        assert!(session.pending_receipt.is_none());
    }
}
