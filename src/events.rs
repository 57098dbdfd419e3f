use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus, PaymentId, Timeliness};

/// all events emitted by loan mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanEvent {
    // lifecycle
    LoanOpened {
        loan_id: LoanId,
        principal: Money,
        total_payable: Money,
        installment_count: u32,
        first_due_date: NaiveDate,
    },

    // ledger mutations
    PaymentPosted {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        payment_date: NaiveDate,
        installment_number: u32,
        timeliness: Timeliness,
        is_partial: bool,
    },
    PaymentAmended {
        loan_id: LoanId,
        payment_id: PaymentId,
        old_amount: Money,
        new_amount: Money,
        new_date: NaiveDate,
    },
    PaymentReversed {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        restored_due_date: NaiveDate,
    },
    MoraAccrued {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        days_late: u32,
    },

    // aggregate changes
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        reason: String,
    },
    AnchorChanged {
        loan_id: LoanId,
        custom_date: Option<NaiveDate>,
    },
    ScheduleSuppressed {
        loan_id: LoanId,
        suppressed: bool,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LoanEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: LoanEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LoanEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LoanEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
