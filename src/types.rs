use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// loan performing, schedule in progress
    Active,
    /// the last posted payment arrived after its due date
    Late,
    /// fully paid off
    Paid,
}

/// whether a payment landed on or after its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeliness {
    OnTime,
    Late,
}

/// projected status of one installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// no payment recorded yet
    Pending,
    /// covered in full
    Paid,
    /// covered by a payment below the installment amount
    Partial,
}

/// quoted repayment terms for a prospective loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsQuote {
    pub total_payable: Money,
    pub installment_amount: Money,
}

/// one row of the projected schedule; derived, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentProjection {
    pub number: u32,
    pub scheduled_date: NaiveDate,
    pub scheduled_amount: Money,
    pub status: InstallmentStatus,
    pub paid_date: Option<NaiveDate>,
    pub paid_amount: Option<Money>,
    pub mora: Option<Money>,
    pub remaining: Option<Money>,
}

impl InstallmentProjection {
    /// pending row with no payment detail
    pub fn pending(number: u32, scheduled_date: NaiveDate, scheduled_amount: Money) -> Self {
        Self {
            number,
            scheduled_date,
            scheduled_amount,
            status: InstallmentStatus::Pending,
            paid_date: None,
            paid_amount: None,
            mora: None,
            remaining: None,
        }
    }
}
