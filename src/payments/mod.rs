pub mod editor;
pub mod poster;

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::LoanStatus;

pub use editor::{edit_payment, reverse_payment, EditRequest};
pub use poster::{post_payment, PostRequest};

/// reject non-positive payment amounts
pub fn validate_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(LoanError::InvalidAmount { amount });
    }
    Ok(())
}

/// reject payment dates before the loan existed
pub fn validate_date(loan: &Loan, payment_date: NaiveDate) -> Result<()> {
    if payment_date < loan.loan_date {
        return Err(LoanError::InvalidDate {
            message: format!(
                "payment date {} precedes loan date {}",
                payment_date, loan.loan_date
            ),
        });
    }
    Ok(())
}

/// whether paid totals or completed installments settle the loan
pub fn settlement_reached(
    loan: &Loan,
    total_paid: Money,
    installments_paid_count: u32,
) -> bool {
    total_paid >= loan.total_payable || installments_paid_count >= loan.installment_count
}

/// loan status after a posting:
/// settlement first; an on-time full payment cures LATE; a late partial
/// payment marks the loan LATE; everything else preserves the prior status
/// (a full payment that arrives late still brings the schedule current, so
/// an ACTIVE loan stays ACTIVE and only the mora records the slip)
pub fn status_after_post(
    prior: LoanStatus,
    is_partial: bool,
    is_late: bool,
    settled: bool,
) -> LoanStatus {
    if settled {
        LoanStatus::Paid
    } else if !is_partial && prior == LoanStatus::Late && !is_late {
        LoanStatus::Active
    } else if is_partial && is_late {
        LoanStatus::Late
    } else {
        prior
    }
}
