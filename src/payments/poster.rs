use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::dates;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{EventStore, LoanEvent};
use crate::ledger::{Payment, PaymentLedger};
use crate::loan::Loan;
use crate::types::Timeliness;

use super::{settlement_reached, status_after_post, validate_amount, validate_date};

/// request to post a new payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub amount: Money,
    pub payment_date: NaiveDate,
    /// defaults to the next unpaid installment
    pub installment_number: Option<u32>,
}

/// mora on a late payment: linear daily proration of the monthly rate,
/// never compounded
fn mora_amount(loan: &Loan, days_late: u32) -> Money {
    let monthly = loan.principal.percentage(loan.mora_rate_percent.as_percent());
    monthly * (Decimal::from(days_late) / dec!(30))
}

/// post a payment against a loan, updating the aggregate alongside the
/// ledger append
///
/// Lateness is judged against the due date at posting time. A full payment
/// advances the paid count and due date by exactly one step; a partial
/// advances neither. All staged values are computed before anything is
/// written, so a validation failure leaves loan and ledger untouched.
pub fn post_payment(
    loan: &mut Loan,
    ledger: &mut PaymentLedger,
    events: &mut EventStore,
    request: PostRequest,
) -> Result<Payment> {
    if loan.is_settled() {
        return Err(LoanError::AlreadySettled { id: loan.id });
    }
    validate_amount(request.amount)?;
    validate_date(loan, request.payment_date)?;

    let installment_number = request
        .installment_number
        .unwrap_or(loan.installments_paid_count + 1);

    // stage the outcome
    let is_late = request.payment_date > loan.next_due_date;
    let days_late = if is_late {
        dates::days_between(loan.next_due_date, request.payment_date) as u32
    } else {
        0
    };
    let mora = if is_late {
        mora_amount(loan, days_late)
    } else {
        Money::ZERO
    };

    let is_partial = request.amount < loan.installment_amount;
    let remaining = if is_partial {
        loan.installment_amount - request.amount
    } else {
        Money::ZERO
    };

    let new_count = if is_partial {
        loan.installments_paid_count
    } else {
        loan.installments_paid_count + 1
    };
    let new_due_date = if is_partial {
        loan.next_due_date
    } else {
        dates::add_weeks(loan.next_due_date, 1)
    };

    let total_paid = ledger.total_paid() + request.amount;
    let settled = settlement_reached(loan, total_paid, new_count);
    let new_status = status_after_post(loan.status, is_partial, is_late, settled);

    let payment = Payment {
        id: Uuid::new_v4(),
        loan_id: loan.id,
        seq: 0, // stamped on append
        amount_paid: request.amount,
        payment_date: request.payment_date,
        installment_number,
        timeliness: if is_late {
            Timeliness::Late
        } else {
            Timeliness::OnTime
        },
        mora_amount: mora,
        is_partial,
        remaining_amount: remaining,
    };

    // commit: ledger and aggregate together
    let saved = ledger.append(payment).clone();

    loan.installments_paid_count = new_count;
    loan.next_due_date = new_due_date;
    loan.days_late = days_late;
    loan.accrued_mora += mora;

    events.emit(LoanEvent::PaymentPosted {
        loan_id: loan.id,
        payment_id: saved.id,
        amount: saved.amount_paid,
        payment_date: saved.payment_date,
        installment_number: saved.installment_number,
        timeliness: saved.timeliness,
        is_partial: saved.is_partial,
    });
    if mora.is_positive() {
        events.emit(LoanEvent::MoraAccrued {
            loan_id: loan.id,
            payment_id: saved.id,
            amount: mora,
            days_late,
        });
    }
    if new_status != loan.status {
        events.emit(LoanEvent::StatusChanged {
            loan_id: loan.id,
            old_status: loan.status,
            new_status,
            reason: if settled {
                "loan settled".to_string()
            } else if is_late {
                format!("payment {} days late", days_late)
            } else {
                "on-time full payment".to_string()
            },
        });
    }
    loan.status = new_status;

    Ok(saved)
}
