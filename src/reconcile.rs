use crate::dates;
use crate::decimal::Money;
use crate::ledger::PaymentLedger;
use crate::loan::Loan;
use crate::payments::{settlement_reached, status_after_post};
use crate::types::{LoanStatus, Timeliness};

/// rebuild a loan's aggregate fields from scratch by replaying its ledger
///
/// The aggregate is a cache over the ledger; this is the recovery path that
/// proves it. Payments replay in creation order through the same status and
/// schedule arithmetic the poster uses, with each payment's recorded
/// amount, partial flag, timeliness, and mora. `days_late` comes out as the
/// lateness of the last replayed payment against the due date current at
/// its turn, which can differ from the incrementally kept value after
/// amendments; count, due date, mora, and status always agree.
pub fn rebuild_aggregate(loan: &Loan, ledger: &PaymentLedger) -> Loan {
    let mut fresh = loan.reset_aggregate();
    let mut total_paid = Money::ZERO;

    for payment in ledger.iter() {
        let is_late = payment.timeliness == Timeliness::Late;

        fresh.days_late = if is_late {
            dates::days_between(fresh.next_due_date, payment.payment_date).max(0) as u32
        } else {
            0
        };

        if !payment.is_partial {
            fresh.installments_paid_count += 1;
            fresh.next_due_date = dates::add_weeks(fresh.next_due_date, 1);
        }
        total_paid += payment.amount_paid;
        fresh.accrued_mora += payment.mora_amount;

        let settled = settlement_reached(&fresh, total_paid, fresh.installments_paid_count);
        fresh.status = status_after_post(fresh.status, payment.is_partial, is_late, settled);
    }

    // an amended ledger can drop a once-settled total back below payable
    if fresh.status == LoanStatus::Paid
        && total_paid < fresh.total_payable
        && fresh.installments_paid_count < fresh.installment_count
    {
        fresh.status = LoanStatus::Active;
    }

    fresh
}
