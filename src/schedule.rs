use chrono::NaiveDate;

use crate::dates;
use crate::ledger::PaymentLedger;
use crate::loan::Loan;
use crate::types::{InstallmentProjection, InstallmentStatus};

/// project the installment schedule for a loan
///
/// Pure: same (loan, anchor, ledger) always yields the same list. Row `i`
/// falls exactly `7 × (i−1)` days after the anchor. Payment detail comes
/// from the ledger; rows at or below `installments_paid_count` without a
/// ledger record still show PAID (legacy counts without per-installment
/// records). A suppressed schedule projects empty until a new anchor is
/// chosen.
pub fn project(loan: &Loan, anchor: NaiveDate, ledger: &PaymentLedger) -> Vec<InstallmentProjection> {
    if loan.schedule_suppressed || loan.installment_count == 0 {
        return Vec::new();
    }

    (1..=loan.installment_count)
        .map(|i| project_row(loan, anchor, ledger, i))
        .collect()
}

fn project_row(
    loan: &Loan,
    anchor: NaiveDate,
    ledger: &PaymentLedger,
    number: u32,
) -> InstallmentProjection {
    let scheduled_date = dates::add_weeks(anchor, (number - 1) as i64);
    let scheduled_amount = loan.installment_amount.round_dp(2);

    if let Some(payment) = ledger.latest_for_installment(number) {
        let status = if payment.is_partial {
            InstallmentStatus::Partial
        } else {
            InstallmentStatus::Paid
        };
        return InstallmentProjection {
            number,
            scheduled_date,
            scheduled_amount,
            status,
            paid_date: Some(payment.payment_date),
            paid_amount: Some(payment.amount_paid),
            mora: Some(payment.mora_amount),
            remaining: Some(payment.remaining_amount),
        };
    }

    if number <= loan.installments_paid_count {
        let mut row = InstallmentProjection::pending(number, scheduled_date, scheduled_amount);
        row.status = InstallmentStatus::Paid;
        return row;
    }

    InstallmentProjection::pending(number, scheduled_date, scheduled_amount)
}
