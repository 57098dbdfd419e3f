use chrono::NaiveDate;

use crate::dates;
use crate::loan::Loan;

/// resolve the calendar date of installment #1
///
/// The only place first-installment fallback logic lives. Recomputed fresh
/// from truth fields on every call; never stored as a running schedule, so
/// the grid cannot drift. Priority, highest first:
/// 1. transient caller override (not persisted),
/// 2. the loan's persisted custom first-installment date,
/// 3. nothing paid yet: one week after the loan date,
/// 4. otherwise: walk `next_due_date` back by the installments already paid.
pub fn resolve_anchor(loan: &Loan, override_date: Option<NaiveDate>) -> NaiveDate {
    if let Some(date) = override_date {
        return date;
    }
    if let Some(date) = loan.custom_first_installment_date {
        return date;
    }
    if loan.installments_paid_count == 0 {
        dates::add_weeks(loan.loan_date, 1)
    } else {
        dates::add_weeks(loan.next_due_date, -(loan.installments_paid_count as i64))
    }
}
