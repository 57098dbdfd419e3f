use chrono::NaiveDate;

use crate::dates;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{EventStore, LoanEvent};
use crate::ledger::{Payment, PaymentLedger};
use crate::loan::Loan;
use crate::types::{LoanStatus, PaymentId};

use super::{validate_amount, validate_date};

/// request to amend an existing payment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
}

/// amend a posted payment's amount and/or date
///
/// Recomputes the partial flag and remaining amount against the installment
/// amount, and the PAID/non-PAID status from the full ledger total. It
/// deliberately never touches `installments_paid_count` or `next_due_date`,
/// and never re-derives ACTIVE vs LATE or the posted mora; only the poster
/// prices lateness. Documented asymmetry.
pub fn edit_payment(
    loan: &mut Loan,
    ledger: &mut PaymentLedger,
    events: &mut EventStore,
    payment_id: PaymentId,
    request: EditRequest,
) -> Result<Payment> {
    if let Some(amount) = request.amount {
        validate_amount(amount)?;
    }
    if let Some(date) = request.date {
        validate_date(loan, date)?;
    }

    let installment_amount = loan.installment_amount;
    let payment = ledger
        .get_mut(payment_id)
        .ok_or(LoanError::PaymentNotFound { id: payment_id })?;

    let old_amount = payment.amount_paid;
    let new_amount = request.amount.unwrap_or(payment.amount_paid);
    let new_date = request.date.unwrap_or(payment.payment_date);

    payment.amount_paid = new_amount;
    payment.payment_date = new_date;
    payment.is_partial = new_amount < installment_amount;
    payment.remaining_amount = if payment.is_partial {
        installment_amount - new_amount
    } else {
        Money::ZERO
    };
    let amended = payment.clone();

    let total_paid = ledger.total_paid();
    let new_status = if total_paid >= loan.total_payable {
        LoanStatus::Paid
    } else if loan.status == LoanStatus::Paid {
        // the edit dropped a settled loan below its total
        LoanStatus::Active
    } else {
        loan.status
    };

    events.emit(LoanEvent::PaymentAmended {
        loan_id: loan.id,
        payment_id,
        old_amount,
        new_amount,
        new_date,
    });
    if new_status != loan.status {
        events.emit(LoanEvent::StatusChanged {
            loan_id: loan.id,
            old_status: loan.status,
            new_status,
            reason: "payment amended".to_string(),
        });
    }
    loan.status = new_status;

    Ok(amended)
}

/// reverse (delete) a posted payment, restoring the aggregate
///
/// A non-partial deletion walks the paid count (floor 0) and due date back
/// by one step; the payment's mora leaves the accrued total (floor 0). A
/// settled loan dropping below its total reverts to ACTIVE — never LATE;
/// lateness is re-derived only by the next posting.
pub fn reverse_payment(
    loan: &mut Loan,
    ledger: &mut PaymentLedger,
    events: &mut EventStore,
    payment_id: PaymentId,
) -> Result<Payment> {
    let payment = ledger
        .remove(payment_id)
        .ok_or(LoanError::PaymentNotFound { id: payment_id })?;

    if !payment.is_partial {
        loan.installments_paid_count = loan.installments_paid_count.saturating_sub(1);
        loan.next_due_date = dates::add_weeks(loan.next_due_date, -1);
    }
    loan.accrued_mora = (loan.accrued_mora - payment.mora_amount).max(Money::ZERO);

    let total_paid = ledger.total_paid();
    let new_status = if loan.status == LoanStatus::Paid && total_paid < loan.total_payable {
        LoanStatus::Active
    } else {
        loan.status
    };

    events.emit(LoanEvent::PaymentReversed {
        loan_id: loan.id,
        payment_id,
        amount: payment.amount_paid,
        restored_due_date: loan.next_due_date,
    });
    if new_status != loan.status {
        events.emit(LoanEvent::StatusChanged {
            loan_id: loan.id,
            old_status: loan.status,
            new_status,
            reason: "payment reversed".to_string(),
        });
    }
    loan.status = new_status;

    Ok(payment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::loan::LoanTerms;
    use crate::payments::poster::{post_payment, PostRequest};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn loan_5000_12w() -> Loan {
        Loan::open(LoanTerms {
            principal: Money::from_major(5_000),
            rate_percent: Rate::from_percent(dec!(10)),
            mora_rate_percent: Rate::from_percent(dec!(5)),
            loan_date: d(2024, 1, 1),
            installment_count: 12,
            payment_weekday: None,
        })
        .unwrap()
    }

    fn post(
        loan: &mut Loan,
        ledger: &mut PaymentLedger,
        amount: Money,
        date: NaiveDate,
    ) -> Payment {
        post_payment(
            loan,
            ledger,
            &mut EventStore::new(),
            PostRequest {
                amount,
                payment_date: date,
                installment_number: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_post_then_reverse_round_trips_the_aggregate() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let before = loan.clone();
        // two days late: accrues 16.67 mora and advances the schedule
        let amount = loan.installment_amount;
        let payment = post(&mut loan, &mut ledger, amount, d(2024, 1, 10));
        assert_eq!(loan.next_due_date, d(2024, 1, 15));

        reverse_payment(&mut loan, &mut ledger, &mut events, payment.id).unwrap();

        assert_eq!(loan.installments_paid_count, before.installments_paid_count);
        assert_eq!(loan.next_due_date, d(2024, 1, 8));
        assert_eq!(loan.accrued_mora, before.accrued_mora);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_reverse_partial_leaves_count_and_due_date() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let payment = post(&mut loan, &mut ledger, Money::from_major(100), d(2024, 1, 8));
        reverse_payment(&mut loan, &mut ledger, &mut events, payment.id).unwrap();

        assert_eq!(loan.installments_paid_count, 0);
        assert_eq!(loan.next_due_date, d(2024, 1, 8));
    }

    #[test]
    fn test_reverse_floors_count_and_mora_at_zero() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let amount = loan.installment_amount;
        let payment = post(&mut loan, &mut ledger, amount, d(2024, 1, 8));
        // aggregate drifted externally; reversal must still floor at zero
        loan.installments_paid_count = 0;
        loan.accrued_mora = Money::ZERO;

        reverse_payment(&mut loan, &mut ledger, &mut events, payment.id).unwrap();
        assert_eq!(loan.installments_paid_count, 0);
        assert_eq!(loan.accrued_mora, Money::ZERO);
    }

    #[test]
    fn test_reverse_settled_loan_reverts_to_active() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let amount = loan.total_payable;
        let payment = post(&mut loan, &mut ledger, amount, d(2024, 1, 8));
        assert_eq!(loan.status, LoanStatus::Paid);

        reverse_payment(&mut loan, &mut ledger, &mut events, payment.id).unwrap();
        assert_eq!(loan.status, LoanStatus::Active);
    }

    #[test]
    fn test_edit_never_touches_count_or_due_date() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let amount = loan.installment_amount;
        let payment = post(&mut loan, &mut ledger, amount, d(2024, 1, 8));
        let count_after_post = loan.installments_paid_count;
        let due_after_post = loan.next_due_date;

        // shrink a full payment into a partial
        let amended = edit_payment(
            &mut loan,
            &mut ledger,
            &mut events,
            payment.id,
            EditRequest {
                amount: Some(Money::from_major(100)),
                date: None,
            },
        )
        .unwrap();

        assert!(amended.is_partial);
        assert_eq!(
            amended.remaining_amount,
            loan.installment_amount - Money::from_major(100)
        );
        // the documented asymmetry: count and due date stay where posting left them
        assert_eq!(loan.installments_paid_count, count_after_post);
        assert_eq!(loan.next_due_date, due_after_post);
    }

    #[test]
    fn test_edit_settles_and_unsettles_by_total() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let payment = post(&mut loan, &mut ledger, Money::from_major(5_000), d(2024, 1, 8));
        assert_eq!(loan.status, LoanStatus::Active);

        let total = loan.total_payable;
        edit_payment(
            &mut loan,
            &mut ledger,
            &mut events,
            payment.id,
            EditRequest {
                amount: Some(total),
                date: None,
            },
        )
        .unwrap();
        assert_eq!(loan.status, LoanStatus::Paid);

        edit_payment(
            &mut loan,
            &mut ledger,
            &mut events,
            payment.id,
            EditRequest {
                amount: Some(Money::from_major(1_000)),
                date: None,
            },
        )
        .unwrap();
        assert_eq!(loan.status, LoanStatus::Active);
    }

    #[test]
    fn test_edit_does_not_reprice_mora_or_timeliness() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let amount = loan.installment_amount;
        let payment = post(&mut loan, &mut ledger, amount, d(2024, 1, 10));
        let posted_mora = payment.mora_amount;
        assert!(posted_mora.is_positive());

        let amended = edit_payment(
            &mut loan,
            &mut ledger,
            &mut events,
            payment.id,
            EditRequest {
                amount: None,
                date: Some(d(2024, 1, 8)),
            },
        )
        .unwrap();

        assert_eq!(amended.payment_date, d(2024, 1, 8));
        assert_eq!(amended.mora_amount, posted_mora);
        assert_eq!(amended.timeliness, crate::types::Timeliness::Late);
    }

    #[test]
    fn test_edit_validates_before_mutating() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let amount = loan.installment_amount;
        let payment = post(&mut loan, &mut ledger, amount, d(2024, 1, 8));

        let err = edit_payment(
            &mut loan,
            &mut ledger,
            &mut events,
            payment.id,
            EditRequest {
                amount: Some(Money::ZERO),
                date: None,
            },
        );
        assert!(matches!(err, Err(LoanError::InvalidAmount { .. })));

        let untouched = ledger.get(payment.id).unwrap();
        assert_eq!(untouched.amount_paid, loan.installment_amount);
    }

    #[test]
    fn test_missing_payment_reports_not_found() {
        let mut loan = loan_5000_12w();
        let mut ledger = PaymentLedger::new();
        let mut events = EventStore::new();

        let ghost = uuid::Uuid::new_v4();
        assert!(matches!(
            edit_payment(&mut loan, &mut ledger, &mut events, ghost, EditRequest::default()),
            Err(LoanError::PaymentNotFound { .. })
        ));
        assert!(matches!(
            reverse_payment(&mut loan, &mut ledger, &mut events, ghost),
            Err(LoanError::PaymentNotFound { .. })
        ));
    }
}
