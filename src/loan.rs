use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::terms::quote_terms;
use crate::types::{LoanId, LoanStatus};

/// terms a loan is opened with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub rate_percent: Rate,
    pub mora_rate_percent: Rate,
    pub loan_date: NaiveDate,
    pub installment_count: u32,
    /// preferred collection weekday (0 = Monday), for the surrounding
    /// application; the schedule itself derives from the anchor date
    pub payment_weekday: Option<u8>,
}

/// loan aggregate
///
/// Every field below `total_payable` is a cache over the payment ledger.
/// It is maintained incrementally by post/edit/reverse and can be rebuilt
/// from scratch by `reconcile::rebuild_aggregate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,

    // terms
    pub principal: Money,
    pub rate_percent: Rate,
    pub mora_rate_percent: Rate,
    pub loan_date: NaiveDate,
    pub installment_count: u32,
    pub installment_amount: Money,
    pub total_payable: Money,
    pub payment_weekday: Option<u8>,

    // ledger-derived aggregate
    pub status: LoanStatus,
    pub installments_paid_count: u32,
    pub next_due_date: NaiveDate,
    pub days_late: u32,
    pub accrued_mora: Money,

    // schedule anchoring
    pub custom_first_installment_date: Option<NaiveDate>,
    pub schedule_suppressed: bool,
}

impl Loan {
    /// open a new loan from its terms
    ///
    /// Starts ACTIVE with nothing paid; the first installment falls due one
    /// week after the loan date.
    pub fn open(terms: LoanTerms) -> Result<Self> {
        let quote = quote_terms(terms.principal, terms.rate_percent, terms.installment_count)?;

        Ok(Self {
            id: Uuid::new_v4(),
            principal: terms.principal,
            rate_percent: terms.rate_percent,
            mora_rate_percent: terms.mora_rate_percent,
            loan_date: terms.loan_date,
            installment_count: terms.installment_count,
            installment_amount: quote.installment_amount,
            total_payable: quote.total_payable,
            payment_weekday: terms.payment_weekday,
            status: LoanStatus::Active,
            installments_paid_count: 0,
            next_due_date: dates::add_weeks(terms.loan_date, 1),
            days_late: 0,
            accrued_mora: Money::ZERO,
            custom_first_installment_date: None,
            schedule_suppressed: false,
        })
    }

    /// check if the loan is fully paid
    pub fn is_settled(&self) -> bool {
        self.status == LoanStatus::Paid
    }

    /// fresh aggregate for this loan's terms, anchoring settings preserved
    pub fn reset_aggregate(&self) -> Self {
        let mut fresh = self.clone();
        fresh.status = LoanStatus::Active;
        fresh.installments_paid_count = 0;
        fresh.next_due_date = dates::add_weeks(self.loan_date, 1);
        fresh.days_late = 0;
        fresh.accrued_mora = Money::ZERO;
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn terms_5000_12w(loan_date: NaiveDate) -> LoanTerms {
        LoanTerms {
            principal: Money::from_major(5_000),
            rate_percent: Rate::from_percent(dec!(10)),
            mora_rate_percent: Rate::from_percent(dec!(5)),
            loan_date,
            installment_count: 12,
            payment_weekday: None,
        }
    }

    #[test]
    fn test_open_initializes_aggregate() {
        let loan = Loan::open(terms_5000_12w(d(2024, 1, 1))).unwrap();

        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.installments_paid_count, 0);
        assert_eq!(loan.next_due_date, d(2024, 1, 8));
        assert_eq!(loan.total_payable, Money::from_major(5_500));
        assert_eq!(loan.installment_amount, Money::from_str_exact("458.34").unwrap());
        assert_eq!(loan.accrued_mora, Money::ZERO);
        assert!(!loan.schedule_suppressed);
    }

    #[test]
    fn test_open_rejects_zero_installments() {
        let mut terms = terms_5000_12w(d(2024, 1, 1));
        terms.installment_count = 0;
        assert!(Loan::open(terms).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let loan = Loan::open(terms_5000_12w(d(2024, 1, 1))).unwrap();
        let json = serde_json::to_string(&loan).unwrap();
        let back: Loan = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, loan.id);
        assert_eq!(back.next_due_date, loan.next_due_date);
        assert_eq!(back.installment_amount, loan.installment_amount);
        assert_eq!(back.status, loan.status);
    }
}
