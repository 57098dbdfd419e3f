use rust_decimal::{Decimal, RoundingStrategy};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::TermsQuote;

/// quote total payable and per-installment amount for a prospective loan
///
/// `total_payable = principal × (1 + rate)`; simple interest, never
/// compounded. The installment amount is rounded up to the cent so that
/// `installment_count` full installments always cover the total.
pub fn quote_terms(principal: Money, rate: Rate, installment_count: u32) -> Result<TermsQuote> {
    if !principal.is_positive() {
        return Err(LoanError::InvalidTerms {
            message: format!("principal must be positive, got {}", principal),
        });
    }
    if installment_count == 0 {
        return Err(LoanError::InvalidTerms {
            message: "installment count must be at least 1".to_string(),
        });
    }

    let total_payable = principal + principal.percentage(rate.as_percent());
    // divide on raw decimals; Money arithmetic rounds to the cent, which
    // would swallow the round-up
    let per_installment = total_payable.as_decimal() / Decimal::from(installment_count);
    let installment_amount = Money::from_decimal(
        per_installment.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity),
    );

    Ok(TermsQuote {
        total_payable,
        installment_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_5000_at_10_percent_over_12_weeks() {
        let quote = quote_terms(
            Money::from_major(5_000),
            Rate::from_percent(dec!(10)),
            12,
        )
        .unwrap();

        assert_eq!(quote.total_payable, Money::from_major(5_500));
        // 5500 / 12 = 458.333..., rounded up to the cent
        assert_eq!(quote.installment_amount, Money::from_str_exact("458.34").unwrap());
    }

    #[test]
    fn test_installments_cover_total() {
        let quote = quote_terms(
            Money::from_major(7_000),
            Rate::from_percent(dec!(15)),
            13,
        )
        .unwrap();

        let covered = quote.installment_amount * dec!(13);
        assert!(covered >= quote.total_payable);
    }

    #[test]
    fn test_exact_division_not_inflated() {
        let quote = quote_terms(
            Money::from_major(1_000),
            Rate::from_percent(dec!(20)),
            12,
        )
        .unwrap();

        // 1200 / 12 = 100 exactly
        assert_eq!(quote.installment_amount, Money::from_major(100));
    }

    #[test]
    fn test_rejects_bad_terms() {
        assert!(quote_terms(Money::ZERO, Rate::from_percent(dec!(10)), 12).is_err());
        assert!(quote_terms(Money::from_major(-100), Rate::from_percent(dec!(10)), 12).is_err());
        assert!(quote_terms(Money::from_major(5_000), Rate::from_percent(dec!(10)), 0).is_err());
    }
}
