//! Revenue/tax split for invoice posting.
//!
//! An invoice amount is gross: it contains output tax at a configured rate.
//! The split separates the net revenue portion from the tax portion so the
//! two credit lines sum exactly to the gross amount.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from constructing a revenue split.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Tax rate must be in `[0, 1)`.
    #[error("tax rate must be at least 0 and below 1, got {0}")]
    InvalidRate(Decimal),
}

/// Amounts produced by splitting a gross invoice amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitAmounts {
    /// Net revenue portion.
    pub net: Decimal,
    /// Output tax portion. `net + tax` equals the gross amount exactly.
    pub tax: Decimal,
}

/// Splits gross amounts into net revenue and output tax at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueSplit {
    tax_rate: Decimal,
}

impl RevenueSplit {
    /// Creates a split with the given tax rate (e.g. `0.11` for 11% VAT).
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidRate` if the rate is negative or >= 1.
    pub fn new(tax_rate: Decimal) -> Result<Self, SplitError> {
        if tax_rate < Decimal::ZERO || tax_rate >= Decimal::ONE {
            return Err(SplitError::InvalidRate(tax_rate));
        }
        Ok(Self { tax_rate })
    }

    /// Returns the configured tax rate.
    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Splits a gross amount.
    ///
    /// The net portion is rounded to 2 decimal places and the tax portion is
    /// the exact remainder, so `net + tax == amount` always holds.
    #[must_use]
    pub fn split(&self, amount: Decimal) -> SplitAmounts {
        let net = (amount * (Decimal::ONE - self.tax_rate)).round_dp(2);
        let tax = amount - net;
        SplitAmounts { net, tax }
    }
}

impl Default for RevenueSplit {
    /// 11% output tax, the Indonesian PPN rate.
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(11, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_rate_splits_89_11() {
        let split = RevenueSplit::default().split(dec!(1_000_000));
        assert_eq!(split.net, dec!(890_000));
        assert_eq!(split.tax, dec!(110_000));
    }

    #[test]
    fn test_zero_rate_keeps_everything_net() {
        let split = RevenueSplit::new(Decimal::ZERO).unwrap().split(dec!(500));
        assert_eq!(split.net, dec!(500));
        assert_eq!(split.tax, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_rate_of_one_or_more() {
        assert_eq!(
            RevenueSplit::new(Decimal::ONE),
            Err(SplitError::InvalidRate(Decimal::ONE))
        );
        assert!(RevenueSplit::new(dec!(1.5)).is_err());
    }

    #[test]
    fn test_rejects_negative_rate() {
        assert!(RevenueSplit::new(dec!(-0.1)).is_err());
    }

    #[test]
    fn test_odd_amount_remainder_goes_to_tax() {
        // 89% of 100.01 is 89.0089, rounded to 89.01
        let split = RevenueSplit::default().split(dec!(100.01));
        assert_eq!(split.net, dec!(89.01));
        assert_eq!(split.tax, dec!(11.00));
        assert_eq!(split.net + split.tax, dec!(100.01));
    }

    proptest! {
        /// For any gross amount and valid rate, net + tax reconstructs the
        /// amount exactly.
        #[test]
        fn prop_split_sums_to_amount(
            cents in 0i64..1_000_000_000,
            rate_bp in 0u32..9_999,
        ) {
            let amount = Decimal::new(cents, 2);
            let rate = Decimal::new(i64::from(rate_bp), 4);
            let split = RevenueSplit::new(rate).unwrap().split(amount);
            prop_assert_eq!(split.net + split.tax, amount);
        }
    }
}
