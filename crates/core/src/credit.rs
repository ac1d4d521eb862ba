//! Credit-hour accounting for lesson packages.
//!
//! Students buy packages of lesson hours; consumption draws the balance
//! down. The balance is the sum of signed hour deltas and may never go
//! negative.

use thiserror::Error;

/// Errors from credit operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreditError {
    /// Consumption would drive the balance below zero.
    #[error("insufficient credit balance: have {balance}, need {requested}")]
    InsufficientBalance {
        /// Current balance in hours.
        balance: i64,
        /// Hours requested.
        requested: i64,
    },

    /// Hours must be positive for both purchases and consumption requests.
    #[error("hours must be positive, got {0}")]
    NonPositiveHours(i64),
}

/// Current balance from a student's transaction history.
#[must_use]
pub fn balance(hour_deltas: impl IntoIterator<Item = i32>) -> i64 {
    hour_deltas.into_iter().map(i64::from).sum()
}

/// Checks a consumption request against the current balance.
///
/// # Errors
///
/// Returns `CreditError::NonPositiveHours` for a zero or negative request,
/// `CreditError::InsufficientBalance` when the balance cannot cover it.
pub fn check_consumption(current_balance: i64, hours: i64) -> Result<(), CreditError> {
    if hours <= 0 {
        return Err(CreditError::NonPositiveHours(hours));
    }
    if hours > current_balance {
        return Err(CreditError::InsufficientBalance {
            balance: current_balance,
            requested: hours,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_sums_signed_deltas() {
        assert_eq!(balance([10, 10, -3, -2]), 15);
        assert_eq!(balance([]), 0);
    }

    #[test]
    fn test_consumption_within_balance() {
        assert_eq!(check_consumption(10, 10), Ok(()));
        assert_eq!(check_consumption(10, 1), Ok(()));
    }

    #[test]
    fn test_consumption_over_balance_rejected() {
        assert_eq!(
            check_consumption(5, 6),
            Err(CreditError::InsufficientBalance {
                balance: 5,
                requested: 6
            })
        );
    }

    #[test]
    fn test_non_positive_hours_rejected() {
        assert_eq!(check_consumption(5, 0), Err(CreditError::NonPositiveHours(0)));
        assert_eq!(
            check_consumption(5, -1),
            Err(CreditError::NonPositiveHours(-1))
        );
    }
}
