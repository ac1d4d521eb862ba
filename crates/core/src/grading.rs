//! Grading rules: score validation and report averages.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from validating a grade score.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradeError {
    /// Scores are on a 0 to 100 scale.
    #[error("score must be between 0 and 100, got {0}")]
    OutOfRange(Decimal),

    /// Scores carry at most two decimal places.
    #[error("score must have at most 2 decimal places, got {0}")]
    TooPrecise(Decimal),
}

/// Validates a score on the 0..=100 scale with at most 2 decimal places.
///
/// # Errors
///
/// Returns `GradeError` when out of range or too precise.
pub fn validate_score(score: Decimal) -> Result<(), GradeError> {
    if score < Decimal::ZERO || score > Decimal::from(100) {
        return Err(GradeError::OutOfRange(score));
    }
    if score.round_dp(2) != score {
        return Err(GradeError::TooPrecise(score));
    }
    Ok(())
}

/// Average of a set of scores, rounded to 2 decimal places.
///
/// Returns `None` for an empty set rather than dividing by zero.
#[must_use]
pub fn average(scores: &[Decimal]) -> Option<Decimal> {
    if scores.is_empty() {
        return None;
    }
    let sum: Decimal = scores.iter().copied().sum();
    Some((sum / Decimal::from(scores.len())).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(100))]
    #[case(dec!(87.5))]
    #[case(dec!(99.99))]
    fn test_valid_scores(#[case] score: Decimal) {
        assert_eq!(validate_score(score), Ok(()));
    }

    #[rstest]
    #[case(dec!(-0.01))]
    #[case(dec!(100.01))]
    fn test_out_of_range_rejected(#[case] score: Decimal) {
        assert_eq!(validate_score(score), Err(GradeError::OutOfRange(score)));
    }

    #[test]
    fn test_too_precise_rejected() {
        assert_eq!(
            validate_score(dec!(87.555)),
            Err(GradeError::TooPrecise(dec!(87.555)))
        );
    }

    #[test]
    fn test_average_rounds_to_two_places() {
        let scores = [dec!(80), dec!(85), dec!(90)];
        assert_eq!(average(&scores), Some(dec!(85)));

        let scores = [dec!(80), dec!(85)];
        assert_eq!(average(&scores), Some(dec!(82.5)));

        let scores = [dec!(70), dec!(80), dec!(95)];
        assert_eq!(average(&scores), Some(dec!(81.67)));
    }

    #[test]
    fn test_average_of_empty_is_none() {
        assert_eq!(average(&[]), None);
    }
}
