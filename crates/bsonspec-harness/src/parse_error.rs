//! Rejection checks for literals a parser must refuse.

use bsonspec_codec::Decimal128;

use crate::error::{HarnessError, HarnessResult};

/// High word a failed decimal128 parse must leave behind (quiet NaN).
pub const POISON_HIGH: u64 = 0x7c00_0000_0000_0000;

/// Check the outcome of a decimal128 parse that was expected to fail.
///
/// `Err` carries the value the parser produced on rejection. Both the failure
/// and the poison high word are required; the low word is unconstrained.
pub fn check_rejection(subject: &str, outcome: Result<Decimal128, Decimal128>) -> HarnessResult<()> {
    match outcome {
        Ok(value) => Err(HarnessError::ParseErrorExpectationViolated {
            subject: subject.to_string(),
            message: format!("parsed successfully as {value}"),
        }),
        Err(value) if value.high() != POISON_HIGH => {
            Err(HarnessError::ParseErrorExpectationViolated {
                subject: subject.to_string(),
                message: format!(
                    "rejected with high word {:#018x}, expected {POISON_HIGH:#018x}",
                    value.high()
                ),
            })
        }
        Err(_) => Ok(()),
    }
}

/// Parse `subject` as decimal128 and require a poisoned rejection.
pub fn check_decimal128_parse_error(subject: &str) -> HarnessResult<()> {
    check_rejection(subject, Decimal128::parse(subject).map_err(|e| e.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn malformed_literals_are_poisoned() {
        for input in ["NaN", "Inf", "", "1e", "..1", "1.2.3", " 1", "1 ", "0x1", "E5", "1E+6145"] {
            check_decimal128_parse_error(input)
                .unwrap_or_else(|e| panic!("{input:?} should be rejected: {e}"));
        }
    }

    #[test]
    fn accepted_literal_violates_expectation() {
        let err = check_decimal128_parse_error("1.0").unwrap_err();
        assert_eq!(err.kind(), FailureKind::ParseErrorExpectationViolated);
        assert!(err.to_string().contains("parsed successfully as 1.0"));
    }

    #[test]
    fn wrong_poison_violates_expectation() {
        let err = check_rejection("x", Err(Decimal128::INFINITY)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ParseErrorExpectationViolated);
        assert!(err.to_string().contains("0x7800000000000000"));
    }

    #[test]
    fn low_word_is_unconstrained() {
        assert!(check_rejection("x", Err(Decimal128::from_parts(POISON_HIGH, 7))).is_ok());
    }
}
