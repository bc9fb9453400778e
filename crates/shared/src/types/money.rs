//! US dollar amounts for display.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; this module only formats them.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A US dollar amount.
///
/// Displays as `$1,234.56`, with a leading minus for negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usd(pub Decimal);

impl Usd {
    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the amount rounded to whole cents (half away from zero).
    #[must_use]
    pub fn cents(self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl From<Decimal> for Usd {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = self.cents();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let text = format!("{:.2}", rounded.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        write!(f, "{sign}${grouped}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "$0.00")]
    #[case(dec!(5), "$5.00")]
    #[case(dec!(999.9), "$999.90")]
    #[case(dec!(1000), "$1,000.00")]
    #[case(dec!(200.01), "$200.01")]
    #[case(dec!(1234567.891), "$1,234,567.89")]
    #[case(dec!(-1500.5), "-$1,500.50")]
    #[case(dec!(0.005), "$0.01")]
    #[case(dec!(-0.001), "$0.00")]
    fn test_display(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(Usd(amount).to_string(), expected);
    }

    #[test]
    fn test_cents_rounds_half_away_from_zero() {
        assert_eq!(Usd(dec!(10.125)).cents(), dec!(10.13));
        assert_eq!(Usd(dec!(-10.125)).cents(), dec!(-10.13));
    }
}
