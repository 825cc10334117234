//! Currency precision and rounding.
//!
//! Every monetary component of a schedule is rounded half away from zero to the
//! configured number of decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyPrecision {
    /// Decimal places of the currency (2 for most currencies).
    pub digits: u32,
    /// Largest tolerated difference between an amount and its rounded form.
    pub epsilon: Decimal,
}

impl MoneyPrecision {
    pub fn new(digits: u32, epsilon: Decimal) -> Self {
        Self { digits, epsilon }
    }

    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.digits, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Rounds toward zero. Used for shares whose remainder is absorbed elsewhere.
    pub fn truncate(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.digits, RoundingStrategy::ToZero)
    }

    /// Amount lost or gained by rounding `amount` to the currency precision.
    pub fn residual(&self, amount: Decimal) -> Decimal {
        (amount - self.round(amount)).abs()
    }

    /// `true` when `amount` survives rounding within the tolerated epsilon.
    pub fn is_representable(&self, amount: Decimal) -> bool {
        self.residual(amount) <= self.epsilon
    }
}

impl Default for MoneyPrecision {
    fn default() -> Self {
        Self {
            digits: 2,
            epsilon: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        let precision = MoneyPrecision::default();
        assert_eq!(precision.round(dec!(10.005)), dec!(10.01));
        assert_eq!(precision.round(dec!(10.004)), dec!(10.00));
        assert_eq!(precision.round(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn representability_honours_epsilon() {
        let strict = MoneyPrecision::default();
        assert!(strict.is_representable(dec!(100000.00)));
        assert!(!strict.is_representable(dec!(100.001)));

        let tolerant = MoneyPrecision::new(2, dec!(0.001));
        assert!(tolerant.is_representable(dec!(100.001)));
        assert!(!tolerant.is_representable(dec!(100.004)));
    }
}
