//! Type-safe price representation using decimal arithmetic.
//!
//! The shop trades in US dollars only, so a price is a bare decimal amount.
//! The backend sends prices as JSON numbers (occasionally as strings); both
//! are accepted, and prices are written back as JSON numbers.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A price in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Price of `quantity` units, clamped to the representable range.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format as US currency with thousands separators, e.g. `$1,234.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let plain = format!("{:.2}", rounded.abs());
        let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}${grouped}.{cents}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    // Amounts come from backend JSON, so they may sit at the decimal limit
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_usd() {
        assert_eq!(Price::from_cents(0).display(), "$0.00");
        assert_eq!(Price::from_cents(999).display(), "$9.99");
        assert_eq!(Price::from_cents(123_450).display(), "$1,234.50");
        assert_eq!(Price::from_cents(100_000_000).display(), "$1,000,000.00");
        assert_eq!(Price::from_cents(-2_500).display(), "-$25.00");
    }

    #[test]
    fn test_display_rounds_half_up() {
        let price = Price::new(Decimal::new(10_005, 3));
        assert_eq!(price.display(), "$10.01");
    }

    #[test]
    fn test_sum_and_times_are_exact() {
        let lines = [
            Price::from_cents(10).times(3),
            Price::from_cents(20),
            Price::from_cents(1_999) * 2,
        ];
        let total: Price = lines.into_iter().sum();
        assert_eq!(total, Price::from_cents(4_048));
    }

    #[test]
    fn test_arithmetic_saturates_at_decimal_limit() {
        let huge: Price = serde_json::from_str("\"79228162514264337593543950335\"").unwrap();
        assert_eq!(huge, Price::new(Decimal::MAX));

        assert_eq!(huge.times(2), Price::new(Decimal::MAX));
        assert_eq!(huge + Price::from_cents(1), Price::new(Decimal::MAX));
        let total: Price = [huge, huge, Price::from_cents(500)].into_iter().sum();
        assert_eq!(total, Price::new(Decimal::MAX));

        let negative = Price::new(Decimal::MIN);
        assert_eq!(negative.times(3), Price::new(Decimal::MIN));
    }

    #[test]
    fn test_is_positive() {
        assert!(Price::from_cents(1).is_positive());
        assert!(!Price::ZERO.is_positive());
        assert!(!Price::from_cents(-1).is_positive());
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let from_float: Price = serde_json::from_str("19.99").unwrap();
        let from_int: Price = serde_json::from_str("20").unwrap();
        let from_str: Price = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(from_float, Price::from_cents(1_999));
        assert_eq!(from_int, Price::from_cents(2_000));
        assert_eq!(from_str, Price::from_cents(1_999));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_value(Price::from_cents(1_250)).unwrap();
        assert_eq!(json, serde_json::json!(12.5));
    }
}
