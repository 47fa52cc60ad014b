//! Price type for catalog amounts.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues. Catalog prices are never negative.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative catalog price stored in cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from cents. Negative amounts are clamped to zero.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents.max(0))
    }

    /// Amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Parse a decimal amount such as `"49"`, `"49.9"` or `"49.99"`.
    ///
    /// Digits past the cent are rounded to the nearest cent, half up.
    /// Returns `None` for anything that is not a plain non-negative decimal.
    pub fn parse(input: &str) -> Option<Self> {
        Self::parse_rounded(input, Rounding::Nearest)
    }

    /// Parse a decimal amount, resolving sub-cent digits with `rounding`.
    ///
    /// Amounts too large for the cent representation saturate.
    pub fn parse_rounded(input: &str, rounding: Rounding) -> Option<Self> {
        let s = input.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let cents = whole
            .bytes()
            .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(2))
            .fold(0i64, |acc, b| {
                acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
            });
        let rest = frac.get(2..).unwrap_or("");
        let bump = match rounding {
            Rounding::Down => false,
            Rounding::Up => rest.bytes().any(|b| b != b'0'),
            Rounding::Nearest => rest.bytes().next().is_some_and(|b| b >= b'5'),
        };

        Some(Self(if bump { cents.saturating_add(1) } else { cents }))
    }

    /// Canonical query-string form: `"20"` for whole amounts, `"19.90"` otherwise.
    pub fn to_query_value(&self) -> String {
        if self.0 % 100 == 0 {
            format!("{}", self.0 / 100)
        } else {
            format!("{}.{:02}", self.0 / 100, self.0 % 100)
        }
    }

    /// Format for display (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// How sub-cent digits are resolved when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Truncate toward zero. Used for upper bounds.
    Down,
    /// Round up to the next cent. Used for lower bounds.
    Up,
    /// Nearest cent, half up.
    Nearest,
}

/// An inclusive price interval, as reported by the price facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl PriceRange {
    pub fn new(min: Price, max: Price) -> Self {
        Self { min, max }
    }

    /// Widen the range so it covers `price`.
    pub fn include(self, price: Price) -> Self {
        Self {
            min: self.min.min(price),
            max: self.max.max(price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_parse_whole_and_fraction() {
        assert_eq!(Price::parse("20"), Some(Price::from_cents(2000)));
        assert_eq!(Price::parse("19.9"), Some(Price::from_cents(1990)));
        assert_eq!(Price::parse("19.99"), Some(Price::from_cents(1999)));
        assert_eq!(Price::parse(".5"), Some(Price::from_cents(50)));
        assert_eq!(Price::parse(" 7 "), Some(Price::from_cents(700)));
    }

    #[test]
    fn test_price_parse_rejects_malformed() {
        assert_eq!(Price::parse(""), None);
        assert_eq!(Price::parse("."), None);
        assert_eq!(Price::parse("abc"), None);
        assert_eq!(Price::parse("-5"), None);
        assert_eq!(Price::parse("1.2.3"), None);
        assert_eq!(Price::parse("1e3"), None);
        assert_eq!(Price::parse("1.x"), None);
    }

    #[test]
    fn test_price_parse_sub_cent_digits() {
        assert_eq!(Price::parse("1.234"), Some(Price::from_cents(123)));
        assert_eq!(Price::parse("1.235"), Some(Price::from_cents(124)));
        assert_eq!(Price::parse_rounded("19.999", Rounding::Down), Some(Price::from_cents(1999)));
        assert_eq!(Price::parse_rounded("19.991", Rounding::Up), Some(Price::from_cents(2000)));
        assert_eq!(Price::parse_rounded("19.990000", Rounding::Up), Some(Price::from_cents(1999)));
        assert_eq!(Price::parse_rounded("0.0001", Rounding::Down), Some(Price::from_cents(0)));
    }

    #[test]
    fn test_price_parse_saturates() {
        assert_eq!(Price::parse("99999999999999999999"), Some(Price::from_cents(i64::MAX)));
        assert_eq!(
            Price::parse_rounded("92233720368547758.079", Rounding::Up),
            Some(Price::from_cents(i64::MAX))
        );
    }

    #[test]
    fn test_price_query_value_is_canonical() {
        assert_eq!(Price::from_cents(2000).to_query_value(), "20");
        assert_eq!(Price::from_cents(1990).to_query_value(), "19.90");
        assert_eq!(Price::from_cents(5).to_query_value(), "0.05");
        let reparsed = Price::parse(&Price::from_cents(1990).to_query_value());
        assert_eq!(reparsed, Some(Price::from_cents(1990)));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(4999).display(), "$49.99");
        assert_eq!(Price::from_cents(-10), Price::from_cents(0));
    }

    #[test]
    fn test_price_range_include() {
        let range = PriceRange::new(Price::from_cents(500), Price::from_cents(500))
            .include(Price::from_cents(100))
            .include(Price::from_cents(900));
        assert_eq!(range.min.cents(), 100);
        assert_eq!(range.max.cents(), 900);
    }
}
