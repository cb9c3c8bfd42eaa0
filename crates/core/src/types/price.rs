//! Money represented in the currency's smallest unit.
//!
//! Catalog prices are integers (`300000` is Rp 300.000), so all arithmetic
//! stays in `i64`. Fractional rates such as tax go through
//! [`rust_decimal::Decimal`] and are rounded back to whole units.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount of money in minor units.
///
/// Serializes as a bare integer so persisted orders match the browser format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create an amount from minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, saturating on overflow.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Apply a decimal rate and round half away from zero.
    ///
    /// `Money::new(300_000).apply_rate(Decimal::new(11, 2))` is `33_000`.
    #[must_use]
    pub fn apply_rate(self, rate: Decimal) -> Self {
        let scaled = (Decimal::from(self.0) * rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self(scaled.to_i64().unwrap_or(i64::MAX))
    }

    /// Format for display in the given currency (e.g. `Rp 300.000`).
    #[must_use]
    pub fn display(self, currency: CurrencyCode) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(currency.group_separator());
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{} {grouped}", currency.symbol())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(CurrencyCode::default()))
    }
}

impl From<i64> for Money {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

/// ISO 4217 currency codes the store can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    IDR,
    USD,
    EUR,
    SGD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::IDR => "Rp",
            Self::USD => "$",
            Self::EUR => "€",
            Self::SGD => "S$",
        }
    }

    const fn group_separator(self) -> char {
        match self {
            Self::IDR | Self::EUR => '.',
            Self::USD | Self::SGD => ',',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::new(300_000).to_string(), "Rp 300.000");
        assert_eq!(Money::new(1_250_000).to_string(), "Rp 1.250.000");
        assert_eq!(Money::new(999).to_string(), "Rp 999");
        assert_eq!(Money::ZERO.to_string(), "Rp 0");
    }

    #[test]
    fn test_display_other_currency() {
        assert_eq!(Money::new(1_500).display(CurrencyCode::USD), "$ 1,500");
        assert_eq!(Money::new(-2_000).display(CurrencyCode::IDR), "-Rp 2.000");
    }

    #[test]
    fn test_apply_rate_rounds_half_away_from_zero() {
        let rate = Decimal::new(11, 2);
        assert_eq!(Money::new(300_000).apply_rate(rate), Money::new(33_000));
        // 50 * 0.11 = 5.5
        assert_eq!(Money::new(50).apply_rate(rate), Money::new(6));
        // 14 * 0.11 = 1.54
        assert_eq!(Money::new(14).apply_rate(rate), Money::new(2));
        assert_eq!(Money::new(13).apply_rate(rate), Money::new(1));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Money = [Money::new(300_000).times(2), Money::new(80_000)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(680_000));
    }

    #[test]
    fn test_times_saturates() {
        assert_eq!(Money::new(i64::MAX).times(2), Money::new(i64::MAX));
    }
}
