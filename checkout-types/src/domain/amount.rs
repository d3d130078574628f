//! Type-safe cryptocurrency amount with embedded currency.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::Currency;

/// A cryptocurrency amount stored in the currency's smallest unit
/// (satoshi, luna, etc.) to avoid floating-point precision issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    units: i64,
    currency: Currency,
}

impl Amount {
    /// Creates an Amount from a smallest-unit count.
    pub fn from_units(units: i64, currency: Currency) -> Self {
        Self { units, currency }
    }

    /// Creates an Amount from a display-unit value (e.g. `0.00123456` BTC).
    ///
    /// The value is scaled to smallest units and rounded half away from
    /// zero, so `from_display` is exact at the currency's precision.
    pub fn from_display(value: f64, currency: Currency) -> Self {
        let units = (value * currency.unit_multiplier() as f64).round() as i64;
        Self { units, currency }
    }

    /// Creates a zero-value Amount for the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            units: 0,
            currency,
        }
    }

    /// Returns the amount in smallest units.
    pub fn units(&self) -> i64 {
        self.units
    }

    /// Returns the amount in display units.
    pub fn to_display(&self) -> f64 {
        self.units as f64 / self.currency.unit_multiplier() as f64
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    /// Checked addition - returns None if currencies don't match or the
    /// sum overflows.
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        if self.currency != other.currency {
            return None;
        }
        Some(Amount {
            units: self.units.checked_add(other.units)?,
            currency: self.currency,
        })
    }
}

impl fmt::Display for Amount {
    /// Renders with the currency's full decimal count, independent of the
    /// host's numeric formatting (`0.00123456` rather than `1.23456e-3`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let multiplier = self.currency.unit_multiplier();
        let sign = if self.units < 0 { "-" } else { "" };
        let abs = self.units.unsigned_abs();
        let major = abs / multiplier as u64;
        let minor = abs % multiplier as u64;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            major,
            minor,
            width = self.currency.decimals() as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_display_btc() {
        let amount = Amount::from_display(0.00123456, Currency::BTC);
        assert_eq!(amount.units(), 123_456);
    }

    #[test]
    fn test_from_display_rounds_half_away_from_zero() {
        // 1.234567 8 NIM at 5 decimals scales to 123456.78 luna
        let amount = Amount::from_display(1.2345678, Currency::NIM);
        assert_eq!(amount.units(), 123_457);
    }

    #[test]
    fn test_display_full_precision() {
        let amount = Amount::from_units(123_456, Currency::BTC);
        assert_eq!(amount.to_string(), "0.00123456");
    }

    #[test]
    fn test_display_negative_subunit() {
        let amount = Amount::from_units(-50_000, Currency::USDC);
        assert_eq!(amount.to_string(), "-0.050000");
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let btc = Amount::from_units(100, Currency::BTC);
        let nim = Amount::from_units(100, Currency::NIM);
        assert!(btc.checked_add(nim).is_none());
    }

    #[test]
    fn test_checked_add() {
        let a = Amount::from_units(100, Currency::BTC);
        let b = Amount::from_units(50, Currency::BTC);
        assert_eq!(a.checked_add(b).unwrap().units(), 150);
    }

    #[test]
    fn test_round_trip_at_precision() {
        let amount = Amount::from_display(1.23456789, Currency::BTC);
        assert_eq!(amount.to_string(), "1.23456789");
    }
}
