//! Money type for representing monetary values.
//!
//! Amounts are integers in the smallest unit of the currency. Chilean pesos
//! have no minor unit, so a CLP amount is simply a number of pesos.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Chilean peso.
    #[default]
    CLP,
    /// US dollar.
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "CLP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CLP => "CLP",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CLP => "$",
            Currency::USD => "US$",
        }
    }

    /// Number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::CLP => 0,
            Currency::USD => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "CLP" => Some(Currency::CLP),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub const fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Shorthand for a peso amount.
    pub const fn clp(amount: i64) -> Self {
        Self::new(amount, Currency::CLP)
    }

    /// Create a zero amount in the given currency.
    pub const fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values, failing on mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Ratio of this amount to another as a percentage (0 when `whole` is zero).
    pub fn percent_of(&self, whole: &Money) -> f64 {
        if whole.amount == 0 {
            return 0.0;
        }
        self.amount as f64 / whole.amount as f64 * 100.0
    }

    /// Format as a display string (e.g., "$52.990").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format without symbol, using `.` for thousands and `,` for decimals.
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10_i64.pow(places);
        let abs = self.amount.unsigned_abs();
        let whole = abs / divisor as u64;
        let fraction = abs % divisor as u64;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.amount < 0 { "-" } else { "" };
        if places == 0 {
            format!("{sign}{grouped}")
        } else {
            format!("{sign}{grouped},{fraction:0width$}", width = places as usize)
        }
    }
}

impl Add for Money {
    type Output = Money;

    /// # Panics
    /// Panics on currency mismatch. Use `try_add` in fallible paths.
    fn add(self, other: Money) -> Money {
        self.try_add(&other).expect("Currency mismatch in addition")
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        self.try_subtract(&other)
            .expect("Currency mismatch in subtraction")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Serde adapter for API payloads that carry prices as bare peso integers.
///
/// ```rust,ignore
/// #[serde(with = "aurum_commerce::money::as_clp")]
/// pub price: Money,
/// ```
pub mod as_clp {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(money.amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        i64::deserialize(deserializer).map(Money::clp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Priced {
        #[serde(with = "as_clp")]
        price: Money,
    }

    #[test]
    fn test_as_clp_reads_bare_integer() {
        let priced: Priced = serde_json::from_str(r#"{"price": 45990}"#).unwrap();
        assert_eq!(priced.price, Money::clp(45990));
        assert_eq!(serde_json::to_string(&priced).unwrap(), r#"{"price":45990}"#);
    }

    #[test]
    fn test_clp_display_groups_thousands() {
        assert_eq!(Money::clp(52990).display(), "$52.990");
        assert_eq!(Money::clp(1_250_000).display(), "$1.250.000");
        assert_eq!(Money::clp(990).display(), "$990");
        assert_eq!(Money::clp(0).display(), "$0");
    }

    #[test]
    fn test_usd_display_has_decimals() {
        assert_eq!(Money::new(123456, Currency::USD).display(), "US$1.234,56");
        assert_eq!(Money::new(5, Currency::USD).display_amount(), "0,05");
    }

    #[test]
    fn test_negative_display() {
        assert_eq!(Money::clp(-5000).display_amount(), "-5.000");
    }

    #[test]
    fn test_try_add_rejects_currency_mismatch() {
        let clp = Money::clp(1000);
        let usd = Money::new(1000, Currency::USD);
        assert!(clp.try_add(&usd).is_none());
        assert_eq!(clp.try_add(&clp), Some(Money::clp(2000)));
    }

    #[test]
    fn test_try_multiply_overflow() {
        assert!(Money::clp(i64::MAX).try_multiply(2).is_none());
        assert_eq!(Money::clp(2500).try_multiply(3), Some(Money::clp(7500)));
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::clp(100), Money::clp(250), Money::clp(50)];
        assert_eq!(
            Money::try_sum(values.iter(), Currency::CLP),
            Some(Money::clp(400))
        );
    }

    #[test]
    fn test_percent_of() {
        assert!((Money::clp(25).percent_of(&Money::clp(100)) - 25.0).abs() < f64::EPSILON);
        assert_eq!(Money::clp(25).percent_of(&Money::clp(0)), 0.0);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("clp"), Some(Currency::CLP));
        assert_eq!(Currency::from_code("EUR"), None);
    }
}
