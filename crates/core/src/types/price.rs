//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as plain JSON numbers in the persisted cart and in the
//! catalog file, so [`Price`] serializes to a bare number rather than the
//! string form `rust_decimal` uses by default. Fractional amounts travel as
//! `f64`, so a price is only valid if it survives that trip unchanged.

use core::fmt;
use core::ops::Mul;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),

    /// The amount has more precision than a JSON number keeps.
    #[error("price {0} cannot be stored as a JSON number without losing precision")]
    Unrepresentable(Decimal),
}

/// A non-negative, currency-agnostic unit price.
///
/// Currency only matters for display, see [`Price::display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero and
    /// [`PriceError::Unrepresentable`] if serializing it would round it.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if !survives_json(amount) {
            return Err(PriceError::Unrepresentable(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole amount.
    #[must_use]
    pub fn from_whole(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `₦2,000` or `$1,234.5`.
    ///
    /// Uses grouping separators and drops trailing fractional zeros. No
    /// rounding is applied.
    #[must_use]
    pub fn display(&self, currency: CurrencyCode) -> String {
        let normalized = self.0.normalize().to_string();
        let (whole, fraction) = normalized
            .split_once('.')
            .map_or((normalized.as_str(), None), |(w, f)| (w, Some(f)));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        match fraction {
            Some(f) => format!("{}{grouped}.{f}", currency.symbol()),
            None => format!("{}{grouped}", currency.symbol()),
        }
    }
}

/// Whether `amount` reads back unchanged after [`Price`]'s serialization.
///
/// Whole amounts within `i64` are written as integers. Everything else goes
/// through `f64`, and `rust_decimal` reads floats back via their shortest
/// decimal form.
fn survives_json(amount: Decimal) -> bool {
    if amount.fract().is_zero() && amount.to_i64().is_some() {
        return true;
    }
    amount
        .to_f64()
        .and_then(|f| f.to_string().parse::<Decimal>().ok())
        .is_some_and(|back| back == amount)
}

impl Mul<u32> for Price {
    type Output = Decimal;

    fn mul(self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole amounts stay integers so the stored JSON matches what the
        // catalog file and other readers of the slot expect.
        if self.0.fract().is_zero()
            && let Some(whole) = self.0.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// ISO 4217 currency codes used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    NGN,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::NGN => "₦",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl core::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NGN" => Ok(Self::NGN),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}
