//! # Currency
//!
//! ISO 4217 currencies accepted at checkout. The provider quotes amounts in
//! major units with a fixed number of minor-unit digits per currency.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    BRL,
    USD,
    EUR,
    GBP,
    ARS,
    MXN,
    JPY,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::ARS => "ARS",
            Currency::MXN => "MXN",
            Currency::JPY => "JPY",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// True when `amount` can be expressed in this currency's minor unit
    /// without rounding.
    pub fn fits_minor_unit(&self, amount: Decimal) -> bool {
        amount.normalize().scale() <= self.decimal_places()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::BRL
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Currency::BRL),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "ARS" => Ok(Currency::ARS),
            "MXN" => Ok(Currency::MXN),
            "JPY" => Ok(Currency::JPY),
            other => Err(format!("unsupported currency: {}", other)),
        }
    }
}
