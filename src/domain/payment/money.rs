//! Money and currency value objects.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Currencies whose smallest unit is the major unit (no cents).
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

/// Largest accepted amount in major units.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// ISO-4217 alphabetic currency code, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a three-letter code such as `inr` or `USD`.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                format!("expected a 3-letter ISO code, got '{}'", code),
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of decimal places in the currency's minor unit.
    pub fn minor_unit_exponent(&self) -> u32 {
        if ZERO_DECIMAL_CURRENCIES.contains(&self.0.as_str()) {
            0
        } else {
            2
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strictly positive amount in a specific currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

impl Money {
    /// Creates a payable amount. Zero, negative and amounts above
    /// [`MAX_AMOUNT`] are rejected.
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Result<Self, ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::not_positive("amount", amount));
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("must not exceed {}", MAX_AMOUNT),
            ));
        }
        Ok(Self { amount, currency })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Amount in the currency's smallest unit (paise, cents, yen).
    ///
    /// Fractions below the minor unit round half away from zero.
    pub fn to_minor_units(&self) -> Result<i64, ValidationError> {
        let scale = Decimal::from(10_i64.pow(self.currency.minor_unit_exponent()));
        (self.amount * scale)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| {
                ValidationError::invalid_format("amount", "too large for minor units")
            })
    }

    /// Major-unit amount with exactly the currency's decimal places, e.g. `"499.00"`.
    pub fn to_major_string(&self) -> String {
        let places = self.currency.minor_unit_exponent();
        let rounded = self
            .amount
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", places as usize, rounded)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_major_string(), self.currency)
    }
}
