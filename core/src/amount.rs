//! # Exact Money Amounts
//!
//! A transfer amount enters the system as a decimal string ("25.00"),
//! travels to the payment rail as the same string, and lands in the ledger
//! as the same string. [`Amount`] wraps [`rust_decimal::Decimal`] so that
//! chain never passes through binary floating point: `f64` cannot
//! represent 0.10, and a ledger that drifts by rounding is worse than no
//! ledger at all.
//!
//! Validation happens once, at parse time: positive, at most
//! [`AMOUNT_SCALE`](crate::config::AMOUNT_SCALE) fractional digits, plain
//! decimal notation. After that the value is exact and immutable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::AMOUNT_SCALE;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced when parsing a transfer amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The string is not plain decimal notation.
    #[error("amount is not a decimal number: {input:?}")]
    Unparseable {
        /// The offending input.
        input: String,
    },

    /// Zero and negative amounts cannot be transferred.
    #[error("amount must be positive, got {input:?}")]
    NotPositive {
        /// The offending input.
        input: String,
    },

    /// More fractional digits than the currency supports.
    #[error("amount has {scale} fractional digits, currency allows {AMOUNT_SCALE}")]
    TooPrecise {
        /// Fractional digits found in the input.
        scale: u32,
    },
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A validated, currency-scale-exact transfer amount.
///
/// Parsing preserves the written scale: `"25.00"` round-trips as `"25.00"`,
/// not `"25"`. Equality is numeric (`"25.0" == "25.00"`), which is what a
/// ledger comparison wants.
///
/// # Examples
///
/// ```
/// use meridian_core::amount::Amount;
///
/// let amount: Amount = "25.00".parse().unwrap();
/// assert_eq!(amount.to_string(), "25.00");
/// assert!("0.00".parse::<Amount>().is_err());
/// assert!("19.999".parse::<Amount>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Amount {
    /// The exact decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str_exact(s.trim()).map_err(|_| AmountError::Unparseable {
            input: s.to_string(),
        })?;
        if value.is_zero() || value.is_sign_negative() {
            return Err(AmountError::NotPositive {
                input: s.to_string(),
            });
        }
        if value.scale() > AMOUNT_SCALE {
            return Err(AmountError::TooPrecise {
                scale: value.scale(),
            });
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
