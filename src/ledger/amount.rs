// ledger/amount.rs - Parse-and-validate for user-entered money amounts
//
// Raw text is never coerced to zero: anything that is not a finite decimal
// with at most minor-unit precision is rejected with a typed error.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Fractional digits allowed in an amount (cents)
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// Largest magnitude accepted for a single amount (one quadrillion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Sign rule applied after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPolicy {
    /// Strictly greater than zero (expenses, contributions)
    Positive,
    /// Zero or more (income, savings target)
    NonNegative,
    /// Any sign (expenses when refunds are enabled)
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is required")]
    Empty,

    #[error("amount must be a finite number, got '{0}'")]
    NonFinite(String),

    #[error("'{0}' is not a valid amount")]
    Invalid(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("'{0}' exceeds the largest allowed amount")]
    TooLarge(String),

    #[error("amount cannot be negative, got '{0}'")]
    Negative(String),

    #[error("amount must be greater than zero, got '{0}'")]
    NotPositive(String),
}

pub fn parse_amount(input: &str, policy: AmountPolicy) -> Result<Decimal, AmountError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(AmountError::Empty);
    }

    let unsigned = text.trim_start_matches(['+', '-']).to_ascii_lowercase();
    if matches!(unsigned.as_str(), "nan" | "inf" | "infinity") {
        return Err(AmountError::NonFinite(text.to_string()));
    }

    let value = Decimal::from_str(text).map_err(|_| AmountError::Invalid(text.to_string()))?;
    if value.normalize().scale() > MINOR_UNIT_DIGITS {
        return Err(AmountError::TooPrecise(text.to_string()));
    }
    if value.abs() > MAX_AMOUNT {
        return Err(AmountError::TooLarge(text.to_string()));
    }

    match policy {
        AmountPolicy::Positive if value <= Decimal::ZERO => {
            Err(AmountError::NotPositive(text.to_string()))
        }
        AmountPolicy::NonNegative if value.is_sign_negative() && !value.is_zero() => {
            Err(AmountError::Negative(text.to_string()))
        }
        _ => Ok(value),
    }
}

/// Render with exactly two decimals, e.g. `5000.00`
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(MINOR_UNIT_DIGITS))
}
