// ledger/input.rs - Typed parsing of raw form/CLI input before it reaches the store

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::amount::{parse_amount, AmountPolicy};
use super::month::MonthKey;
use super::LedgerError;

/// Calendar date in ISO `YYYY-MM-DD` form
pub fn parse_date(input: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidDate(input.trim().to_string()))
}

pub fn parse_month(input: &str) -> Result<MonthKey, LedgerError> {
    Ok(input.parse::<MonthKey>()?)
}

/// Policy for expense amounts; refunds (negative expenses) are opt-in
pub fn expense_policy(allow_negative: bool) -> AmountPolicy {
    if allow_negative {
        AmountPolicy::Any
    } else {
        AmountPolicy::Positive
    }
}

/// Validated fields for a new expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl NewExpense {
    pub fn parse(
        amount: &str,
        category: &str,
        description: &str,
        date: &str,
        allow_negative: bool,
    ) -> Result<Self, LedgerError> {
        let category = category.trim();
        Ok(Self {
            amount: parse_amount(amount, expense_policy(allow_negative))?,
            category: if category.is_empty() { DEFAULT_CATEGORY.to_string() } else { category.to_string() },
            description: description.trim().to_string(),
            date: parse_date(date)?,
        })
    }
}

/// Validated fields for a new income entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub amount: Decimal,
    pub source: String,
    pub description: String,
    pub date: NaiveDate,
}

impl NewIncome {
    pub fn parse(amount: &str, source: &str, description: &str, date: &str) -> Result<Self, LedgerError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(LedgerError::MissingField("income source"));
        }
        Ok(Self {
            amount: parse_amount(amount, AmountPolicy::NonNegative)?,
            source: source.to_string(),
            description: description.trim().to_string(),
            date: parse_date(date)?,
        })
    }
}

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "General";

/// Suggested categories offered by the expense form
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "General",
];
