// ledger/mod.rs - Expenses, income and savings with monthly aggregation

use thiserror::Error;

pub mod amount;
pub mod input;
pub mod models;
pub mod month;
pub mod store;

pub use amount::{format_amount, parse_amount, AmountError, AmountPolicy};
pub use models::{
    CategoryTotal, Expense, ExpenseUpdate, Income, MonthlySummary, SavingsContribution, SavingsGoal,
};
pub use month::{MonthKey, MonthKeyError};
pub use store::{LedgerState, LedgerStore};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("Invalid amount: {0}")]
    Amount(#[from] AmountError),

    #[error("Invalid month: {0}")]
    InvalidMonth(#[from] MonthKeyError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}
