use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::MonthKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl Expense {
    /// Expenses carry no stored key; their month is read off the calendar date
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

/// Partial edit of an expense. There is no id field, so ids cannot be reassigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    pub(crate) fn apply_to(self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

/// Income entry. `month` is fixed at creation and always equals `MonthKey::of(date)`;
/// neither field is editable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub amount: Decimal,
    pub source: String,
    pub description: String,
    pub date: NaiveDate,
    pub month: MonthKey,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub target_amount: Decimal,
    /// Running total of all contributions currently present
    pub current_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsContribution {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub month: MonthKey,
}

/// Per-category expense total for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Dashboard figures for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
    /// income - expenses - savings; negative means over budget
    pub balance: Decimal,
}

impl MonthlySummary {
    pub fn is_over_budget(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}
