use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{allow_negative_expenses, today};
use crate::cli::utils::{money, open_authenticated, output_collection, output_success, parse_id, resolve_month};
use crate::cli::OutputFormat;
use crate::ledger::input::{expense_policy, parse_date, NewExpense, EXPENSE_CATEGORIES};
use crate::ledger::{parse_amount, ExpenseUpdate};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    #[command(about = "Record an expense")]
    Add {
        #[arg(help = "Amount, e.g. 12.50", allow_hyphen_values = true)]
        amount: String,
        #[arg(long, short, default_value = "", help = "Category (defaults to General)")]
        category: String,
        #[arg(long, short, default_value = "", help = "Description")]
        description: String,
        #[arg(long, help = "Date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },

    #[command(about = "List expenses for a month")]
    List {
        #[arg(long, help = "Month as YYYY-MM (defaults to the current month)")]
        month: Option<String>,
        #[arg(long, conflicts_with = "month", help = "List every expense")]
        all: bool,
    },

    #[command(about = "Change fields of an expense")]
    Edit {
        #[arg(help = "Expense id")]
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Date as YYYY-MM-DD")]
        date: Option<String>,
    },

    #[command(about = "Delete an expense")]
    Delete {
        #[arg(help = "Expense id")]
        id: String,
    },

    #[command(about = "Show suggested categories")]
    Categories,
}

pub async fn handle(cmd: ExpenseCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    if let ExpenseCommands::Categories = cmd {
        return output_collection(
            &output_format,
            "categories",
            json!(EXPENSE_CATEGORIES),
            EXPENSE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            "",
            None,
        );
    }

    let mut ctx = open_authenticated()?;

    match cmd {
        ExpenseCommands::Add { amount, category, description, date } => {
            let date = date.unwrap_or_else(|| today().to_string());
            let input = NewExpense::parse(&amount, &category, &description, &date, allow_negative_expenses())?;
            let expense = ctx.require_ledger_mut()?.add_expense(
                input.amount,
                input.category,
                input.description,
                input.date,
            )?;
            output_success(
                &output_format,
                &format!("Added expense {} {} ({})", money(expense.amount), expense.category, expense.id),
                Some(json!({ "expense": expense })),
            )
        }
        ExpenseCommands::List { month, all } => {
            let ledger = ctx.ledger();
            let (expenses, scope): (Vec<_>, String) = if all {
                (ledger.expenses().iter().collect(), "all time".to_string())
            } else {
                let month = resolve_month(month.as_deref())?;
                (ledger.expenses_for_month(month).collect(), month.to_string())
            };
            let total: rust_decimal::Decimal = expenses.iter().map(|e| e.amount).sum();

            let mut rows: Vec<String> = expenses
                .iter()
                .map(|e| format!("{}  {}  {:<14} {:>12}  {}", e.id, e.date, e.category, money(e.amount), e.description))
                .collect();
            if !rows.is_empty() {
                rows.push(format!("Total ({}): {}", scope, money(total)));
            }

            output_collection(
                &output_format,
                "expenses",
                json!(expenses),
                rows,
                &format!("No expenses for {}", scope),
                Some(json!({ "total": total, "scope": scope })),
            )
        }
        ExpenseCommands::Edit { id, amount, category, description, date } => {
            let id = parse_id(&id)?;
            let update = ExpenseUpdate {
                amount: amount
                    .map(|a| parse_amount(&a, expense_policy(allow_negative_expenses())))
                    .transpose()?,
                category,
                description,
                date: date.map(|d| parse_date(&d)).transpose()?,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to change; pass at least one of --amount, --category, --description, --date");
            }
            if ctx.require_ledger_mut()?.edit_expense(id, update)? {
                output_success(&output_format, &format!("Updated expense {}", id), Some(json!({ "id": id })))
            } else {
                anyhow::bail!("Expense '{}' not found", id)
            }
        }
        ExpenseCommands::Delete { id } => {
            let id = parse_id(&id)?;
            let deleted = ctx.require_ledger_mut()?.delete_expense(id)?;
            let message = if deleted {
                format!("Deleted expense {}", id)
            } else {
                format!("No expense with id {}", id)
            };
            output_success(&output_format, &message, Some(json!({ "id": id, "deleted": deleted })))
        }
        ExpenseCommands::Categories => Ok(()),
    }
}
