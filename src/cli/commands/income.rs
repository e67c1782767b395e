use clap::Subcommand;
use serde_json::json;

use crate::cli::config::today;
use crate::cli::utils::{money, open_authenticated, output_collection, output_success, parse_id, resolve_month};
use crate::cli::OutputFormat;
use crate::ledger::input::NewIncome;

#[derive(Subcommand)]
pub enum IncomeCommands {
    #[command(about = "Record income; its month is taken from the date")]
    Add {
        #[arg(help = "Amount, e.g. 5000")]
        amount: String,
        #[arg(long, short, help = "Where the money came from, e.g. Salary")]
        source: String,
        #[arg(long, short, default_value = "", help = "Description")]
        description: String,
        #[arg(long, help = "Date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },

    #[command(about = "List income for a month")]
    List {
        #[arg(long, help = "Month as YYYY-MM (defaults to the current month)")]
        month: Option<String>,
    },

    #[command(about = "Delete an income entry")]
    Delete {
        #[arg(help = "Income id")]
        id: String,
    },
}

pub async fn handle(cmd: IncomeCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut ctx = open_authenticated()?;

    match cmd {
        IncomeCommands::Add { amount, source, description, date } => {
            let date = date.unwrap_or_else(|| today().to_string());
            let input = NewIncome::parse(&amount, &source, &description, &date)?;
            let income = ctx.require_ledger_mut()?.add_income(
                input.amount,
                input.source,
                input.description,
                input.date,
            )?;
            output_success(
                &output_format,
                &format!("Added income {} for {} ({})", money(income.amount), income.month, income.id),
                Some(json!({ "income": income })),
            )
        }
        IncomeCommands::List { month } => {
            let month = resolve_month(month.as_deref())?;
            let ledger = ctx.ledger();
            let incomes: Vec<_> = ledger.incomes_for_month(month).collect();
            let total = ledger.income_for_month(month)?;

            let mut rows: Vec<String> = incomes
                .iter()
                .map(|i| format!("{}  {}  {:<14} {:>12}  {}", i.id, i.date, i.source, money(i.amount), i.description))
                .collect();
            if !rows.is_empty() {
                rows.push(format!("Total ({}): {}", month, money(total)));
            }

            output_collection(
                &output_format,
                "incomes",
                json!(incomes),
                rows,
                &format!("No income for {}", month),
                Some(json!({ "month": month, "total": total })),
            )
        }
        IncomeCommands::Delete { id } => {
            let id = parse_id(&id)?;
            let deleted = ctx.require_ledger_mut()?.delete_income(id)?;
            let message = if deleted {
                format!("Deleted income {}", id)
            } else {
                format!("No income with id {}", id)
            };
            output_success(&output_format, &message, Some(json!({ "id": id, "deleted": deleted })))
        }
    }
}

