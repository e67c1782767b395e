use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{money, open_authenticated, output_collection, output_success, parse_id, resolve_month};
use crate::cli::OutputFormat;
use crate::ledger::{format_amount, parse_amount, AmountPolicy};

#[derive(Subcommand)]
pub enum SavingsCommands {
    #[command(about = "Set the savings target, or show progress when no amount is given")]
    Goal {
        #[arg(help = "Target amount")]
        target: Option<String>,
    },

    #[command(about = "Add a contribution for a month")]
    Add {
        #[arg(help = "Amount, e.g. 200")]
        amount: String,
        #[arg(long, help = "Month as YYYY-MM (defaults to the current month)")]
        month: Option<String>,
    },

    #[command(about = "List contributions")]
    List {
        #[arg(long, help = "Only contributions for this month (YYYY-MM)")]
        month: Option<String>,
    },

    #[command(about = "Delete a contribution")]
    Delete {
        #[arg(help = "Contribution id")]
        id: String,
    },

    #[command(about = "Delete every contribution")]
    Clear,
}

pub async fn handle(cmd: SavingsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut ctx = open_authenticated()?;

    match cmd {
        SavingsCommands::Goal { target: Some(target) } => {
            let target = parse_amount(&target, AmountPolicy::NonNegative)?;
            let ledger = ctx.require_ledger_mut()?;
            ledger.set_savings_goal(target)?;
            output_success(
                &output_format,
                &format!("Savings goal set to {}", money(target)),
                Some(json!({ "savingsGoal": ledger.savings_goal(), "progress": ledger.savings_progress() })),
            )
        }
        SavingsCommands::Goal { target: None } => {
            let ledger = ctx.ledger();
            let goal = ledger.savings_goal();
            let progress = ledger.savings_progress();
            output_success(
                &output_format,
                &format!(
                    "Saved {} of {} ({}%)",
                    money(goal.current_amount),
                    money(goal.target_amount),
                    format_amount(progress)
                ),
                Some(json!({ "savingsGoal": goal, "progress": progress })),
            )
        }
        SavingsCommands::Add { amount, month } => {
            let amount = parse_amount(&amount, AmountPolicy::Positive)?;
            let month = resolve_month(month.as_deref())?;
            let ledger = ctx.require_ledger_mut()?;
            // Contributions are dated on the first day of the month they count toward
            let contribution = ledger.add_savings_contribution(amount, month, month.first_day())?;
            output_success(
                &output_format,
                &format!(
                    "Added {} to savings for {} (total {})",
                    money(contribution.amount),
                    month,
                    money(ledger.savings_goal().current_amount)
                ),
                Some(json!({ "contribution": contribution })),
            )
        }
        SavingsCommands::List { month } => {
            let ledger = ctx.ledger();
            let contributions: Vec<_> = match month.as_deref() {
                Some(text) => {
                    let month = resolve_month(Some(text))?;
                    ledger.contributions_for_month(month).collect()
                }
                None => ledger.savings_contributions().iter().collect(),
            };
            let goal = ledger.savings_goal();

            let mut rows: Vec<String> = contributions
                .iter()
                .map(|c| format!("{}  {}  {:>12}", c.id, c.month, money(c.amount)))
                .collect();
            if !rows.is_empty() {
                rows.push(format!("Saved {} of {}", money(goal.current_amount), money(goal.target_amount)));
            }

            output_collection(
                &output_format,
                "savingsContributions",
                json!(contributions),
                rows,
                "No savings contributions",
                Some(json!({ "savingsGoal": goal })),
            )
        }
        SavingsCommands::Delete { id } => {
            let id = parse_id(&id)?;
            let deleted = ctx.require_ledger_mut()?.delete_savings_contribution(id)?;
            let message = if deleted {
                format!("Deleted contribution {}", id)
            } else {
                format!("No contribution with id {}", id)
            };
            output_success(&output_format, &message, Some(json!({ "id": id, "deleted": deleted })))
        }
        SavingsCommands::Clear => {
            let removed = ctx.require_ledger_mut()?.clear_savings_contributions()?;
            output_success(
                &output_format,
                &format!("Cleared {} contribution(s)", removed),
                Some(json!({ "removed": removed })),
            )
        }
    }
}
