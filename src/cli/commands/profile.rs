use serde_json::json;

use crate::cli::utils::{money, open_authenticated, output_success};
use crate::cli::OutputFormat;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_authenticated()?;
    let session = ctx.require_session()?;
    let member_since = ctx.users().get(&session.email).map(|u| u.created_at);
    let ledger = ctx.ledger();
    let (total_income, total_expenses) = ledger.lifetime_totals()?;
    let goal = ledger.savings_goal();

    if let OutputFormat::Text = output_format {
        println!("{} <{}>", session.name, session.email);
        if let Some(since) = member_since {
            println!("Member since {}", since.format("%B %-d, %Y"));
        }
        println!("Total income:   {:>14}", money(total_income));
        println!("Total expenses: {:>14}", money(total_expenses));
        println!("Total saved:    {:>14}", money(goal.current_amount));
        println!(
            "Records: {} expenses, {} incomes, {} contributions",
            ledger.expenses().len(),
            ledger.incomes().len(),
            ledger.savings_contributions().len()
        );
        return Ok(());
    }

    output_success(
        &output_format,
        &format!("Profile for {}", session.email),
        Some(json!({
            "email": session.email,
            "name": session.name,
            "createdAt": member_since,
            "totalIncome": total_income,
            "totalExpenses": total_expenses,
            "totalSaved": goal.current_amount,
            "expenseCount": ledger.expenses().len(),
            "incomeCount": ledger.incomes().len(),
            "contributionCount": ledger.savings_contributions().len(),
        })),
    )
}
