use clap::Args;
use serde_json::json;

use crate::cli::utils::{money, open_authenticated, output_success, resolve_month};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct SummaryArgs {
    #[arg(long, help = "Month as YYYY-MM (defaults to the current month)")]
    pub month: Option<String>,

    #[arg(long, value_name = "N", conflicts_with = "next", help = "Step N months back")]
    pub prev: Option<u32>,

    #[arg(long, value_name = "N", help = "Step N months forward")]
    pub next: Option<u32>,
}

impl SummaryArgs {
    fn offset(&self) -> i32 {
        match (self.prev, self.next) {
            (Some(n), _) => -(n.min(i32::MAX as u32) as i32),
            (_, Some(n)) => n.min(i32::MAX as u32) as i32,
            _ => 0,
        }
    }
}

pub async fn handle(args: SummaryArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_authenticated()?;
    let month = resolve_month(args.month.as_deref())?.shift(args.offset());
    let ledger = ctx.ledger();

    let summary = ledger.monthly_summary(month)?;
    let categories = ledger.expenses_by_category(month)?;

    if let OutputFormat::Text = output_format {
        println!("Summary for {}", summary.month);
        println!("  Income:   {:>14}", money(summary.income));
        println!("  Expenses: {:>14}", money(summary.expenses));
        println!("  Savings:  {:>14}", money(summary.savings));
        println!("  Balance:  {:>14}", money(summary.balance));
        if summary.is_over_budget() {
            println!("  Spending and savings exceed income this month");
        }
        if !categories.is_empty() {
            println!("By category:");
            for c in &categories {
                println!("  {:<16} {:>14}", c.category, money(c.total));
            }
        }
        return Ok(());
    }

    output_success(
        &output_format,
        &format!("Summary for {}", summary.month),
        Some(json!({ "summary": summary, "categories": categories })),
    )
}
