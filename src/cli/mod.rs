pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Expense tracker - income, expenses and savings by month")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the data directory and empty ledger files")]
    Init,

    #[command(about = "Login, signup and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Record and manage expenses")]
    Expense {
        #[command(subcommand)]
        cmd: commands::expense::ExpenseCommands,
    },

    #[command(about = "Record and manage income")]
    Income {
        #[command(subcommand)]
        cmd: commands::income::IncomeCommands,
    },

    #[command(about = "Savings goal and contributions")]
    Savings {
        #[command(subcommand)]
        cmd: commands::savings::SavingsCommands,
    },

    #[command(about = "Monthly income, expenses, savings and balance")]
    Summary(commands::summary::SummaryArgs),

    #[command(about = "Show the logged-in user and lifetime totals")]
    Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Init => commands::init::handle(output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Expense { cmd } => commands::expense::handle(cmd, output_format).await,
        Commands::Income { cmd } => commands::income::handle(cmd, output_format).await,
        Commands::Savings { cmd } => commands::savings::handle(cmd, output_format).await,
        Commands::Summary(args) => commands::summary::handle(args, output_format).await,
        Commands::Profile => commands::profile::handle(output_format).await,
    }
}
