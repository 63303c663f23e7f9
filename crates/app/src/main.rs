use std::{path::PathBuf, process::ExitCode};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::EngineError;

use crate::error::AppError;

mod client;
mod commands;
mod config;
mod convert;
mod error;
mod session;

#[derive(Parser, Debug)]
#[command(name = "splitbook")]
#[command(about = "Split shared expenses and see who owes whom")]
struct Cli {
    #[command(flatten)]
    config: config::ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in by email and remember the user.
    Login(LoginArgs),
    /// Forget the signed-in user.
    Logout,
    /// List the groups of the signed-in user.
    Groups,
    /// List expenses and, for shared groups, who owes whom.
    Expenses(ExpensesArgs),
    /// Record a new expense.
    Add(AddArgs),
    /// Replace an existing expense.
    Edit(EditArgs),
    /// Delete an expense.
    Delete(DeleteArgs),
    /// Spending per category over a date range (defaults to this month).
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct ExpensesArgs {
    /// Only this group.
    #[arg(long)]
    group: Option<String>,
    /// Only expenses the signed-in user paid for or shares.
    #[arg(long)]
    mine: bool,
}

/// Fields shared by `add` and `edit`. Unset flags keep the draft value.
#[derive(Args, Debug, Default)]
struct ExpenseFields {
    /// Total amount, e.g. 12.50.
    #[arg(long)]
    amount: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Member id of the payer.
    #[arg(long)]
    paid_by: Option<String>,
    /// Expense date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Charge the whole amount to the other member instead of halving it.
    #[arg(long, conflicts_with = "split_equally")]
    one_sided: bool,
    /// Halve the amount between the members.
    #[arg(long)]
    split_equally: bool,
    /// Receipt image to pre-fill amount, description, category and date.
    #[arg(long)]
    receipt: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    group: String,
    #[command(flatten)]
    fields: ExpenseFields,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,
    /// Move the expense to another group.
    #[arg(long)]
    group: Option<String>,
    #[command(flatten)]
    fields: ExpenseFields,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    id: String,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match config::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "splitbook={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let result = match commands::App::new(&settings) {
        Ok(app) => app.run(cli.command).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Engine(EngineError::Validation(missing))) => {
            eprintln!("Error: {missing}");
            ExitCode::FAILURE
        }
        Err(err) => {
            if let AppError::Engine(EngineError::LookupFailure(_)) = &err {
                tracing::error!("refusing to record expense: {err}");
            }
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
