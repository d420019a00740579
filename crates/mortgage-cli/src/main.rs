mod commands;
mod config;
mod input;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{CalculateArgs, PaymentArgs, ScheduleArgs};
use commands::history::HistoryArgs;
use config::Config;

/// Mortgage payment, amortization and saved-calculation history
#[derive(Parser)]
#[command(
    name = "mdc",
    version,
    about = "Mortgage payment, amortization and saved-calculation history",
    long_about = "Computes fixed-rate mortgage payments, full amortization schedules and \
                  home purchase breakdowns, and manages the saved-calculation history \
                  shared with the Mortgage Destroyers web app."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// History document (default: $MORTGAGE_HISTORY_FILE or dbHistory.json)
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    /// Maximum retained history entries (default: $MORTGAGE_HISTORY_CAP or 50)
    #[arg(long, global = true)]
    history_cap: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Level monthly principal-and-interest payment
    Payment(PaymentArgs),
    /// Period-by-period amortization schedule
    Schedule(ScheduleArgs),
    /// Home purchase breakdown (down payment, P&I, tax, insurance, HOA)
    Calculate(CalculateArgs),
    /// Manage saved calculations
    History(HistoryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::from_env() {
        Ok(c) => c.with_overrides(cli.history_file, cli.history_cap),
        Err(e) => fail(format!("{e:#}")),
    };
    tracing::debug!(?config, "configuration loaded");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Calculate(args) => commands::amortization::run_calculate(args, &config),
        Commands::History(args) => commands::history::run_history(args, &config),
        Commands::Version => {
            println!("mdc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
