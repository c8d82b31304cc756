mod commands;
mod config;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;

use commands::catalog::{FacetsArgs, ModelsArgs, SearchArgs};
use commands::loan::{AffordabilityArgs, LoanArgs};
use config::ShowroomConfig;

/// Vehicle catalog queries and auto-loan quotes
#[derive(Parser)]
#[command(
    name = "showroom",
    version,
    about = "Vehicle catalog queries and auto-loan quotes",
    long_about = "A CLI for the dealership's inventory and finance desk. Filters and ranks \
                  listings from a JSON/YAML inventory and computes equated monthly \
                  installments with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML/JSON file with dealer defaults (locale, currency, rate, term)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly installment, total interest and optional amortization schedule
    Loan(LoanArgs),
    /// Largest loan a monthly budget supports
    Affordability(AffordabilityArgs),
    /// Filter, sort and paginate the inventory
    Search(SearchArgs),
    /// Rank models by number of listings
    Models(ModelsArgs),
    /// Distinct filter values and price/year/mileage ranges
    Facets(FacetsArgs),
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

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match ShowroomConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args, &config),
        Commands::Affordability(args) => commands::loan::run_affordability(args, &config),
        Commands::Search(args) => commands::catalog::run_search(args, &config),
        Commands::Models(args) => commands::catalog::run_models(args, &config),
        Commands::Facets(args) => commands::catalog::run_facets(args),
        Commands::Version => {
            println!("showroom {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::emit(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
