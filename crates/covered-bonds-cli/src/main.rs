mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::feeds::FeedArgs;
use commands::generate::{GenerateArgs, WindowArgs};
use commands::legacy::{ExtractArgs, MergeArgs};
use commands::reference::CatalogArgs;

/// Synthetic covered bond issuance data for the markets dashboard
#[derive(Parser)]
#[command(
    name = "cbd",
    version,
    about = "Synthetic covered bond issuance data for the markets dashboard",
    long_about = "Generates seeded historical and window issuance data sets, extracts \
                  hand-written records from the dashboard's JS data module and merges \
                  both into a single module. Also prints the reference tables and the \
                  offline feed payloads."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "CBD_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the 2010-2023 historical issuance corpus
    Generate(GenerateArgs),
    /// Generate a flat issuance set over a date window
    GenerateWindow(WindowArgs),
    /// List the record literals of one block in a JS data module
    Extract(ExtractArgs),
    /// Merge a historical corpus with the records of a legacy data module
    Merge(MergeArgs),
    /// Show the market-era parameter table
    Periods,
    /// Show the issuer catalog
    Catalog(CatalogArgs),
    /// Print the payload a dashboard endpoint serves while offline
    Feed(FeedArgs),
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

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Generate(args) => commands::generate::run_generate(args),
        Commands::GenerateWindow(args) => commands::generate::run_generate_window(args),
        Commands::Extract(args) => commands::legacy::run_extract(args),
        Commands::Merge(args) => commands::legacy::run_merge(args),
        Commands::Periods => commands::reference::run_periods(),
        Commands::Catalog(args) => commands::reference::run_catalog(args),
        Commands::Feed(args) => commands::feeds::run_feed(args),
        Commands::Version => {
            println!("cbd {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
