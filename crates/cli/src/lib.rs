pub mod commands;

use std::process::ExitCode;

use agrosoft_core::config::{AppConfig, LoadOptions, LogFormat};
use anyhow::anyhow;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "agrosoft",
    about = "Agrosoft crop recommendation CLI",
    long_about = "Rank crops for a planting context, inspect market prices, and check effective configuration.",
    after_help = "Examples:\n  agrosoft recommend --municipality Facatativá --date 2025-01-15 --temperature 14\n  agrosoft prices --crop papa --limit 10\n  agrosoft stats\n  agrosoft climate --crop \"PAPA CRIOLLA\" --temperature 8"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank the most profitable crops for a municipality and planting date")]
    Recommend {
        #[arg(long, help = "Municipality to plant in (defaults to recommendation.default_municipality)")]
        municipality: Option<String>,
        #[arg(long, help = "Planting date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
        #[arg(long, allow_hyphen_values = true, help = "Expected temperature in °C")]
        temperature: Option<f64>,
        #[arg(
            long,
            conflicts_with = "temperature",
            help = "Estimate the temperature from municipal climatology"
        )]
        simulate_climate: bool,
    },
    #[command(about = "List current market prices from the first available source")]
    Prices {
        #[arg(long, help = "Case-insensitive crop name filter")]
        crop: Option<String>,
        #[arg(long, default_value_t = 50, help = "Maximum number of observations to print")]
        limit: usize,
        #[arg(long, help = "Reference date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },
    #[command(about = "Summarise current market prices")]
    Stats {
        #[arg(long, help = "Reference date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },
    #[command(about = "Show the climatic suitability factor of a crop at a temperature")]
    Climate {
        #[arg(long)]
        crop: String,
        #[arg(long, allow_hyphen_values = true)]
        temperature: f64,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("logging disabled: {error}");
        }
    }

    let result = match cli.command {
        Command::Recommend { municipality, date, temperature, simulate_climate } => {
            commands::recommend::run(commands::recommend::RecommendArgs {
                municipality,
                date,
                temperature,
                simulate_climate,
            })
        }
        Command::Prices { crop, limit, date } => {
            commands::prices::run(crop.as_deref(), limit, date.as_deref())
        }
        Command::Stats { date } => commands::stats::run(date.as_deref()),
        Command::Climate { crop, temperature } => commands::climate::run(&crop, temperature),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the JSON payload.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!(error))
}
