mod analyzer;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::analyzer::AnalysisClient;
use crate::commands::{
    cmd_add, cmd_day, cmd_export, cmd_history, cmd_import, cmd_log, cmd_photo, cmd_remove,
    cmd_reset, cmd_setup, cmd_targets,
};
use crate::config::Config;
use nosh_core::engine::Engine;
use nosh_core::store::SqliteStore;
use nosh_core::targets::TargetEstimator;

#[derive(Parser)]
#[command(
    name = "nosh",
    version,
    about = "An AI-assisted nutrition tracker CLI",
    long_about = "\n\n  ███╗   ██╗ ██████╗ ███████╗██╗  ██╗
  ████╗  ██║██╔═══██╗██╔════╝██║  ██║
  ██╔██╗ ██║██║   ██║███████╗███████║
  ██║╚██╗██║██║   ██║╚════██║██╔══██║
  ██║ ╚████║╚██████╔╝███████║██║  ██║
  ╚═╝  ╚═══╝ ╚═════╝ ╚══════╝╚═╝  ╚═╝
      eat it, log it, know it.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create (or redo) your profile and derive daily targets
    Setup {
        /// Your name
        #[arg(long)]
        name: String,
        /// Age in years
        #[arg(long)]
        age: u32,
        /// Gender: male, female
        #[arg(long)]
        gender: String,
        /// Height in centimeters
        #[arg(long)]
        height: f64,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
        /// Activity level: sedentary, light, moderate, active, veryActive
        #[arg(long, default_value = "moderate")]
        activity: String,
        /// Goal: lose, maintain, gain
        #[arg(long, default_value = "maintain")]
        goal: String,
        /// Skip the remote estimator and derive targets locally
        #[arg(long)]
        offline: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log food from a free-text description ("I ate a sandwich")
    Log {
        /// What you ate
        text: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log food from a photo
    Photo {
        /// Path to the image file
        path: PathBuf,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a food entry by hand, no analysis involved
    Add {
        /// Food name
        name: String,
        /// Calories (kcal)
        #[arg(long)]
        calories: f64,
        /// Protein in grams
        #[arg(long, default_value = "0")]
        protein: f64,
        /// Carbs in grams
        #[arg(long, default_value = "0")]
        carbs: f64,
        /// Fat in grams
        #[arg(long, default_value = "0")]
        fat: f64,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an item by its position in the day view
    Remove {
        /// Item index as shown by `nosh day`
        index: usize,
        /// Date to remove from (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one day's entries and totals (defaults to today)
    Day {
        /// Date to show (YYYY-MM-DD or today/yesterday, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show totals for the last N days
    History {
        /// Number of days to show
        #[arg(short, long, default_value = "7")]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show your profile and daily targets
    Targets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export a full backup (ledger + profile)
    Export {
        /// Output file (default: nosh-backup-YYYY-MM-DD.json)
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import a backup, replacing the ledger (and profile if present)
    Import {
        /// Backup file to import
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the stored profile and ledger
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = SqliteStore::open(&config.db_path)?;
    let engine = Engine::new(Box::new(store))?;

    match cli.command {
        Commands::Setup {
            name,
            age,
            gender,
            height,
            weight,
            activity,
            goal,
            offline,
            json,
        } => {
            let client = if offline {
                None
            } else {
                Some(AnalysisClient::new(config.analyzer_url.clone())?)
            };
            let estimator = client.as_ref().map(|c| c as &dyn TargetEstimator);
            cmd_setup(
                &engine, estimator, &name, age, &gender, height, weight, &activity, &goal, json,
            )
        }
        Commands::Log { text, date, json } => {
            let client = AnalysisClient::new(config.analyzer_url.clone())?;
            cmd_log(&engine, &client, &text, date, json)
        }
        Commands::Photo { path, date, json } => {
            let client = AnalysisClient::new(config.analyzer_url.clone())?;
            cmd_photo(&engine, &client, &path, date, json)
        }
        Commands::Add {
            name,
            calories,
            protein,
            carbs,
            fat,
            date,
            json,
        } => cmd_add(&engine, &name, calories, protein, carbs, fat, date, json),
        Commands::Remove { index, date, json } => cmd_remove(&engine, index, date, json),
        Commands::Day { date, json } => cmd_day(&engine, date, json),
        Commands::History { days, json } => cmd_history(&engine, days, json),
        Commands::Targets { json } => cmd_targets(&engine, json),
        Commands::Export { file, json } => cmd_export(&engine, file, json),
        Commands::Import { file, json } => cmd_import(&engine, &file, json),
        Commands::Reset { yes } => cmd_reset(&engine, yes),
    }
}
