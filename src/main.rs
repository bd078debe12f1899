use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use govledger::{sample, GovernanceDb};

#[derive(Parser)]
#[command(
    name = "govledger",
    version,
    about = "AI management system governance record bookkeeping"
)]
struct Cli {
    /// Path to the governance database file
    #[arg(long, default_value = "data/govledger.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and schema if they don't exist
    Init,
    /// Populate the database with an example dataset
    Seed,
    /// Print dashboard summary statistics as JSON
    Stats,
    /// Export all records to an Excel workbook
    Export {
        /// Destination .xlsx path
        path: PathBuf,
    },
    /// Import records from an Excel workbook, replacing ALL existing data
    Import {
        /// Source .xlsx path
        path: PathBuf,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db = GovernanceDb::open(&cli.db)?;

    match cli.command {
        Command::Init => {
            println!("Initialized governance database at {}", cli.db.display());
        }
        Command::Seed => {
            sample::seed_example_data(&db)?;
            let stats = db.dashboard_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Stats => {
            let stats = db.dashboard_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Export { path } => {
            db.export_workbook(&path)?;
            println!("Exported to {}", path.display());
        }
        Command::Import { path } => {
            log::warn!("Import replaces all existing records");
            db.import_workbook(&path)?;
            println!("Imported from {}", path.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
