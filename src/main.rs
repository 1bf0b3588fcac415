mod analyze;
mod battery;
mod classify;
mod dashboard;
mod dataset;
mod error;
mod health;
mod init;
mod logging;
mod paths;
mod render;
mod scan;
mod state;
mod stats;
mod status;
mod trend;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use dataset::Table;
use error::{Error, Result};
use render::Palette;
use state::Config;

#[derive(Parser)]
#[command(
    name = "fitwatch",
    about = "Fitness and health trend dashboard with decline alerts",
    version
)]
struct Cli {
    /// Dataset to read instead of the configured one
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Log analysis decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the fitwatch directory and default config
    Init,
    /// Dashboard for one agent
    Lookup {
        /// Agent identifier (matricule)
        matricule: String,
        /// Print the dashboard payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every agent with at least one active alert
    Alerts {
        /// Print the alert list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dataset and configuration summary
    Status,
}

fn load(cli_dataset: Option<PathBuf>) -> Result<(Config, Table)> {
    let mut config = state::load_config()?;
    if let Some(path) = cli_dataset {
        config.dataset_path = path;
    }
    let delimiter = u8::try_from(config.delimiter)
        .map_err(|_| Error::Config(format!("invalid delimiter {:?}", config.delimiter)))?;
    let table = Table::load(&config.dataset_path, delimiter)?;
    Ok((config, table))
}

fn run(cli: Cli) -> Result<()> {
    let palette = Palette::detect();
    match cli.command {
        Commands::Init => init::run(),
        Commands::Lookup { matricule, json } => {
            let (config, table) = load(cli.dataset)?;
            let dash = dashboard::lookup(&table, &matricule, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dash)?);
            } else {
                print!("{}", render::dashboard(&dash, &palette));
            }
            Ok(())
        }
        Commands::Alerts { json } => {
            let (config, table) = load(cli.dataset)?;
            let summaries = scan::run(&table, &config);
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                print!("{}", render::alert_list(&summaries, &palette));
            }
            Ok(())
        }
        Commands::Status => {
            let (config, table) = load(cli.dataset)?;
            print!("{}", status::render(&table, &config, &palette));
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "✗".red());
        std::process::exit(1);
    }
}
