/// Command-line entry point for the profile extraction batch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use resprof::logging::{self, LogLevel, Stage};
use resprof::{config, pipeline, verify};

#[derive(Parser)]
#[command(name = "resprof")]
#[command(about = "Hourly energy-profile extraction from HOMER exports")]
#[command(
    long_about = "Extracts fixed-format hourly summaries from HOMER-style hourly\n\
    simulation exports and writes one multi-sheet workbook per dataset.\n\
    \nTwo grouping modes, chosen per job in the configuration file:\n  \
    - representative-day: the first 24 samples of the 15th of each target month\n  \
    - season: the hourly average across every day of a named season\n\
    \nExamples:\n  \
    resprof run --config config/day_profiles.toml\n  \
    resprof verify --config config/season_profiles.toml --json"
)]
struct Cli {
    /// Append log output to this file in addition to the console
    #[arg(long, global = true)]
    log_file: Option<String>,

    /// Prefix console output with timestamps
    #[arg(long, global = true)]
    timestamps: bool,

    /// Show debug-level diagnostics
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every job in a TOML job file
    Run {
        /// Path to the job configuration file
        #[arg(long)]
        config: PathBuf,
    },
    /// Preflight-check configured jobs without writing any artifact
    Verify {
        /// Path to the job configuration file
        #[arg(long)]
        config: PathBuf,

        /// Dump the full verification report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let min_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logging::init_logger(min_level, cli.log_file.as_deref(), cli.timestamps);

    match cli.command {
        Commands::Run { config } => match pipeline::run_job_file(&config) {
            Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
            Ok(_) => ExitCode::FAILURE,
            Err(err) => {
                logging::error(Stage::Config, None, &err.to_string());
                ExitCode::FAILURE
            }
        },
        Commands::Verify { config, json } => {
            let jobs = match config::load_jobs(&config) {
                Ok(jobs) => jobs,
                Err(err) => {
                    logging::error(Stage::Config, None, &err.to_string());
                    return ExitCode::FAILURE;
                }
            };

            let report = verify::run_full_verification(&jobs);
            verify::print_summary(&report);

            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(err) => {
                        logging::error(Stage::System, None, &err.to_string());
                        return ExitCode::FAILURE;
                    }
                }
            }

            if report.summary.failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
