//! CLI entry point for the bikeshare statistics explorer.
//!
//! Prompts for a city, month and weekday, prints travel statistics for the
//! selection, pages through raw trips and offers to start over.

use anyhow::Result;
use bikeshare_stats::config::AppConfig;
use bikeshare_stats::logging::init_tracing;
use bikeshare_stats::session::{Session, SessionOptions};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data interactively", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Skip the filter prompts and analyze all Chicago data
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Also print each report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env(cli.data_dir);
    let _file_guard = init_tracing(&config.log_file_path)?;

    info!(data_dir = %config.data_dir.display(), debug = cli.debug, "Starting bikeshare_stats");

    let options = SessionOptions {
        debug: cli.debug,
        json: cli.json,
    };
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let mut session = Session::new(config, options, stdin, stdout);

    if let Err(e) = session.run() {
        error!(error = %format!("{e:#}"), "Session aborted");
        return Err(e);
    }
    Ok(())
}
