mod app;
mod cli;
mod config;
mod connection;
mod db;
mod logger;
mod supplier;

use clap::Parser;
use tracing::{error, info};

use crate::{app::run_app, cli::Cli};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if let Err(err) = logger::init(cli.log_file.as_deref()) {
        eprintln!("{:?}", err);
    }

    match run_app(&cli) {
        Ok(report) => info!(
            database = %report.database,
            replaced = report.dropped_existing,
            suppliers = report.summary.suppliers,
            links = report.summary.links,
            "database ready"
        ),
        Err(err) => {
            println!("{:?}", err);
            error!(error = %err, "fatal error");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
        }
    }

    Ok(())
}
