use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "supplyseed",
    version,
    about = "Recreate a PostgreSQL database and seed it with suppliers and their products"
)]
pub struct Cli {
    /// Connection settings (YAML). Defaults to <config dir>/supplyseed/connection.yaml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Database to drop and recreate.
    #[arg(long, default_value = "my_new_db")]
    pub database: String,

    /// SQL script with the base schema and data (defines `products`).
    #[arg(long, default_value = "fill_db.sql")]
    pub script: PathBuf,

    /// JSON array of suppliers.
    #[arg(long, default_value = "suppliers.json")]
    pub suppliers: PathBuf,

    /// Append log lines to this file instead of stdout.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
