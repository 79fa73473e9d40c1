use std::fmt;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::config::{default_settings_path, load_settings};
use crate::db::{create_database, remove_database, Postgres};
use crate::supplier::{insert_suppliers, load_suppliers, InsertSummary};

/// Steps of a provisioning run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigLoaded,
    OldDbDropped,
    DbCreated,
    SchemaLoaded,
    SuppliersTableCreated,
    SuppliersInserted,
    ForeignKeysAdded,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Start => "start",
            Stage::ConfigLoaded => "connection settings loaded",
            Stage::OldDbDropped => "old database dropped",
            Stage::DbCreated => "database created",
            Stage::SchemaLoaded => "schema script executed",
            Stage::SuppliersTableCreated => "supplier tables created",
            Stage::SuppliersInserted => "suppliers inserted",
            Stage::ForeignKeysAdded => "foreign keys added",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub struct Report {
    pub database: String,
    pub dropped_existing: bool,
    pub summary: InsertSummary,
}

/// Tracks the current stage so failures can say where they happened.
struct Progress {
    stage: Stage,
    last_completed: Stage,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: Stage::Start,
            last_completed: Stage::Start,
        }
    }

    fn advance(&mut self, stage: Stage) {
        self.stage = stage;
        self.last_completed = stage;
        info!(stage = %stage, "ok");
    }

    /// Move to `Failed`, keeping the last completed stage for the report.
    fn fail(&mut self) -> String {
        self.stage = Stage::Failed;
        error!(stage = %self.stage, after = %self.last_completed, "remaining steps skipped");
        format!("provisioning failed after stage: {}", self.last_completed)
    }
}

pub fn run_app(cli: &Cli) -> Result<Report> {
    let mut progress = Progress::new();
    match provision(cli, &mut progress) {
        Ok(report) => Ok(report),
        Err(err) => {
            let message = progress.fail();
            Err(err.context(message))
        }
    }
}

fn provision(cli: &Cli, progress: &mut Progress) -> Result<Report> {
    let settings_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_settings_path()?,
    };
    let admin = load_settings(&settings_path)?;
    progress.advance(Stage::ConfigLoaded);

    let name = cli.database.as_str();
    let dropped_existing = match remove_database(&admin, name) {
        Ok(()) => {
            progress.advance(Stage::OldDbDropped);
            true
        }
        Err(err) => {
            warn!(database = name, error = %err, "drop skipped, assuming database did not exist");
            false
        }
    };

    create_database(&admin, name)?;
    progress.advance(Stage::DbCreated);

    let target = admin.with_database(name);
    let mut db = Postgres::connect(&target)?;

    db.execute_script(&cli.script)?;
    progress.advance(Stage::SchemaLoaded);

    db.create_supplier_tables()?;
    progress.advance(Stage::SuppliersTableCreated);

    let suppliers = load_suppliers(&cli.suppliers)?;
    let summary = insert_suppliers(&mut db, &suppliers)?;
    info!(
        suppliers = summary.suppliers,
        links = summary.links,
        unmatched = summary.unmatched,
        "supplier data loaded"
    );
    progress.advance(Stage::SuppliersInserted);

    db.add_foreign_keys()?;
    progress.advance(Stage::ForeignKeysAdded);

    db.close()?;
    progress.advance(Stage::Done);

    Ok(Report {
        database: name.to_string(),
        dropped_existing,
        summary,
    })
}
