//! Loads CSV snapshots into the record store.
//!
//! Run with: cargo run --bin ingest-snapshots -- seed --only-if-empty

use std::{path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::info;

use rake_dispatch_api::{
    config::{self, AppConfig},
    db,
    models::EntityKind,
    repositories::{RecordStore, SeaOrmRecordStore},
    services::{
        ingestion::{SeedOutcome, SeedReport},
        IngestReport, IngestionPipeline,
    },
    snapshot::CsvSnapshotSource,
};

#[derive(Parser)]
#[command(name = "ingest-snapshots", about = "Load dispatch snapshots into the record store")]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, help = "Override the configured snapshot directory")]
    snapshot_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the configured database URL")]
    database_url: Option<String>,
    #[arg(long, global = true, help = "Rows committed per transaction")]
    batch_size: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest orders, rakes, inventory and routes in that order
    Seed {
        #[arg(long, action = ArgAction::SetTrue, help = "Skip kinds whose table already has rows")]
        only_if_empty: bool,
    },
    /// Ingest a single kind
    Ingest {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
    },
    /// Show row counts per kind
    Stats,
}

fn parse_kind(raw: &str) -> Result<EntityKind, String> {
    EntityKind::from_str(raw).map_err(|_| {
        let accepted: Vec<String> = EntityKind::iter().map(|k| k.to_string()).collect();
        format!("expected one of: {}", accepted.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load(&cli)?;
    config::init_tracing(config.log_level(), config.log_json);

    let pool = db::establish_connection_from_app_config(&config)
        .await
        .context("failed to connect to the record store")?;
    if config.auto_migrate {
        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let store: Arc<dyn RecordStore> = Arc::new(SeaOrmRecordStore::new(Arc::new(pool)));
    let snapshots = Arc::new(CsvSnapshotSource::from_config(&config));
    info!(dir = %snapshots.dir().display(), "Reading snapshots");
    let pipeline = IngestionPipeline::new(store.clone(), snapshots, config.ingest_batch_size);

    match cli.command {
        Commands::Seed { only_if_empty } => {
            let report = pipeline.seed(only_if_empty).await;
            if cli.json {
                print_json(&report)?;
            } else {
                render_seed(&report);
            }
            if report.has_failures() {
                bail!("one or more kinds failed to seed");
            }
        }
        Commands::Ingest { kind } => {
            let report = pipeline
                .ingest(kind)
                .await
                .map_err(|e| anyhow!("ingesting {} failed: {}", kind, e))?;
            if cli.json {
                print_json(&report)?;
            } else {
                render_ingest(&report);
            }
        }
        Commands::Stats => {
            let mut counts = Vec::new();
            for kind in EntityKind::iter() {
                let count = store
                    .count(kind)
                    .await
                    .map_err(|e| anyhow!("counting {} failed: {}", kind, e))?;
                counts.push((kind.to_string(), count));
            }
            if cli.json {
                print_json(&counts)?;
            } else {
                for (kind, count) in counts {
                    println!("- {:<10} {}", kind, count);
                }
            }
        }
    }

    Ok(())
}

fn load(cli: &Cli) -> Result<AppConfig> {
    let mut config = config::load_config().context("failed to load application config")?;
    if let Some(dir) = &cli.snapshot_dir {
        config.snapshot_dir = dir.clone();
    }
    if let Some(url) = &cli.database_url {
        config.database_url = url.clone();
    }
    if let Some(size) = cli.batch_size {
        if size == 0 {
            bail!("--batch-size must be at least 1");
        }
        config.ingest_batch_size = size;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_ingest(report: &IngestReport) {
    println!(
        "- {} • {} rows • {} inserted • {} skipped",
        report.kind, report.total_rows, report.inserted, report.skipped
    );
    for failure in &report.errors {
        println!("    row {}: {}", failure.row_index, failure.reason);
    }
}

fn render_seed(report: &SeedReport) {
    for entry in &report.entries {
        match &entry.outcome {
            SeedOutcome::Ingested { report } => render_ingest(report),
            SeedOutcome::AlreadyPopulated { existing } => {
                println!("- {} • already populated ({} rows)", entry.kind, existing)
            }
            SeedOutcome::Failed { error } => println!("- {} • failed: {}", entry.kind, error),
        }
    }
    println!("Inserted {} rows in total", report.total_inserted());
}
