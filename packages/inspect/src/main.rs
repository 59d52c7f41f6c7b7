#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool that documents the dwelling fire store.
//!
//! Lists every table, its columns and a few sample rows, and writes the
//! result to a plain-text report.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use clap::Parser;
use fire_risk_database::inspect::write_schema_report;
use fire_risk_database::paths::DEFAULT_SCHEMA_REPORT_FILE;
use fire_risk_database::DuckDbStore;

#[derive(Parser)]
#[command(name = "fire_risk_inspect", about = "Schema report tool")]
struct Cli {
    /// Store to inspect. Defaults to `FIRE_RISK_DB_PATH`, then
    /// `dwelling_fires.duckdb`.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Report file to write.
    #[arg(long, default_value = DEFAULT_SCHEMA_REPORT_FILE)]
    output: PathBuf,

    /// Sample rows per table.
    #[arg(long, default_value_t = 3)]
    sample_rows: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let store = cli.db.map_or_else(DuckDbStore::from_env, DuckDbStore::new);
    log::info!("Inspecting {}", store.path().display());

    let conn = store.open()?;
    let mut out = BufWriter::new(File::create(&cli.output)?);
    write_schema_report(&conn, &mut out, cli.sample_rows)?;
    out.flush()?;

    log::info!("Schema info saved to {}", cli.output.display());
    println!("Schema info saved to {}", cli.output.display());

    Ok(())
}
