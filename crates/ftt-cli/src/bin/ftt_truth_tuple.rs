use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use ftt_cli::{parse_file_list, run_files, RunConfig};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "ftt-truth-tuple",
    version,
    about = "Reduce truth decay chains to the FTAG truth tuple"
)]
struct Args {
    /// Comma-separated list of truth container files or directories.
    inputs: String,

    /// YAML run configuration; defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output table path, overriding the configuration.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info", value_parser = clap::value_parser!(LevelFilter))]
    log_level: LevelFilter,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .init();

    let mut config = match args.config.as_deref() {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(out) = args.out {
        config.output = out;
    }

    let inputs = parse_file_list(&args.inputs)?;
    let report = run_files(&config, &inputs)?;
    info!(
        files = report.files,
        entries = report.entries,
        rows = report.rows,
        skipped = report.skipped.len(),
        digest = %report.table.digest,
        "done"
    );
    Ok(())
}
