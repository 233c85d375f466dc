//! `dimsplit` - extract a categorical column into a dimension table.
//!
//! ```text
//! dimsplit nyc_jobs.csv --fact-output jobs_data.csv --dimension-output agencies_data.csv
//! ```
//!
//! Settings are resolved in three layers: built-in defaults, then an optional
//! JSON config file (`--config`), then individual flags.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use colored::Colorize;

use dimsplit::observability::init_logging;
use dimsplit::{ExtractConfig, ExtractionSummary, MalformedRowPolicy};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(version, about = "Extract a repeated CSV column into a fact file and a dimension file")]
struct Args {
    /// Source file. Its first line is treated as a header and dropped.
    input: Option<PathBuf>,

    /// Where to write the rewritten rows.
    #[arg(long)]
    fact_output: Option<PathBuf>,

    /// Where to write the `name,id` lookup table.
    #[arg(long)]
    dimension_output: Option<PathBuf>,

    /// JSON file with any subset of the config keys.
    #[arg(long)]
    config: Option<PathBuf>,

    /// 0-based index of the column to extract.
    #[arg(long)]
    category_column: Option<usize>,

    /// Field delimiter (a single character).
    #[arg(long)]
    delimiter: Option<char>,

    /// Skip lines that are too short instead of aborting.
    #[arg(long)]
    skip_malformed: bool,

    /// Write outputs in place instead of staging them in temporary files.
    #[arg(long)]
    no_atomic: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Append log records to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> dimsplit::Result<ExtractConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::from_json_file(path)?,
            None => ExtractConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(path) = &self.fact_output {
            config.fact_output_path = path.clone();
        }
        if let Some(path) = &self.dimension_output {
            config.dimension_output_path = path.clone();
        }
        if let Some(column) = self.category_column {
            config.category_column = column;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.skip_malformed {
            config.malformed_rows = MalformedRowPolicy::Skip;
        }
        if self.no_atomic {
            config.atomic_writes = false;
        }
        Ok(config)
    }
}

fn print_summary(summary: &ExtractionSummary, config: &ExtractConfig) {
    println!(
        "{} {} rows -> {}, {} categories -> {}",
        "done".green().bold(),
        summary.rows_written,
        config.fact_output_path.display(),
        summary.categories,
        config.dimension_output_path.display(),
    );
    if summary.rows_skipped > 0 {
        println!(
            "{} {} malformed rows skipped",
            "warn".yellow().bold(),
            summary.rows_skipped
        );
    }
}

fn run(args: &Args) -> dimsplit::Result<()> {
    init_logging(args.verbose, args.log_file.as_deref())?;
    let config = Arc::new(args.resolve_config()?);
    log::debug!("Resolved config: {:?}", config);

    let summary = dimsplit::run(Arc::clone(&config))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &config);
    }
    Ok(())
}

fn report_failure<W: Write>(err: &dimsplit::DimsplitError, out: &mut W) -> io::Result<()> {
    log::debug!("{err:?}");
    writeln!(out, "{} {err}", "error:".red().bold())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The logger may share stderr, so the error is only written once, here.
            let _ = report_failure(&err, &mut io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}
