// In: src/pipeline/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Dimension Extraction Pipeline
// ====================================================================================
//
//   1. [loader::transform]   -> Reads the source, drops the header, splits each line,
//         |                     rewrites the category field through the registry.
//         |
//         `-> returns `Extraction { registry, rows, .. }`
//
//   2. [output::OutputFile]  -> Opens both destinations (staged temp files by default).
//
//   3. [emit::write_fact]    -> Rows, joined back together, terminators untouched.
//      [emit::write_dimension] -> One `name,id` line per registry entry.
//
//   4. [OutputFile::finish]  -> Only after both files were fully written are they
//                               moved into place.
//
// ====================================================================================

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::ExtractConfig;
use crate::error::{DimsplitError, Result};

pub mod emit;
pub mod loader;
pub mod output;

pub use self::loader::{transform, Extraction, SourceLines};
pub use self::output::OutputFile;

/// What a run did, returned to the caller and printed by the CLI.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Data lines read, header excluded.
    pub rows_read: usize,
    pub rows_written: usize,
    pub rows_skipped: usize,
    /// Distinct category names, i.e. lines in the dimension file.
    pub categories: usize,
}

/// Runs the whole pipeline described by `config`.
///
/// Either both outputs are produced or, in atomic mode, neither destination is touched.
pub fn run(config: Arc<ExtractConfig>) -> Result<ExtractionSummary> {
    config.validate()?;
    let start = Instant::now();
    log::info!(
        "Extracting column {} of '{}'",
        config.category_column,
        config.input_path.display()
    );

    let input = File::open(&config.input_path)
        .map_err(|e| DimsplitError::file_io(&config.input_path, e))?;
    let extraction =
        transform(BufReader::new(input), &config).map_err(|e| e.with_path(&config.input_path))?;

    let mut fact = OutputFile::create(&config.fact_output_path, config.atomic_writes)?;
    let rows_written = emit::write_fact(&extraction.rows, config.delimiter, &mut fact)
        .map_err(|e| DimsplitError::file_io(fact.path(), e))?;

    let mut dimension = OutputFile::create(&config.dimension_output_path, config.atomic_writes)?;
    let categories = emit::write_dimension(&extraction.registry, config.delimiter, &mut dimension)
        .map_err(|e| DimsplitError::file_io(dimension.path(), e))?;

    let fact_path = fact.finish()?;
    let dimension_path = dimension.finish()?;

    let summary = ExtractionSummary {
        rows_read: extraction.rows_read,
        rows_written,
        rows_skipped: extraction.rows_skipped,
        categories,
    };
    log::info!(
        "Wrote {} rows to '{}' and {} categories to '{}' in {:.2?}",
        summary.rows_written,
        fact_path.display(),
        summary.categories,
        dimension_path.display(),
        start.elapsed()
    );
    if summary.rows_skipped > 0 {
        log::warn!("{} malformed rows were skipped", summary.rows_skipped);
    }
    Ok(summary)
}
