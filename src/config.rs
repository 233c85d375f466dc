// In: src/config.rs

//! The single source of truth for all dimsplit run configuration.
//!
//! `ExtractConfig` is created once at the application boundary (CLI flags, a
//! JSON file, or plain defaults) and then passed down read-only through the
//! pipeline. The defaults reproduce the historical NYC jobs export: agency name
//! in column 1, comma separated, written to `jobs_data.csv` and
//! `agencies_data.csv`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DimsplitError, Result};

//==================================================================================
// I. Policy Enums
//==================================================================================

/// What the loader does with a data line that has no field at the category index.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// **Default:** abort the run with `DimsplitError::MalformedRow`.
    #[default]
    Fail,

    /// Drop the line, log a warning, and count it in the run summary.
    Skip,
}

//==================================================================================
// II. The Unified ExtractConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ExtractConfig {
    /// The delimited source file. Its first line is always treated as a header.
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Destination of the rewritten rows.
    #[serde(default = "default_fact_output_path")]
    pub fact_output_path: PathBuf,

    /// Destination of the `name,id` lookup table.
    #[serde(default = "default_dimension_output_path")]
    pub dimension_output_path: PathBuf,

    /// 0-based index of the field that is replaced by an identifier.
    #[serde(default = "default_category_column")]
    pub category_column: usize,

    /// Field separator, used both for splitting input and joining output.
    /// Quotes are not special: a delimiter inside a quoted field still splits it.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default)]
    pub malformed_rows: MalformedRowPolicy,

    /// If true, outputs are staged in temporary files next to their destination
    /// and only renamed into place once both have been written completely.
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            fact_output_path: default_fact_output_path(),
            dimension_output_path: default_dimension_output_path(),
            category_column: default_category_column(),
            delimiter: default_delimiter(),
            malformed_rows: MalformedRowPolicy::default(),
            atomic_writes: true,
        }
    }
}

impl ExtractConfig {
    /// Loads a config from a JSON file. Missing keys fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DimsplitError::file_io(path, e))?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Rejects settings that would make the run meaningless or destructive.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.delimiter, '\n' | '\r') {
            return Err(DimsplitError::InvalidConfig(format!(
                "delimiter {:?} is a line terminator",
                self.delimiter
            )));
        }
        let input = resolved(&self.input_path);
        let fact = resolved(&self.fact_output_path);
        let dimension = resolved(&self.dimension_output_path);
        if fact == dimension {
            return Err(DimsplitError::InvalidConfig(format!(
                "fact and dimension outputs are both '{}'",
                self.fact_output_path.display()
            )));
        }
        for (output, resolved_output) in [
            (&self.fact_output_path, &fact),
            (&self.dimension_output_path, &dimension),
        ] {
            if *resolved_output == input {
                return Err(DimsplitError::InvalidConfig(format!(
                    "output '{}' would overwrite the input file",
                    output.display()
                )));
            }
        }
        Ok(())
    }

    /// Minimum number of fields a data line needs for the category to exist.
    pub fn min_fields(&self) -> usize {
        self.category_column + 1
    }
}

/// Resolves `..` and symlinks so two spellings of one file compare equal.
/// A file that does not exist yet is resolved through its directory; if that
/// is missing too, the path is compared as given.
fn resolved(path: &Path) -> PathBuf {
    if let Ok(full) = path.canonicalize() {
        return full;
    }
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    match (dir.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_input_path() -> PathBuf {
    PathBuf::from("nyc_jobs.csv")
}

fn default_fact_output_path() -> PathBuf {
    PathBuf::from("jobs_data.csv")
}

fn default_dimension_output_path() -> PathBuf {
    PathBuf::from("agencies_data.csv")
}

fn default_category_column() -> usize {
    1
}

fn default_delimiter() -> char {
    ','
}
