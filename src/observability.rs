//! Logger setup for the `log` facade.
//!
//! Library code only ever calls the `log::*` macros; whoever owns the process
//! (the `dimsplit` binary, a bench, an embedding application) decides whether
//! and where those records go by calling [`init_logging`] once.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::{DimsplitError, Result};

static INIT_LOGGER: Once = Once::new();

/// Maps a `-v` count to a level filter. `None` means "defer to `RUST_LOG`".
pub fn level_for_verbosity(verbosity: u8) -> Option<LevelFilter> {
    match verbosity {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Installs the global logger. Only the first call has any effect.
///
/// With `verbosity == 0` the filter comes from `RUST_LOG`, falling back to
/// `warn`. When `log_file` is given, records are appended to it instead of
/// going to stderr.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    // Open the file up front so a bad path is reported instead of swallowed.
    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| DimsplitError::file_io(path, e))
        })
        .transpose()?;

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        match level_for_verbosity(verbosity) {
            Some(level) => {
                builder.filter_level(level);
            }
            None => {
                builder.filter_level(LevelFilter::Warn);
                builder.parse_default_env();
            }
        }

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
