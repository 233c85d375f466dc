//! This file is the root of the `dimsplit` Rust crate.
//!
//! `dimsplit` normalizes a flat delimited export by pulling one repeated text
//! column out into a lookup table. One pass over the source produces:
//! 1.  a **fact** file: every data row, with the category field replaced by an
//!     integer identifier, and
//! 2.  a **dimension** file: one `name,id` line per distinct category.
//!
//! The binary in `src/bin/dimsplit.rs` is a thin CLI over [`pipeline::run`].

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod config;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod row;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::{ExtractConfig, MalformedRowPolicy};
pub use error::{DimsplitError, Result};
pub use pipeline::{run, ExtractionSummary};
pub use registry::CategoryRegistry;
pub use row::Row;
