//! # lichsu-core
//!
//! Core cleaning logic for stock-history workbooks whose sheets embed each
//! day's trading record as a text-serialized dictionary inside one column.
//!
//! The pipeline for one sheet:
//! - [`locate::dict_column`] - find the column carrying serialized records
//! - [`parse::record`] - decode one cell into a key-value mapping
//! - [`change::extract`] - split a compound `"<change> (<percent>%)"` text
//! - [`normalize::sheet`] - run the whole pipeline, producing a
//!   [`CleanedSheet`] with canonical column headers sorted by date
//!
//! This crate performs no file I/O; reading and writing workbooks lives in
//! `lichsu-xlsx`.

pub mod change;
pub mod locate;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod schema;

// Re-exports for convenience
pub use model::{Cell, CleanedSheet, NormalizedRow, RawSheet, SheetReport, Value};
pub use schema::{Config, FieldKind, FieldSpec, Schema};
