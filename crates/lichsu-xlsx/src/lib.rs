//! # lichsu-xlsx
//!
//! The file-format boundary for lichsu: reading input workbooks into
//! [`lichsu_core::RawSheet`] tables (calamine) and writing cleaned results
//! back out (rust_xlsxwriter). No cleaning logic lives here.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{Error, Result};
pub use reader::InputWorkbook;
pub use writer::write_workbook;
