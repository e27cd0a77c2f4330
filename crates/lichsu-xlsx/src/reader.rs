//! Input workbook reading via calamine

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use lichsu_core::{Cell, RawSheet};

use crate::error::Result;

/// An open input workbook
pub struct InputWorkbook {
    inner: Xlsx<BufReader<File>>,
}

impl InputWorkbook {
    /// Open an XLSX workbook from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            inner: open_workbook(path)?,
        })
    }

    /// Names of all sheets present, in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names().to_vec()
    }

    /// Read one sheet into a [`RawSheet`]; the first row supplies the column
    /// names, every following row becomes a data row.
    pub fn read_sheet(&mut self, name: &str) -> Result<RawSheet> {
        let range = self.inner.worksheet_range(name)?;
        let mut rows = range.rows();

        let columns = match rows.next() {
            Some(header) => dedupe_headers(
                header
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| header_name(cell, i))
                    .collect(),
            ),
            None => Vec::new(),
        };

        let mut sheet = RawSheet::new(columns);
        for row in rows {
            sheet.push_row(row.iter().map(cell_value).collect());
        }
        Ok(sheet)
    }
}

/// Header cells are usually text; blank ones get a positional name so the
/// column stays addressable.
fn header_name(cell: &Data, index: usize) -> String {
    let name = match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    };
    if name.is_empty() {
        format!("Unnamed_{index}")
    } else {
        name
    }
}

/// Repeated header names get numeric suffixes (`Gia`, `Gia_1`, ...) so
/// `column_index` resolves unambiguously.
fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let n = *seen.get(&name).unwrap_or(&0);
            let out = if n == 0 {
                name.clone()
            } else {
                format!("{name}_{n}")
            };
            seen.insert(name, n + 1);
            out
        })
        .collect()
}

fn cell_value(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("error cell treated as empty: {e:?}");
            Cell::Empty
        }
    }
}
