//! Input and output table types

use chrono::NaiveDate;

/// A single input cell value as read from a worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Check if this cell carries no value
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Get the text content, if this cell is textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One sheet of raw input: ordered column names plus rows of cells.
///
/// Rows are padded or truncated on insert so every row has exactly one cell
/// per column. Never mutated after loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    /// Create an empty sheet with the given column names
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with empty cells to the column count
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Column names in sheet order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows; each row has `columns().len()` cells
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A normalized output cell value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Date(NaiveDate),
    Number(f64),
}

impl Value {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One output row, aligned with its sheet's header list.
///
/// `None` marks a field whose value was absent or unparseable.
pub type NormalizedRow = Vec<Option<Value>>;

/// A cleaned per-symbol table: canonical headers plus date-sorted rows.
///
/// May be empty, meaning no valid records were found for that symbol; the
/// exporter substitutes a placeholder sheet in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

impl CleanedSheet {
    /// Check if no valid rows were produced
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of an output column by header name
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// Outcome of cleaning one sheet, for console reporting
#[derive(Debug, Clone)]
pub struct SheetReport {
    /// Sheet (symbol) name
    pub name: String,
    /// Rows in the raw input sheet
    pub input_rows: usize,
    /// Name of the located dict-bearing column, if any
    pub dict_column: Option<String>,
    /// Rows whose record cell decoded successfully
    pub parsed_rows: usize,
    /// The cleaned result; empty on "no dict column" or "no valid rows"
    pub sheet: CleanedSheet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_row_pads_to_column_count() {
        let mut sheet = RawSheet::new(vec!["A".into(), "B".into(), "C".into()]);
        sheet.push_row(vec![Cell::Number(1.0)]);

        assert_eq!(
            sheet.rows()[0],
            vec![Cell::Number(1.0), Cell::Empty, Cell::Empty]
        );
    }

    #[test]
    fn push_row_truncates_extra_cells() {
        let mut sheet = RawSheet::new(vec!["A".into()]);
        sheet.push_row(vec![Cell::Number(1.0), Cell::Number(2.0)]);

        assert_eq!(sheet.rows()[0], vec![Cell::Number(1.0)]);
    }

    #[test]
    fn column_lookup() {
        let sheet = RawSheet::new(vec!["STT".into(), "Data".into()]);

        assert_eq!(sheet.column_index("Data"), Some(1));
        assert_eq!(sheet.column_index("Missing"), None);
    }
}
