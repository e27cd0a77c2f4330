//! Per-sheet cleaning pipeline

use chrono::NaiveDate;
use serde_json::{Map, Value as Json};

use crate::change;
use crate::locate;
use crate::model::{Cell, CleanedSheet, NormalizedRow, RawSheet, SheetReport, Value};
use crate::parse;
use crate::schema::{FieldKind, FieldSpec, Schema, DATE_FORMAT};

/// Run the full cleaning pipeline over one raw sheet.
///
/// Locates the dict-bearing column, decodes every row's record, intersects
/// the observed fields with the canonical schema, derives change/percent
/// from the compound text, parses dates and sorts ascending. Early exits
/// ("no dict column", "no valid rows") leave the report's sheet empty; the
/// caller decides how to surface that.
pub fn sheet(raw: &RawSheet, name: &str, schema: &Schema) -> SheetReport {
    let mut report = SheetReport {
        name: name.to_string(),
        input_rows: raw.row_count(),
        dict_column: None,
        parsed_rows: 0,
        sheet: CleanedSheet::default(),
    };

    let Some(dict_col) = locate::dict_column(raw) else {
        return report;
    };
    report.dict_column = Some(raw.columns()[dict_col].clone());

    // Keep only rows whose record cell decodes; nested keys are flattened.
    let mut records: Vec<(Map<String, Json>, &[Cell])> = Vec::new();
    for (idx, row) in raw.rows().iter().enumerate() {
        match parse::record(&row[dict_col]) {
            Some(map) => records.push((parse::flatten(&map), row.as_slice())),
            None => {
                if !row[dict_col].is_empty() {
                    log::warn!("{name}: row {idx}: undecodable record, dropped");
                }
            }
        }
    }
    if records.is_empty() {
        return report;
    }
    report.parsed_rows = records.len();

    let fields = present_fields(schema, &records, raw, dict_col);
    let mut rows: Vec<NormalizedRow> = records
        .iter()
        .map(|(map, row)| build_row(&fields, map, row, raw, dict_col))
        .collect();

    // Stable sort, unparseable dates after all parseable ones.
    if let Some(date_idx) = fields.iter().position(|f| f.kind == FieldKind::Date) {
        rows.sort_by_key(|row| {
            let date = row[date_idx].as_ref().and_then(Value::as_date);
            (date.is_none(), date)
        });
    }

    report.sheet = CleanedSheet {
        headers: fields.iter().map(|f| f.header.to_string()).collect(),
        rows,
    };
    report
}

/// Intersect the canonical field list with what the sheet actually carries.
///
/// A field counts as observed when its source key appears in any decoded
/// record or matches a non-dict input column. Order follows the schema, and
/// the first observed field per output header wins, which lets the pair
/// derived from the compound change text shadow a directly-reported percent.
fn present_fields<'s>(
    schema: &'s Schema,
    records: &[(Map<String, Json>, &[Cell])],
    raw: &RawSheet,
    dict_col: usize,
) -> Vec<&'s FieldSpec> {
    let observed = |source: &str| {
        records.iter().any(|(map, _)| map.contains_key(source))
            || raw
                .columns()
                .iter()
                .enumerate()
                .any(|(i, c)| i != dict_col && c == source)
    };

    let mut fields: Vec<&FieldSpec> = Vec::new();
    for spec in &schema.fields {
        if fields.iter().any(|f| f.header == spec.header) {
            continue;
        }
        if observed(spec.source) {
            fields.push(spec);
        }
    }
    fields
}

fn build_row(
    fields: &[&FieldSpec],
    map: &Map<String, Json>,
    row: &[Cell],
    raw: &RawSheet,
    dict_col: usize,
) -> NormalizedRow {
    fields
        .iter()
        .map(|spec| match spec.kind {
            FieldKind::Date => string_of(map, row, raw, dict_col, spec.source)
                .and_then(|t| NaiveDate::parse_from_str(t.trim(), DATE_FORMAT).ok())
                .map(Value::Date),
            FieldKind::Number => {
                number_of(map, row, raw, dict_col, spec.source).map(Value::Number)
            }
            FieldKind::ChangeValue => string_of(map, row, raw, dict_col, spec.source)
                .and_then(|t| change::extract(&t).0)
                .map(Value::Number),
            FieldKind::ChangePercent => string_of(map, row, raw, dict_col, spec.source)
                .and_then(|t| change::extract(&t).1)
                .map(Value::Number),
        })
        .collect()
}

/// Textual source lookup: decoded record first, then the row's own non-dict
/// columns. Non-textual values yield `None` so the date and change parsers
/// only ever see text.
fn string_of(
    map: &Map<String, Json>,
    row: &[Cell],
    raw: &RawSheet,
    dict_col: usize,
    source: &str,
) -> Option<String> {
    if let Some(value) = map.get(source) {
        return match value {
            Json::String(s) => Some(s.clone()),
            _ => None,
        };
    }
    let col = raw.column_index(source).filter(|&c| c != dict_col)?;
    row[col].as_text().map(|s| s.to_string())
}

/// Numeric source lookup, tolerating numeric strings with thousands commas
fn number_of(
    map: &Map<String, Json>,
    row: &[Cell],
    raw: &RawSheet,
    dict_col: usize,
    source: &str,
) -> Option<f64> {
    if let Some(value) = map.get(source) {
        return match value {
            Json::Number(n) => n.as_f64(),
            Json::String(s) => parse_number(s),
            _ => None,
        };
    }
    let col = raw.column_index(source).filter(|&c| c != dict_col)?;
    match &row[col] {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record_sheet(cells: &[&str]) -> RawSheet {
        let mut sheet = RawSheet::new(vec!["STT".into(), "Data".into()]);
        for (i, cell) in cells.iter().enumerate() {
            sheet.push_row(vec![
                Cell::Number((i + 1) as f64),
                Cell::Text(cell.to_string()),
            ]);
        }
        sheet
    }

    fn date(s: &str) -> Value {
        Value::Date(NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap())
    }

    #[test]
    fn end_to_end_three_rows_one_malformed() {
        let raw = record_sheet(&[
            r#"{"Ngay":"02/01/2020","GiaMoCua":10.2,"GiaDongCua":10.7,"ThayDoi":"0.5 (5.0%)"}"#,
            r#"{"Ngay":"01/01/2020","GiaMoCua":10.0"#,
            r#"{"Ngay":"01/01/2020","GiaMoCua":10.0,"GiaDongCua":10.5,"ThayDoi":"0.5 (5.0%)"}"#,
        ]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.input_rows, 3);
        assert_eq!(report.dict_column.as_deref(), Some("Data"));
        assert_eq!(report.parsed_rows, 2);
        assert_eq!(
            report.sheet.headers,
            vec!["Date", "Open", "Close", "Change", "Change_Pct"]
        );

        // Sorted ascending by date.
        assert_eq!(
            report.sheet.rows[0],
            vec![
                Some(date("01/01/2020")),
                Some(Value::Number(10.0)),
                Some(Value::Number(10.5)),
                Some(Value::Number(0.5)),
                Some(Value::Number(5.0)),
            ]
        );
        let day = report.sheet.column("Date").unwrap();
        let open = report.sheet.column("Open").unwrap();
        assert_eq!(report.sheet.rows[1][day], Some(date("02/01/2020")));
        assert_eq!(report.sheet.rows[1][open], Some(Value::Number(10.2)));
    }

    #[test]
    fn unexpected_fields_are_dropped() {
        let raw = record_sheet(&[r#"{"Ngay":"01/01/2020","GiaMoCua":10.0,"ExtraField":1}"#]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.sheet.headers, vec!["Date", "Open"]);
    }

    #[test]
    fn no_dict_column_yields_empty_sheet() {
        let mut raw = RawSheet::new(vec!["A".into(), "B".into()]);
        raw.push_row(vec![Cell::Number(1.0), Cell::Text("plain".into())]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.dict_column, None);
        assert!(report.sheet.is_empty());
    }

    #[test]
    fn no_decodable_rows_yields_empty_sheet() {
        // First value has both braces, so the column is located, but nothing
        // decodes.
        let raw = record_sheet(&["{broken}", "{also broken}"]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.dict_column.as_deref(), Some("Data"));
        assert_eq!(report.parsed_rows, 0);
        assert!(report.sheet.is_empty());
    }

    #[test]
    fn unparseable_dates_sort_last_in_input_order() {
        let raw = record_sheet(&[
            r#"{"Ngay":"03/01/2020","GiaMoCua":3.0}"#,
            r#"{"Ngay":"not a date","GiaMoCua":9.1}"#,
            r#"{"Ngay":"01/01/2020","GiaMoCua":1.0}"#,
            r#"{"Ngay":"??","GiaMoCua":9.2}"#,
        ]);

        let report = sheet(&raw, "CEO", &Schema::default());
        let open = report.sheet.column("Open").unwrap();
        let opens: Vec<Option<f64>> = report
            .sheet
            .rows
            .iter()
            .map(|r| r[open].as_ref().and_then(Value::as_number))
            .collect();

        assert_eq!(opens, vec![Some(1.0), Some(3.0), Some(9.1), Some(9.2)]);

        let day = report.sheet.column("Date").unwrap();
        assert_eq!(report.sheet.rows[2][day], None);
    }

    #[test]
    fn direct_percent_used_when_compound_text_absent() {
        let raw = record_sheet(&[r#"{"Ngay":"01/01/2020","PhanTramThayDoi":2.5}"#]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.sheet.headers, vec!["Date", "Change_Pct"]);
        assert_eq!(report.sheet.rows[0][1], Some(Value::Number(2.5)));
    }

    #[test]
    fn derived_pair_shadows_direct_percent() {
        let raw = record_sheet(&[
            r#"{"Ngay":"01/01/2020","ThayDoi":"-1.25 (-3.4%)","PhanTramThayDoi":99.0}"#,
        ]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.sheet.headers, vec!["Date", "Change", "Change_Pct"]);
        assert_eq!(report.sheet.rows[0][1], Some(Value::Number(-1.25)));
        assert_eq!(report.sheet.rows[0][2], Some(Value::Number(-3.4)));
    }

    #[test]
    fn change_text_missing_percent_leaves_it_null() {
        let raw = record_sheet(&[r#"{"Ngay":"01/01/2020","ThayDoi":"+0.5"}"#]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.sheet.headers, vec!["Date", "Change", "Change_Pct"]);
        assert_eq!(report.sheet.rows[0][1], Some(Value::Number(0.5)));
        assert_eq!(report.sheet.rows[0][2], None);
    }

    #[test]
    fn numeric_strings_with_thousands_commas() {
        let raw = record_sheet(&[
            r#"{"Ngay":"01/01/2020","KhoiLuongKhopLenh":"1,234,500","GiaTriKhopLenh":"12,691,000,000"}"#,
        ]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.sheet.headers, vec!["Date", "Volume", "Value"]);
        assert_eq!(report.sheet.rows[0][1], Some(Value::Number(1_234_500.0)));
        assert_eq!(
            report.sheet.rows[0][2],
            Some(Value::Number(12_691_000_000.0))
        );
    }

    #[test]
    fn falls_back_to_plain_input_columns() {
        // A field missing from the record but present as an ordinary column
        // still lands in the output.
        let mut raw = RawSheet::new(vec!["GiaMoCua".into(), "Data".into()]);
        raw.push_row(vec![
            Cell::Number(10.0),
            Cell::Text(r#"{"Ngay":"01/01/2020"}"#.into()),
        ]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.sheet.headers, vec!["Date", "Open"]);
        assert_eq!(report.sheet.rows[0][1], Some(Value::Number(10.0)));
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let raw = record_sheet(&[
            r#"{"Ngay":"02/01/2020","GiaMoCua":10.2}"#,
            r#"{"Ngay":"01/01/2020","GiaMoCua":10.0}"#,
        ]);

        let first = sheet(&raw, "CEO", &Schema::default());
        let second = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(first.sheet, second.sheet);
    }

    #[test]
    fn nested_record_keys_flatten_to_dotted_names() {
        // Dotted names do not collide with any canonical source, so nested
        // payloads simply fall outside the schema intersection.
        let raw = record_sheet(&[r#"{"Ngay":"01/01/2020","extra":{"GiaMoCua":1.0}}"#]);

        let report = sheet(&raw, "CEO", &Schema::default());

        assert_eq!(report.sheet.headers, vec!["Date"]);
    }
}
