//! Output workbook writing via rust_xlsxwriter

use std::path::Path;

use lichsu_core::schema::{PLACEHOLDER_HEADER, PLACEHOLDER_MESSAGE};
use lichsu_core::{CleanedSheet, Value};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;

/// Write one output sheet per entry, names preserved, no index column.
///
/// Empty results become a one-cell placeholder table so the symbol still
/// shows up in the output workbook. The whole workbook is assembled in
/// memory and saved once.
pub fn write_workbook<P: AsRef<Path>>(path: P, sheets: &[(String, CleanedSheet)]) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    for (name, cleaned) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;

        if cleaned.is_empty() {
            worksheet.write_string(0, 0, PLACEHOLDER_HEADER)?;
            worksheet.write_string(1, 0, PLACEHOLDER_MESSAGE)?;
            continue;
        }

        for (col, header) in cleaned.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header)?;
        }
        for (r, row) in cleaned.rows.iter().enumerate() {
            let r = (r + 1) as u32;
            for (c, value) in row.iter().enumerate() {
                let c = c as u16;
                match value {
                    Some(Value::Date(date)) => {
                        worksheet.write_datetime_with_format(r, c, date, &date_format)?;
                    }
                    Some(Value::Number(n)) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    None => {}
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
