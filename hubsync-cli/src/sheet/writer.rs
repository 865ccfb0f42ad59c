//! Selective column writes and xlsx saving

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use super::model::{CellValue, Sheet, Workbook};
use crate::sync::assemble::CombinedRow;
use crate::sync::columns::{special, OutputColumn, DATE_COLUMN_FORMAT};

pub const ID_HEADER: &str = "id";

const DEFAULT_DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Rewrite the sheet's synced columns in place, leaving any other
/// columns alone. Headers live in row 0 and are matched by name;
/// missing ones are appended to the right. Every owned column is
/// cleared below the header first so rows that vanished upstream do not
/// linger, then the new rows are written from row 1 down.
pub fn write_selective(sheet: &mut Sheet, rows: &[CombinedRow], columns: &[OutputColumn]) {
    // Span the widest row so appended headers never land on top of an
    // unheadered data column.
    let width = sheet.rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut header: Vec<String> = (0..width).map(|c| sheet.cell(0, c).to_string()).collect();

    let mut indices = Vec::with_capacity(columns.len() + 1);
    for name in std::iter::once(ID_HEADER).chain(columns.iter().map(|c| c.name)) {
        let index = match header.iter().position(|h| h == name) {
            Some(index) => index,
            None => {
                header.push(name.to_string());
                let index = header.len() - 1;
                sheet.set_cell(0, index, CellValue::Text(name.to_string()));
                index
            }
        };
        if name == special::AGREEMENT_DATE {
            sheet.set_column_format(index, DATE_COLUMN_FORMAT);
        }
        indices.push(index);
    }

    for row in 1..sheet.row_count() {
        for &col in &indices {
            sheet.clear_cell(row, col);
        }
    }

    if rows.is_empty() {
        debug!("No rows to write to sheet {}", sheet.name);
        return;
    }

    for (offset, combined) in rows.iter().enumerate() {
        let row = 1 + offset;
        sheet.set_cell(row, indices[0], CellValue::Text(combined.id.clone()));
        for (value_index, &col) in indices[1..].iter().enumerate() {
            sheet.set_cell(row, col, combined.values[value_index].clone());
        }
    }

    debug!("Wrote {} rows to sheet {}", rows.len(), sheet.name);
}

/// Save the in-memory workbook as an xlsx file, applying column number
/// formats where set. Datetimes without a column format fall back to a
/// readable default so they do not render as raw serial numbers.
pub fn save_workbook(workbook: &Workbook, path: &Path) -> Result<()> {
    let mut output = rust_xlsxwriter::Workbook::new();
    let default_datetime = rust_xlsxwriter::Format::new().set_num_format(DEFAULT_DATETIME_FORMAT);

    for sheet in &workbook.sheets {
        let worksheet = output.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .with_context(|| format!("Invalid sheet name {}", sheet.name))?;

        let formats: HashMap<usize, rust_xlsxwriter::Format> = sheet
            .column_formats
            .iter()
            .map(|(&col, format)| {
                (
                    col,
                    rust_xlsxwriter::Format::new().set_num_format(format.as_str()),
                )
            })
            .collect();

        for (row, cells) in sheet.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                write_cell(
                    worksheet,
                    row as u32,
                    col as u16,
                    cell,
                    formats.get(&col),
                    &default_datetime,
                )
                .with_context(|| format!("Failed to write cell in sheet {}", sheet.name))?;
            }
        }
    }

    output
        .save(path)
        .with_context(|| format!("Failed to save workbook {}", path.display()))?;
    debug!("Saved workbook {}", path.display());
    Ok(())
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: Option<&rust_xlsxwriter::Format>,
    default_datetime: &rust_xlsxwriter::Format,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(text) => match format {
            Some(format) => {
                worksheet.write_string_with_format(row, col, text.as_str(), format)?;
            }
            None => {
                worksheet.write_string(row, col, text.as_str())?;
            }
        },
        CellValue::Number(n) => match format {
            Some(format) => {
                worksheet.write_number_with_format(row, col, *n, format)?;
            }
            None => {
                worksheet.write_number(row, col, *n)?;
            }
        },
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_datetime_with_format(
                row,
                col,
                &dt.naive_utc(),
                format.unwrap_or(default_datetime),
            )?;
        }
    }
    Ok(())
}
