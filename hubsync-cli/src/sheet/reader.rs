//! Workbook loading via calamine

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{TimeZone, Utc};
use log::debug;

use super::model::{CellValue, Sheet, Workbook};

/// Load an existing workbook. A missing file is not an error; the first
/// sync run starts from an empty workbook and creates the file on save.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        debug!("Workbook {} not found, starting empty", path.display());
        return Ok(Workbook::default());
    }

    let mut xlsx: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let mut workbook = Workbook::default();
    for sheet_name in xlsx.sheet_names() {
        let range = xlsx
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read worksheet {}", sheet_name))?;

        let mut sheet = Sheet::new(&sheet_name);
        // Ranges are anchored at the first used cell, not A1. Pad the
        // leading rows and columns so indices line up with the file.
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        for _ in 0..row_offset {
            sheet.push_row(Vec::new());
        }
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; col_offset];
            cells.extend(row.iter().map(cell_from_xlsx));
            sheet.push_row(cells);
        }

        workbook.sheets.push(sheet);
    }

    debug!(
        "Loaded {} sheets from {}",
        workbook.sheets.len(),
        path.display()
    );
    Ok(workbook)
}

fn cell_from_xlsx(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(Utc.from_utc_datetime(&naive)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
    }
}
