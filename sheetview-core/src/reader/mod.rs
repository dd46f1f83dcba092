//! Excel/ODS file reader using calamine

use calamine::{Data, ExcelDateTime, Range, Reader, Sheets, open_workbook_auto};
use chrono::NaiveTime;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, ViewerError};

pub mod workbook;

pub use workbook::{Cell, CellSource, CellValue, Sheet, SheetDimensions, Workbook};

/// File extensions calamine can decode
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read the first sheet of a workbook from a file path
///
/// The calamine reader holding the file open lives only for the duration of
/// this call, so the handle is released on success and on every error path.
pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    check_path(path)?;

    let mut excel: Sheets<BufReader<File>> =
        open_workbook_auto(path).map_err(|source| ViewerError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let sheet_names = excel.sheet_names();
    let first = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ViewerError::NoSheets(path.to_path_buf()))?;
    debug!(
        "opened {} ({} sheets), reading '{}'",
        path.display(),
        sheet_names.len(),
        first
    );

    let range = excel
        .worksheet_range(&first)
        .map_err(|source| ViewerError::Sheet {
            sheet: first.clone(),
            source,
        })?;
    let sheet = parse_sheet(&first, &range);
    debug!("sheet '{}': {} non-empty cells", first, sheet.cells.len());

    Ok(Workbook {
        path: path.to_path_buf(),
        sheet_names,
        sheet,
    })
}

/// Validate that `path` names an existing workbook file
pub fn check_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ViewerError::FileNotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(ViewerError::IsDirectory(path.to_path_buf()));
    }

    let supported = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);
    if !supported {
        return Err(ViewerError::UnsupportedExtension(path.to_path_buf()));
    }
    Ok(())
}

fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    // Range coordinates are relative to its first used cell
    let (start_row, start_col) = match range.start() {
        Some(start) => start,
        None => return sheet,
    };

    for (rel_row, rel_col, data) in range.used_cells() {
        sheet.insert(
            start_row + rel_row as u32,
            start_col + rel_col as u32,
            parse_cell_value(data),
        );
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => format_datetime(dt),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Show date cells the way a reader sees them: `2023-07-16`,
/// `2023-07-16 12:30:00` or `36:15:00` for durations
///
/// Serials outside the calendar fall back to the raw number.
fn format_datetime(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return match dt.as_duration() {
            Some(duration) => CellValue::Text(format_duration(duration)),
            None => CellValue::Number(dt.as_f64()),
        };
    }
    match dt.as_datetime() {
        Some(datetime) if datetime.time() == NaiveTime::MIN => {
            CellValue::Text(datetime.format("%Y-%m-%d").to_string())
        }
        Some(datetime) => CellValue::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => CellValue::Number(dt.as_f64()),
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
