//! Workbook data structures

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Cell lookup over a loaded sheet
///
/// Coordinates are 1-based. Positions outside the populated cells read as an
/// empty string rather than an error.
pub trait CellSource {
    /// Used extent of the sheet
    fn dimensions(&self) -> SheetDimensions;

    /// Textual value of the cell at (row, col)
    fn cell_text(&self, row: u32, col: u32) -> String;
}

/// Used extent of a sheet, counted from A1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SheetDimensions {
    pub rows: u32,
    pub cols: u32,
}

/// An opened workbook, reduced to its first sheet
#[derive(Debug, Clone)]
pub struct Workbook {
    pub path: PathBuf,
    /// All sheet names, in workbook order
    pub sheet_names: Vec<String>,
    /// The first sheet, which is the only one viewed
    pub sheet: Sheet,
}

impl CellSource for Workbook {
    fn dimensions(&self) -> SheetDimensions {
        self.sheet.dimensions()
    }

    fn cell_text(&self, row: u32, col: u32) -> String {
        self.sheet.cell_text(row, col)
    }
}

/// Represents a worksheet
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    /// Non-empty cells keyed by 0-based (row, col)
    pub cells: HashMap<(u32, u32), Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Store a value at a 0-based position, skipping empty values
    pub fn insert(&mut self, row: u32, col: u32, value: CellValue) {
        if value.is_empty() {
            return;
        }
        self.cells.insert((row, col), Cell { row, col, value });
    }

    /// Get a cell at the given 0-based position
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Get the last cell with actual data (bottom-right corner of data range)
    pub fn last_data_cell(&self) -> Option<(u32, u32)> {
        let max_row = self.cells.values().map(|c| c.row).max()?;
        let max_col = self.cells.values().map(|c| c.col).max()?;
        Some((max_row, max_col))
    }
}

impl CellSource for Sheet {
    fn dimensions(&self) -> SheetDimensions {
        match self.last_data_cell() {
            Some((row, col)) => SheetDimensions {
                rows: row + 1,
                cols: col + 1,
            },
            None => SheetDimensions::default(),
        }
    }

    fn cell_text(&self, row: u32, col: u32) -> String {
        if row == 0 || col == 0 {
            return String::new();
        }
        self.get_cell(row - 1, col - 1)
            .map(|cell| cell.value.to_string())
            .unwrap_or_default()
    }
}

/// Represents a single cell
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty (blank text counts as empty)
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}
