//! Row and column extraction

use serde::Serialize;

use crate::cell_ref::column_label;
use crate::reader::CellSource;
use crate::selection::IndexSelection;

/// One row of cell text, clipped to a column cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSlice {
    pub row_index: u32,
    pub cells: Vec<String>,
}

/// One column of cell text, clipped to a row cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSlice {
    pub col_index: u32,
    pub col_label: String,
    pub values: Vec<String>,
}

/// Read the selected rows, each holding `min(max_cols, sheet cols)` cells
pub fn extract_rows<S: CellSource + ?Sized>(
    source: &S,
    selection: &IndexSelection,
    max_cols: u32,
) -> Vec<RowSlice> {
    let width = max_cols.min(source.dimensions().cols);
    selection
        .indices
        .iter()
        .map(|&row| RowSlice {
            row_index: row,
            cells: (1..=width).map(|col| source.cell_text(row, col)).collect(),
        })
        .collect()
}

/// Read the selected columns, each holding `min(max_rows, sheet rows)` cells
pub fn extract_columns<S: CellSource + ?Sized>(
    source: &S,
    selection: &IndexSelection,
    max_rows: u32,
) -> Vec<ColumnSlice> {
    let height = max_rows.min(source.dimensions().rows);
    selection
        .indices
        .iter()
        .map(|&col| ColumnSlice {
            col_index: col,
            col_label: column_label(col),
            values: (1..=height).map(|row| source.cell_text(row, col)).collect(),
        })
        .collect()
}
