//! Runs one operation against a workbook

use log::debug;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::extract::{extract_columns, extract_rows};
use crate::reader::{self, CellSource};
use crate::report::{
    ColumnSearchReport, ColumnsReport, Report, ReportBody, RowSearchReport, RowsReport,
    SearchParams, Warning,
};
use crate::search::{SearchSpec, SearchTarget, search};
use crate::selection::{Axis, IndexSelection, select_indices};

/// Default column cap for `--rows`
pub const DEFAULT_MAX_COLS: u32 = 50;
/// Default row cap for `--cols`
pub const DEFAULT_MAX_ROWS: u32 = 50;

/// The validated operation to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Size,
    /// `expression` has already passed
    /// [`parse_selection`](crate::selection::parse_selection)
    Rows {
        expression: String,
        max_cols: u32,
    },
    Cols {
        expression: String,
        max_rows: u32,
    },
    Search {
        target: SearchTarget,
        spec: SearchSpec,
    },
}

/// Typed, fully-resolved options for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub path: PathBuf,
    pub request: Request,
}

/// Open the workbook, run the request and return its report
///
/// The workbook is dropped when this returns, whatever the outcome.
pub fn run(options: &ViewOptions) -> Result<Report> {
    let workbook = reader::open_workbook(&options.path)?;
    execute(&workbook, &options.path, &options.request)
}

/// Run a request against any cell source
pub fn execute<S: CellSource + ?Sized>(
    source: &S,
    path: &Path,
    request: &Request,
) -> Result<Report> {
    let dims = source.dimensions();
    debug!("sheet dimensions: {} rows x {} cols", dims.rows, dims.cols);

    let mut search_params = None;
    let body = match request {
        Request::Size => ReportBody::Size(dims),
        Request::Rows {
            expression,
            max_cols,
        } => {
            let selection = select_indices(expression, Axis::Row, dims.rows)?;
            let warning = selection.exceeds(dims.rows).then_some(Warning::RowsExceeded {
                requested: selection.max_requested,
                available: dims.rows,
            });
            ReportBody::Rows(RowsReport {
                rows: extract_rows(source, &selection, *max_cols),
                max_cols: *max_cols,
                warning,
            })
        }
        Request::Cols {
            expression,
            max_rows,
        } => {
            let selection = select_indices(expression, Axis::Column, dims.cols)?;
            let warning = selection
                .exceeds(dims.cols)
                .then_some(Warning::ColumnsExceeded {
                    requested: selection.max_requested,
                    available: dims.cols,
                });
            ReportBody::Columns(ColumnsReport {
                columns: extract_columns(source, &selection, *max_rows),
                max_rows: *max_rows,
                warning,
            })
        }
        Request::Search { target, spec } => {
            let outcome = search(source, *target, spec)?;
            search_params = Some(SearchParams {
                target: *target,
                keyword: spec.keyword.clone(),
                mode: spec.mode,
                limit: spec.limit,
            });
            match target {
                SearchTarget::Column(_) => {
                    let matched = IndexSelection {
                        indices: outcome.hits.iter().map(|h| h.position).collect(),
                        max_requested: outcome.hits.last().map_or(0, |h| h.position),
                    };
                    ReportBody::ColumnSearch(ColumnSearchReport {
                        rows: extract_rows(source, &matched, dims.cols),
                        hits: outcome.hits,
                        warning: outcome.warning,
                    })
                }
                SearchTarget::Row(_) => ReportBody::RowSearch(RowSearchReport {
                    hits: outcome.hits,
                    warning: outcome.warning,
                }),
            }
        }
    };

    Ok(Report {
        file_path: path.to_path_buf(),
        search: search_params,
        body,
    })
}
