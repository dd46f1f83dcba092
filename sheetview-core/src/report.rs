//! Operation results handed to a presenter

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::extract::{ColumnSlice, RowSlice};
use crate::messages::{self, Language};
use crate::reader::SheetDimensions;
use crate::search::{MatchMode, SearchHit, SearchTarget};

/// The single operation performed by an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Size,
    Rows,
    Cols,
    SearchCol,
    SearchRow,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Size => "size",
            Operation::Rows => "rows",
            Operation::Cols => "cols",
            Operation::SearchCol => "search-col",
            Operation::SearchRow => "search-row",
        };
        f.write_str(name)
    }
}

/// Non-fatal notice that a request went past the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    RowsExceeded { requested: u32, available: u32 },
    ColumnsExceeded { requested: u32, available: u32 },
    RowIndexOutOfRange { index: u32, available: u32 },
    ColumnIndexOutOfRange { index: u32, available: u32 },
}

impl Warning {
    pub fn message(&self, lang: Language) -> String {
        messages::warning_text(self, lang)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(Language::En))
    }
}

/// Echo of the search request, included in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub target: SearchTarget,
    pub keyword: String,
    pub mode: MatchMode,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowsReport {
    pub rows: Vec<RowSlice>,
    pub max_cols: u32,
    pub warning: Option<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnsReport {
    pub columns: Vec<ColumnSlice>,
    pub max_rows: u32,
    pub warning: Option<Warning>,
}

/// Hits of a column search with the full rows they sit on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSearchReport {
    pub hits: Vec<SearchHit>,
    pub rows: Vec<RowSlice>,
    pub warning: Option<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSearchReport {
    pub hits: Vec<SearchHit>,
    pub warning: Option<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBody {
    Size(SheetDimensions),
    Rows(RowsReport),
    Columns(ColumnsReport),
    ColumnSearch(ColumnSearchReport),
    RowSearch(RowSearchReport),
}

/// Everything a presenter needs to render one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub file_path: PathBuf,
    pub search: Option<SearchParams>,
    pub body: ReportBody,
}

impl Report {
    pub fn operation(&self) -> Operation {
        match self.body {
            ReportBody::Size(_) => Operation::Size,
            ReportBody::Rows(_) => Operation::Rows,
            ReportBody::Columns(_) => Operation::Cols,
            ReportBody::ColumnSearch(_) => Operation::SearchCol,
            ReportBody::RowSearch(_) => Operation::SearchRow,
        }
    }

    pub fn warning(&self) -> Option<&Warning> {
        match &self.body {
            ReportBody::Size(_) => None,
            ReportBody::Rows(r) => r.warning.as_ref(),
            ReportBody::Columns(c) => c.warning.as_ref(),
            ReportBody::ColumnSearch(s) => s.warning.as_ref(),
            ReportBody::RowSearch(s) => s.warning.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::SearchCol.to_string(), "search-col");
        assert_eq!(
            serde_json::to_string(&Operation::SearchRow).unwrap(),
            "\"search-row\""
        );
    }

    #[test]
    fn test_report_warning() {
        let report = Report {
            file_path: PathBuf::from("a.xlsx"),
            search: None,
            body: ReportBody::Rows(RowsReport {
                rows: Vec::new(),
                max_cols: 50,
                warning: Some(Warning::RowsExceeded {
                    requested: 10,
                    available: 5,
                }),
            }),
        };
        assert_eq!(report.operation(), Operation::Rows);
        assert_eq!(
            report.warning().map(|w| w.to_string()),
            Some("requested 10 rows but file has 5".to_string())
        );
    }
}
