//! Keyword search within one row or one column

use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell_ref::{cell_reference, column_label};
use crate::error::Result;
use crate::reader::CellSource;
use crate::report::Warning;

/// Default number of matches returned
pub const DEFAULT_LIMIT: u32 = 10;

/// How a keyword is compared with cell text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive substring
    #[default]
    Fuzzy,
    /// Whole-value equality
    Exact,
    /// Regular expression found anywhere in the value
    Regex,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Fuzzy => write!(f, "fuzzy"),
            MatchMode::Exact => write!(f, "exact"),
            MatchMode::Regex => write!(f, "regex"),
        }
    }
}

/// Case handling for [`MatchMode::Exact`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExactCase {
    #[default]
    Insensitive,
    Sensitive,
}

/// The line being searched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    /// Scan every column of this row
    Row(u32),
    /// Scan every row of this column
    Column(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    pub keyword: String,
    pub mode: MatchMode,
    /// Always at least 1
    pub limit: u32,
    pub exact_case: ExactCase,
}

impl SearchSpec {
    pub fn new(keyword: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            keyword: keyword.into(),
            mode,
            limit: DEFAULT_LIMIT,
            exact_case: ExactCase::default(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn with_exact_case(mut self, exact_case: ExactCase) -> Self {
        self.exact_case = exact_case;
        self
    }
}

/// A matching cell: its position along the scanned axis and its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub position: u32,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Ascending scan order, never more than the limit
    pub hits: Vec<SearchHit>,
    pub warning: Option<Warning>,
}

/// Compiled form of a [`SearchSpec`]
#[derive(Debug)]
pub enum Matcher {
    Fuzzy(String),
    Exact { keyword: String, case: ExactCase },
    Regex(Regex),
}

impl Matcher {
    /// Prepare the keyword; fails only when a regex does not compile
    pub fn new(spec: &SearchSpec) -> Result<Self> {
        Ok(match spec.mode {
            MatchMode::Fuzzy => Matcher::Fuzzy(spec.keyword.to_lowercase()),
            MatchMode::Exact => Matcher::Exact {
                keyword: match spec.exact_case {
                    ExactCase::Insensitive => spec.keyword.to_lowercase(),
                    ExactCase::Sensitive => spec.keyword.clone(),
                },
                case: spec.exact_case,
            },
            MatchMode::Regex => {
                let re = Regex::new(&spec.keyword)?;
                trace!("compiled pattern {:?}", re.as_str());
                Matcher::Regex(re)
            }
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Fuzzy(keyword) => text.to_lowercase().contains(keyword.as_str()),
            Matcher::Exact {
                keyword,
                case: ExactCase::Insensitive,
            } => text.to_lowercase() == *keyword,
            Matcher::Exact {
                keyword,
                case: ExactCase::Sensitive,
            } => text == keyword,
            Matcher::Regex(re) => re.is_match(text),
        }
    }
}

/// Scan one row or column for cells matching `spec`
///
/// The pattern is compiled before anything is read. A target outside the
/// sheet yields no hits and a warning. Scanning stops at the `limit`-th hit.
pub fn search<S: CellSource + ?Sized>(
    source: &S,
    target: SearchTarget,
    spec: &SearchSpec,
) -> Result<SearchOutcome> {
    let matcher = Matcher::new(spec)?;
    let dims = source.dimensions();
    let limit = spec.limit.max(1) as usize;

    let (fixed, fixed_total, scan_total) = match target {
        SearchTarget::Row(row) => (row, dims.rows, dims.cols),
        SearchTarget::Column(col) => (col, dims.cols, dims.rows),
    };

    if fixed == 0 || fixed > fixed_total {
        let warning = match target {
            SearchTarget::Row(index) => Warning::RowIndexOutOfRange {
                index,
                available: dims.rows,
            },
            SearchTarget::Column(index) => Warning::ColumnIndexOutOfRange {
                index,
                available: dims.cols,
            },
        };
        return Ok(SearchOutcome {
            hits: Vec::new(),
            warning: Some(warning),
        });
    }

    let mut hits = Vec::new();
    for pos in 1..=scan_total {
        let (row, col) = match target {
            SearchTarget::Row(row) => (row, pos),
            SearchTarget::Column(col) => (pos, col),
        };
        let value = source.cell_text(row, col);
        if matcher.is_match(&value) {
            trace!("match at {}: {:?}", cell_reference(row, col), value);
            hits.push(SearchHit {
                position: pos,
                value,
            });
            if hits.len() >= limit {
                trace!("limit {} reached at position {}", limit, pos);
                break;
            }
        }
    }

    debug!(
        "{} search for {:?} ({}): {} hits",
        match target {
            SearchTarget::Row(row) => format!("row {row}"),
            SearchTarget::Column(col) => format!("column {}", column_label(col)),
        },
        spec.keyword,
        spec.mode,
        hits.len()
    );

    Ok(SearchOutcome {
        hits,
        warning: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use crate::reader::{CellValue, SheetDimensions};
    use proptest::prelude::*;
    use std::cell::Cell;

    /// Column source that records how many cells were read
    struct Probe {
        values: Vec<&'static str>,
        reads: Cell<u32>,
    }

    impl Probe {
        fn new(values: Vec<&'static str>) -> Self {
            Self {
                values,
                reads: Cell::new(0),
            }
        }
    }

    impl CellSource for Probe {
        fn dimensions(&self) -> SheetDimensions {
            SheetDimensions {
                rows: self.values.len() as u32,
                cols: 2,
            }
        }

        fn cell_text(&self, row: u32, col: u32) -> String {
            self.reads.set(self.reads.get() + 1);
            if col == 2 {
                self.values[(row - 1) as usize].to_string()
            } else {
                String::new()
            }
        }
    }

    fn positions(outcome: &SearchOutcome) -> Vec<u32> {
        outcome.hits.iter().map(|h| h.position).collect()
    }

    #[test]
    fn test_fuzzy_is_case_insensitive() {
        let src = Probe::new(vec!["Alpha", "beta", "ALPHABET", "gamma"]);
        let spec = SearchSpec::new("alpha", MatchMode::Fuzzy);
        let out = search(&src, SearchTarget::Column(2), &spec).unwrap();
        assert_eq!(positions(&out), vec![1, 3]);
        assert_eq!(out.hits[1].value, "ALPHABET");
        assert!(out.warning.is_none());
    }

    #[test]
    fn test_exact_case_policy() {
        let src = Probe::new(vec!["Test", "test", "testing", "TEST"]);

        let spec = SearchSpec::new("test", MatchMode::Exact);
        let out = search(&src, SearchTarget::Column(2), &spec).unwrap();
        assert_eq!(positions(&out), vec![1, 2, 4]);

        let spec = spec.with_exact_case(ExactCase::Sensitive);
        let out = search(&src, SearchTarget::Column(2), &spec).unwrap();
        assert_eq!(positions(&out), vec![2]);
    }

    #[test]
    fn test_regex_mode() {
        let src = Probe::new(vec!["id-12", "none", "ID-7", "x9"]);
        let spec = SearchSpec::new(r"^id-\d+$", MatchMode::Regex);
        let out = search(&src, SearchTarget::Column(2), &spec).unwrap();
        assert_eq!(positions(&out), vec![1]);

        let spec = SearchSpec::new(r"(?i)^id-\d+$", MatchMode::Regex);
        let out = search(&src, SearchTarget::Column(2), &spec).unwrap();
        assert_eq!(positions(&out), vec![1, 3]);
    }

    #[test]
    fn test_invalid_regex_fails_before_reading() {
        let src = Probe::new(vec!["1", "2"]);
        let spec = SearchSpec::new("[0-9+", MatchMode::Regex);
        let err = search(&src, SearchTarget::Column(2), &spec).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidPattern(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(src.reads.get(), 0);

        // Even when the target is out of range
        let err = search(&src, SearchTarget::Column(9), &spec).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidPattern(_)));
    }

    #[test]
    fn test_limit_stops_scanning() {
        let src = Probe::new(vec!["test", "x", "test", "test", "test"]);
        let spec = SearchSpec::new("test", MatchMode::Exact).with_limit(2);
        let out = search(&src, SearchTarget::Column(2), &spec).unwrap();
        assert_eq!(positions(&out), vec![1, 3]);
        // Rows 4 and 5 were never read
        assert_eq!(src.reads.get(), 3);
    }

    #[test]
    fn test_out_of_range_target() {
        let src = Probe::new(vec!["a", "b"]);
        let spec = SearchSpec::new("a", MatchMode::Fuzzy);

        let out = search(&src, SearchTarget::Column(5), &spec).unwrap();
        assert!(out.hits.is_empty());
        assert_eq!(
            out.warning,
            Some(Warning::ColumnIndexOutOfRange {
                index: 5,
                available: 2
            })
        );

        let out = search(&src, SearchTarget::Row(3), &spec).unwrap();
        assert_eq!(
            out.warning,
            Some(Warning::RowIndexOutOfRange {
                index: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_row_search() {
        let mut sheet = crate::reader::Sheet::new("Sheet1");
        sheet.insert(0, 0, CellValue::Text("error: disk".to_string()));
        sheet.insert(0, 1, CellValue::Number(404.0));
        sheet.insert(0, 3, CellValue::Text("Error".to_string()));
        sheet.insert(1, 0, CellValue::Text("error".to_string()));

        let spec = SearchSpec::new("error", MatchMode::Fuzzy);
        let out = search(&sheet, SearchTarget::Row(1), &spec).unwrap();
        assert_eq!(positions(&out), vec![1, 4]);

        let spec = SearchSpec::new("^4", MatchMode::Regex);
        let out = search(&sheet, SearchTarget::Row(1), &spec).unwrap();
        assert_eq!(out.hits, vec![SearchHit { position: 2, value: "404".to_string() }]);
    }

    #[test]
    fn test_with_limit_floor() {
        assert_eq!(SearchSpec::new("x", MatchMode::Fuzzy).with_limit(0).limit, 1);
    }

    proptest! {
        #[test]
        fn returns_first_hits_in_order(
            flags in proptest::collection::vec(any::<bool>(), 1..40),
            limit in 1u32..10,
        ) {
            let values: Vec<&'static str> = flags.iter().map(|&f| if f { "hit" } else { "miss" }).collect();
            let src = Probe::new(values);
            let spec = SearchSpec::new("hit", MatchMode::Exact).with_limit(limit);
            let out = search(&src, SearchTarget::Column(2), &spec).unwrap();

            let expected: Vec<u32> = flags
                .iter()
                .enumerate()
                .filter(|(_, f)| **f)
                .map(|(i, _)| i as u32 + 1)
                .take(limit as usize)
                .collect();
            prop_assert_eq!(positions(&out), expected);
        }
    }
}
