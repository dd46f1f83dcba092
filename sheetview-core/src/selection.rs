//! Row/column selection parsing
//!
//! A selection is a comma separated list of items. Each item is a single
//! index or a `start-end` range. Column endpoints may also be letter labels
//! (`A`, `AA`, ...), freely mixed with numbers.

use log::debug;
use std::collections::HashSet;
use std::fmt;

use crate::cell_ref::{self, MAX_COLUMN, MAX_ROW};
use crate::error::{Result, ViewerError};

/// Selection used when none is given
pub const DEFAULT_SELECTION: &str = "1-3";

/// Which axis a selection or search index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Suffix used in the `--search-row`/`--search-col` flag names
    pub fn flag_suffix(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "col",
        }
    }

    /// Largest index a worksheet can have on this axis
    pub fn max_index(self) -> u32 {
        match self {
            Axis::Row => MAX_ROW,
            Axis::Column => MAX_COLUMN,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Why a selection failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIssue {
    EmptyItem,
    MalformedRange,
    NotPositive,
    NotNumeric,
    InvalidLabel,
    TooLarge,
}

impl fmt::Display for SelectionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SelectionIssue::EmptyItem => "empty item in list",
            SelectionIssue::MalformedRange => "malformed range, expected start-end",
            SelectionIssue::NotPositive => "indices must be integers greater than 0",
            SelectionIssue::NotNumeric => "row indices must be numbers",
            SelectionIssue::InvalidLabel => "column indices must be numbers or letters A-Z",
            SelectionIssue::TooLarge => "index exceeds the worksheet limit",
        };
        f.write_str(text)
    }
}

/// Ordered, de-duplicated 1-based indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSelection {
    pub indices: Vec<u32>,
    /// Highest index asked for, before clipping to the sheet
    pub max_requested: u32,
}

impl IndexSelection {
    /// Whether the request reached past `total_available`
    pub fn exceeds(&self, total_available: u32) -> bool {
        self.max_requested > total_available
    }

    /// Drop indices beyond `total_available`
    ///
    /// When that would leave nothing, the unfiltered request is kept so the
    /// caller still has something to show alongside its range warning.
    pub(crate) fn clip(self, total_available: u32) -> IndexSelection {
        let in_range: Vec<u32> = self
            .indices
            .iter()
            .copied()
            .filter(|&i| i <= total_available)
            .collect();
        if in_range.is_empty() {
            return self;
        }
        IndexSelection {
            indices: in_range,
            max_requested: self.max_requested,
        }
    }
}

/// Parse a selection expression for `axis` and clip it to a sheet extent
///
/// `max_requested` survives clipping, so callers can still tell whether the
/// request reached past the sheet.
pub fn select_indices(raw: &str, axis: Axis, total_available: u32) -> Result<IndexSelection> {
    let selection = parse_selection(raw, axis)?.clip(total_available);
    debug!(
        "{} selection '{}' -> {} indices (max requested {}, available {})",
        axis,
        raw.trim(),
        selection.indices.len(),
        selection.max_requested,
        total_available
    );
    Ok(selection)
}

/// Parse a selection expression without clipping it to a sheet
///
/// An empty expression selects the first three indices.
pub fn parse_selection(raw: &str, axis: Axis) -> Result<IndexSelection> {
    let raw = raw.trim();
    let expr = if raw.is_empty() {
        DEFAULT_SELECTION
    } else {
        raw
    };

    let invalid = |issue| ViewerError::InvalidSelection {
        axis,
        input: expr.to_string(),
        issue,
    };

    let mut requested = Vec::new();
    let mut seen = HashSet::new();

    for item in expr.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(invalid(SelectionIssue::EmptyItem));
        }

        let (start, end) = match item.split_once('-') {
            Some((lo, hi)) => {
                let (lo, hi) = (lo.trim(), hi.trim());
                if lo.is_empty() || hi.is_empty() || hi.contains('-') {
                    return Err(invalid(SelectionIssue::MalformedRange));
                }
                let lo = parse_endpoint(lo, axis).map_err(invalid)?;
                let hi = parse_endpoint(hi, axis).map_err(invalid)?;
                (lo.min(hi), lo.max(hi))
            }
            None => {
                let index = parse_endpoint(item, axis).map_err(invalid)?;
                (index, index)
            }
        };

        for index in start..=end {
            if seen.insert(index) {
                requested.push(index);
            }
        }
    }

    // Every item contributes at least one index
    let max_requested = requested.iter().copied().max().unwrap_or(0);
    Ok(IndexSelection {
        indices: requested,
        max_requested,
    })
}

/// Parse the fixed index of a row/column search
///
/// Rows take a positive integer; columns also take a letter label.
pub fn parse_index(raw: &str, axis: Axis) -> Result<u32> {
    parse_endpoint(raw.trim(), axis).map_err(|_| ViewerError::InvalidIndex {
        axis,
        input: raw.to_string(),
    })
}

/// Turn the positional values of `--rows`/`--cols` into an expression
///
/// A lone integer `N` is a count and means `1-N`; two values `X Y` mean
/// `X-Y`. Anything else is already an expression.
pub fn shorthand_expression(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [single] if is_digits(single.trim()) => format!("1-{}", single.trim()),
        [single] => single.clone(),
        [first, second, ..] => format!("{}-{}", first.trim(), second.trim()),
    }
}

fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_endpoint(token: &str, axis: Axis) -> std::result::Result<u32, SelectionIssue> {
    let value = if is_digits(token) {
        let value: u32 = token.parse().map_err(|_| SelectionIssue::TooLarge)?;
        if value == 0 {
            return Err(SelectionIssue::NotPositive);
        }
        value
    } else {
        match axis {
            Axis::Row => {
                return Err(match token.parse::<i64>() {
                    Ok(n) if n <= 0 => SelectionIssue::NotPositive,
                    _ => SelectionIssue::NotNumeric,
                });
            }
            Axis::Column => cell_ref::column_number(token).ok_or(SelectionIssue::InvalidLabel)?,
        }
    };

    if value > axis.max_index() {
        return Err(SelectionIssue::TooLarge);
    }
    Ok(value)
}
