//! Output formatters for reports
//!
//! Both formats render the same [`Report`]; the caller picks one through
//! [`OutputFormat`] and [`presenter_for`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::cell_ref::column_label;
use crate::error::{Result, ViewerError};
use crate::messages::Language;
use crate::report::{Report, ReportBody};
use crate::search::SearchTarget;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON payload
    #[default]
    Json,
    /// Delimited text table
    Text,
}

/// Renders a report into the text written to stdout
pub trait Presenter {
    fn render(&self, report: &Report) -> Result<String>;

    /// Whether warnings are part of the rendered output
    fn embeds_warnings(&self) -> bool;
}

/// Build the presenter for a format
pub fn presenter_for(format: OutputFormat, lang: Language, delimiter: u8) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Json => Box::new(JsonPresenter { lang }),
        OutputFormat::Text => Box::new(TextPresenter { delimiter }),
    }
}

/// JSON with fixed top-level keys
pub struct JsonPresenter {
    pub lang: Language,
}

impl JsonPresenter {
    fn payload(&self, report: &Report) -> Value {
        let mut result = match &report.body {
            ReportBody::Size(dims) => json!({ "rows": dims.rows, "cols": dims.cols }),
            ReportBody::Rows(rows) => {
                let width = rows.rows.first().map_or(0, |r| r.cells.len() as u32);
                json!({
                    "rows": rows.rows.iter().map(|r| r.row_index).collect::<Vec<_>>(),
                    "maxCols": rows.max_cols,
                    "columns": (1..=width).map(column_label).collect::<Vec<_>>(),
                    "data": rows.rows.iter().map(|r| &r.cells).collect::<Vec<_>>(),
                })
            }
            ReportBody::Columns(cols) => json!({
                "cols": cols.columns.iter().map(|c| c.col_index).collect::<Vec<_>>(),
                "maxRows": cols.max_rows,
                "data": cols.columns,
            }),
            ReportBody::ColumnSearch(found) => json!({
                "matches": found.hits.len(),
                "rowIndices": found.hits.iter().map(|h| h.position).collect::<Vec<_>>(),
                "data": found.rows.iter().map(|r| &r.cells).collect::<Vec<_>>(),
            }),
            ReportBody::RowSearch(found) => json!({
                "matches": found.hits.len(),
                "data": found.hits.iter().map(|h| json!({
                    "colIndex": h.position,
                    "colLabel": column_label(h.position),
                    "value": h.value,
                })).collect::<Vec<_>>(),
            }),
        };

        if let (Some(warning), Value::Object(map)) = (report.warning(), &mut result) {
            map.insert("warning".to_string(), json!(warning.message(self.lang)));
        }

        let mut payload = serde_json::Map::new();
        payload.insert("success".to_string(), json!(true));
        payload.insert("operation".to_string(), json!(report.operation()));
        payload.insert(
            "filePath".to_string(),
            json!(report.file_path.display().to_string()),
        );
        if let Some(params) = &report.search {
            let (key, index) = match params.target {
                SearchTarget::Column(col) => ("colIndex", col),
                SearchTarget::Row(row) => ("rowIndex", row),
            };
            payload.insert(
                "searchParams".to_string(),
                json!({
                    key: index,
                    "keyword": params.keyword,
                    "mode": params.mode,
                    "limit": params.limit,
                }),
            );
        }
        payload.insert("result".to_string(), result);
        Value::Object(payload)
    }
}

impl Presenter for JsonPresenter {
    fn render(&self, report: &Report) -> Result<String> {
        let mut out = String::new();
        write_json(&mut out, &self.payload(report), 0, false)?;
        out.push('\n');
        Ok(out)
    }

    fn embeds_warnings(&self) -> bool {
        true
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Pretty-print with two-space indent, keeping arrays of scalars on one line
/// and scalar-only records inside arrays on one line each.
fn write_json(out: &mut String, value: &Value, indent: usize, in_array: bool) -> Result<()> {
    let pad = " ".repeat(indent + 2);
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) if items.iter().all(is_scalar) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&serde_json::to_string(item)?);
            }
            out.push(']');
        }
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                out.push_str(&pad);
                write_json(out, item, indent + 2, true)?;
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&" ".repeat(indent));
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) if in_array && map.values().all(is_scalar) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push_str(": ");
                out.push_str(&serde_json::to_string(item)?);
            }
            out.push('}');
        }
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                out.push_str(&pad);
                out.push_str(&serde_json::to_string(key)?);
                out.push_str(": ");
                write_json(out, item, indent + 2, false)?;
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&" ".repeat(indent));
            out.push('}');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}

/// Delimited text table with a lettered header row
pub struct TextPresenter {
    pub delimiter: u8,
}

impl TextPresenter {
    fn table(report: &Report) -> Vec<Vec<String>> {
        let mut table = Vec::new();
        match &report.body {
            ReportBody::Size(dims) => {
                table.push(vec!["rows".to_string(), "cols".to_string()]);
                table.push(vec![dims.rows.to_string(), dims.cols.to_string()]);
            }
            ReportBody::Rows(rows) if !rows.rows.is_empty() => {
                let width = rows.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
                table.push(header((1..=width as u32).map(column_label)));
                for row in &rows.rows {
                    table.push(numbered(row.row_index, row.cells.iter().cloned()));
                }
            }
            ReportBody::Columns(cols) if !cols.columns.is_empty() => {
                table.push(header(cols.columns.iter().map(|c| c.col_label.clone())));
                let height = cols.columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
                for r in 0..height {
                    let cells = cols
                        .columns
                        .iter()
                        .map(|c| c.values.get(r).cloned().unwrap_or_default());
                    table.push(numbered(r as u32 + 1, cells));
                }
            }
            ReportBody::ColumnSearch(found) if !found.rows.is_empty() => {
                let width = found.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
                table.push(header((1..=width as u32).map(column_label)));
                for row in &found.rows {
                    table.push(numbered(row.row_index, row.cells.iter().cloned()));
                }
            }
            ReportBody::RowSearch(found) => {
                if let (false, Some(SearchTarget::Row(row))) =
                    (found.hits.is_empty(), report.search.as_ref().map(|p| p.target))
                {
                    table.push(header(found.hits.iter().map(|h| column_label(h.position))));
                    table.push(numbered(row, found.hits.iter().map(|h| h.value.clone())));
                }
            }
            // Nothing to tabulate, not even a header
            _ => {}
        }
        table
    }
}

fn header(labels: impl Iterator<Item = String>) -> Vec<String> {
    std::iter::once(String::new()).chain(labels).collect()
}

fn numbered(index: u32, cells: impl Iterator<Item = String>) -> Vec<String> {
    std::iter::once(index.to_string()).chain(cells).collect()
}

impl Presenter for TextPresenter {
    fn render(&self, report: &Report) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(Vec::new());
        for record in Self::table(report) {
            writer.write_record(&record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ViewerError::Render(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ViewerError::Render(e.to_string()))
    }

    fn embeds_warnings(&self) -> bool {
        false
    }
}
