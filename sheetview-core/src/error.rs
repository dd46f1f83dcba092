//! Error types for sheetview-core

use std::path::PathBuf;
use thiserror::Error;

use crate::messages::{self, Language};
use crate::selection::{Axis, SelectionIssue};

/// Result type alias using [`ViewerError`]
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Exit code for runtime failures
pub const EXIT_RUNTIME: i32 = 1;
/// Exit code for invalid arguments or configuration
pub const EXIT_USAGE: i32 = 2;

/// Errors that can end an invocation
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("path is a directory, not a file: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("unsupported file type: {} (expected xlsx, xlsm, xlsb, xls or ods)", .0.display())]
    UnsupportedExtension(PathBuf),

    /// The workbook could not be decoded
    #[error("failed to read workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook has no sheets: {}", .0.display())]
    NoSheets(PathBuf),

    #[error("failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    /// Regex keyword failed to compile
    #[error("invalid regular expression: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Malformed `--rows`/`--cols` selection
    #[error("invalid {axis} selection '{input}': {issue}")]
    InvalidSelection {
        axis: Axis,
        input: String,
        issue: SelectionIssue,
    },

    /// Malformed `--search-row`/`--search-col` index
    #[error("--search-{} needs a valid {axis} index (integer greater than 0): '{input}'", .axis.flag_suffix())]
    InvalidIndex { axis: Axis, input: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render output: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    /// Whether this error was caused by bad arguments rather than by the file
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ViewerError::InvalidSelection { .. }
                | ViewerError::InvalidIndex { .. }
                | ViewerError::InvalidConfig(_)
                | ViewerError::ConfigParse { .. }
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            EXIT_USAGE
        } else {
            EXIT_RUNTIME
        }
    }

    /// Message in the requested language
    pub fn localized(&self, lang: Language) -> String {
        match lang {
            Language::En => self.to_string(),
            Language::Zh => messages::error_text_zh(self),
        }
    }
}

impl From<csv::Error> for ViewerError {
    fn from(err: csv::Error) -> Self {
        ViewerError::Render(err.to_string())
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Render(err.to_string())
    }
}
