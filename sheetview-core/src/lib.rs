//! sheetview-core: view and search the first sheet of an Excel/ODS workbook
//!
//! Selection parsing, extraction and search run over the [`CellSource`]
//! trait; [`reader`] provides the calamine-backed implementation and
//! [`presenter`] turns a [`Report`] into JSON or delimited text.

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod extract;
pub mod messages;
pub mod presenter;
pub mod reader;
pub mod report;
pub mod search;
pub mod selection;
pub mod viewer;

pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use messages::Language;
pub use presenter::{OutputFormat, Presenter, presenter_for};
pub use reader::{CellSource, SheetDimensions, Workbook, open_workbook};
pub use report::{Operation, Report, ReportBody, Warning};
pub use search::{ExactCase, MatchMode, SearchSpec, SearchTarget};
pub use selection::{Axis, IndexSelection};
pub use viewer::{Request, ViewOptions};
