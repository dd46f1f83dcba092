//! Diagnostics printed to stderr

use colored::*;
use sheetview_core::error::EXIT_RUNTIME;
use sheetview_core::{Language, ViewerError, Warning};

/// Print a non-fatal warning with a colored prefix
pub fn print_warning(warning: &Warning, lang: Language) {
    eprintln!(
        "{} {}",
        format!("{}:", lang.warning_prefix()).yellow().bold(),
        warning.message(lang)
    );
}

/// Print an error and return the process exit code for it
pub fn print_error(err: &anyhow::Error, lang: Language) -> i32 {
    let (message, code) = match err.downcast_ref::<ViewerError>() {
        Some(viewer_err) => (viewer_err.localized(lang), viewer_err.exit_code()),
        None => (format!("{:#}", err), EXIT_RUNTIME),
    };
    eprintln!(
        "{} {}",
        format!("{}:", lang.error_prefix()).red().bold(),
        message
    );
    code
}
