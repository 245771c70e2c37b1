//! Command implementations.
//!
//! Each command is one user event against a screen controller. Views are
//! written to stdout; logs go to stderr.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use std::io::Write;

use askama::Template;
use lavender_core::pagination::PageOutOfRange;
use lavender_storefront::error::{AppError, Result};

/// Render a view to stdout.
fn emit(view: &impl Template) -> Result<()> {
    let rendered = view.render()?;
    say(&rendered)
}

/// Write one line to stdout.
fn say(line: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    Ok(())
}

fn page_error(err: PageOutOfRange) -> AppError {
    AppError::Validation(err.to_string())
}
