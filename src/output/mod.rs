//! Rendering of command results as aligned tables or JSON.
//!
//! Every command produces a `serde_json::Value`; this module turns it into
//! the text written to stdout. Objects render as a two-column `KEY | VALUE`
//! table, arrays as one row per element, and scalars as plain text.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OutputError;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain aligned table.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Returns the lowercase name used in configuration files and flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

/// Renders a value in the requested format.
///
/// `columns` selects and orders the columns of an array table. When empty,
/// the keys of the first element are used.
///
/// # Errors
///
/// Returns [`OutputError::Render`] if JSON serialisation fails.
pub fn render(
    value: &Value,
    format: OutputFormat,
    columns: &[&str],
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|error| OutputError::Render {
                message: error.to_string(),
            })
        }
        OutputFormat::Table => Ok(render_table(value, columns)),
    }
}

fn render_table(value: &Value, columns: &[&str]) -> String {
    match value {
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, cell)| vec![key.clone(), cell_text(cell)])
                .collect::<Vec<_>>();
            format_rows(&[String::from("KEY"), String::from("VALUE")], &rows)
        }
        Value::Array(items) => {
            let headers = resolve_columns(items, columns);
            let rows = items
                .iter()
                .map(|item| {
                    headers
                        .iter()
                        .map(|column| item.get(column).map(cell_text).unwrap_or_default())
                        .collect()
                })
                .collect::<Vec<Vec<String>>>();
            let upper = headers
                .iter()
                .map(|header| header.to_uppercase())
                .collect::<Vec<_>>();
            format_rows(&upper, &rows)
        }
        scalar => cell_text(scalar),
    }
}

fn resolve_columns(items: &[Value], columns: &[&str]) -> Vec<String> {
    if !columns.is_empty() {
        return columns.iter().map(|column| (*column).to_owned()).collect();
    }
    items
        .first()
        .and_then(Value::as_object)
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

/// Text of a single table cell. Strings are unquoted; nested values are
/// compact JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_rows(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
