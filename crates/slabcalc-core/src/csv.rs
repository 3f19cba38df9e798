//! Minimal comma-separated reading and writing for report files.
//!
//! Quoted fields, doubled-quote escapes, and CRLF line endings are handled;
//! nothing else about the dialect is configurable.

use std::io::{self, Write};
use std::mem::take;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("report is missing the \"{0}\" column")]
    MissingColumn(String),

    #[error("row {row}: \"{value}\" in column \"{column}\" is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("report has no header row")]
    Empty,
}

/// Splits `text` into rows of fields. Blank lines are dropped.
#[must_use]
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if row.len() == 1 && row[0].is_empty() {
                    row.clear();
                } else {
                    rows.push(take(&mut row));
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush the last row when the text has no trailing newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Writes one row, quoting fields that contain separators, quotes, or newlines.
/// Rows end in CRLF.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_row<W, S>(w: &mut W, row: &[S]) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}
