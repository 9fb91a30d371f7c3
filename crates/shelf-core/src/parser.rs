//! Parser — splits a delimited-text blob into header-keyed [`RawRow`] values.
//!
//! Uses the standard CSV grammar: a delimiter inside a double-quoted span does
//! not split, `""` inside quotes is a literal quote, and a quoted field may
//! span a line break. Malformed quoting is never fatal; an unterminated quote
//! simply absorbs the rest of the input into its field. Padding between a
//! delimiter and an opening quote is dropped, so `a, "b, c"` is two fields.
//!
//! Lines that are blank after trimming are dropped. The first non-blank line
//! is the header; its names are trimmed and folded to lower-case so that
//! column lookup downstream is case-insensitive.

use crate::types::RawRow;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Delimiter and grammar options for [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Result of parsing one feed: the folded header plus every data row in
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ParsedFeed {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse `text` into rows. Never fails: input with fewer than two non-blank
/// lines yields an empty row list, and a reader error ends parsing with the
/// rows collected so far.
pub fn parse(text: &str, options: &ParseOptions) -> ParsedFeed {
    let text = strip_padding_before_quotes(text, options.delimiter);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(options.delimiter)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, rows = rows.len(), "stopping parse at unreadable record");
                break;
            }
        };
        if is_blank(&record) {
            continue;
        }

        match headers.as_ref() {
            None => {
                headers = Some(record.iter().map(str::to_lowercase).collect());
            }
            Some(columns) => {
                rows.push(RawRow {
                    position: rows.len() + 1,
                    values: zip_row(columns, &record),
                });
            }
        }
    }

    ParsedFeed {
        headers: headers.unwrap_or_default(),
        rows,
    }
}

/// Parse with the default comma delimiter.
pub fn parse_str(text: &str) -> ParsedFeed {
    parse(text, &ParseOptions::default())
}

/// Remove unquoted spaces and tabs between a field start and an opening
/// quote. The CSV grammar only honours a quote as the first byte of a field;
/// without this, `1, "a, b"` would split inside the quotes.
fn strip_padding_before_quotes(text: &str, delimiter: u8) -> Cow<'_, str> {
    if !text.contains('"') {
        return Cow::Borrowed(text);
    }

    let delimiter = char::from(delimiter);
    let is_padding = |c: char| (c == ' ' || c == '\t') && c != delimiter;

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut at_field_start = true;
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            out.push(c);
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    out.push('"');
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        if at_field_start && is_padding(c) {
            let mut padding = String::from(c);
            while let Some(&next) = chars.peek() {
                if !is_padding(next) {
                    break;
                }
                padding.push(next);
                chars.next();
            }
            if chars.peek() != Some(&'"') {
                out.push_str(&padding);
            }
            continue;
        }

        out.push(c);
        if c == delimiter || c == '\n' {
            at_field_start = true;
        } else if c == '"' && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else if c != '\r' {
            at_field_start = false;
        }
    }

    Cow::Owned(out)
}

/// A whitespace-only line surfaces as a single empty field after trimming.
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.get(0).map_or(true, str::is_empty)
}

/// Pair each header with its field; missing trailing fields become `""` and
/// surplus fields are ignored.
fn zip_row(columns: &[String], record: &StringRecord) -> BTreeMap<String, String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| (column.clone(), record.get(i).unwrap_or("").to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
