//! Normalizer — maps parsed [`RawRow`] values onto fully-defaulted
//! [`ProductRecord`] values.
//!
//! Defaulting and coercion are driven by the [`FIELDS`] table rather than
//! per-field fallback expressions. Each entry names a column, the record
//! slot it fills (which fixes the coercion), and what it falls back to when
//! the value is absent, empty, or not numeric. Columns outside the table
//! pass through to [`ProductRecord::extra`].

use crate::parser::ParsedFeed;
use crate::types::{ProductRecord, RawRow, ACTIVE_STATUS};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// Fallback for a text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFallback {
    Literal(&'static str),
    /// `"Product {position}"`.
    Placeholder,
}

/// Fallback for an integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerFallback {
    Value(i64),
    /// The row's 1-based position.
    Position,
}

/// The record slot a column fills. Integer slots read the leading integer
/// run of the raw value; `"12.99"` reads as 12.
#[derive(Debug, Clone, Copy)]
pub enum FieldSlot {
    Text {
        slot: fn(&mut ProductRecord) -> &mut String,
        fallback: TextFallback,
    },
    Integer {
        slot: fn(&mut ProductRecord) -> &mut i64,
        fallback: IntegerFallback,
    },
}

/// One row of the field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub column: &'static str,
    pub kind: FieldSlot,
}

fn id_slot(r: &mut ProductRecord) -> &mut i64 {
    &mut r.id
}
fn name_slot(r: &mut ProductRecord) -> &mut String {
    &mut r.name
}
fn category_slot(r: &mut ProductRecord) -> &mut String {
    &mut r.category
}
fn price_slot(r: &mut ProductRecord) -> &mut i64 {
    &mut r.price
}
fn description_slot(r: &mut ProductRecord) -> &mut String {
    &mut r.description
}
fn image_slot(r: &mut ProductRecord) -> &mut String {
    &mut r.image
}
fn status_slot(r: &mut ProductRecord) -> &mut String {
    &mut r.status
}
fn stock_slot(r: &mut ProductRecord) -> &mut i64 {
    &mut r.stock
}

const fn text(
    column: &'static str,
    slot: fn(&mut ProductRecord) -> &mut String,
    fallback: TextFallback,
) -> FieldRule {
    FieldRule {
        column,
        kind: FieldSlot::Text { slot, fallback },
    }
}

const fn integer(
    column: &'static str,
    slot: fn(&mut ProductRecord) -> &mut i64,
    fallback: IntegerFallback,
) -> FieldRule {
    FieldRule {
        column,
        kind: FieldSlot::Integer { slot, fallback },
    }
}

/// Recognised columns, in output order.
pub const FIELDS: &[FieldRule] = &[
    integer("id", id_slot, IntegerFallback::Position),
    text("name", name_slot, TextFallback::Placeholder),
    text("category", category_slot, TextFallback::Literal("other")),
    integer("price", price_slot, IntegerFallback::Value(0)),
    text("description", description_slot, TextFallback::Literal("")),
    text("image", image_slot, TextFallback::Literal("")),
    text("status", status_slot, TextFallback::Literal(ACTIVE_STATUS)),
    integer("stock", stock_slot, IntegerFallback::Value(0)),
];

impl FieldRule {
    /// Write this column's value for a row at `position` into `record`.
    pub fn apply(&self, record: &mut ProductRecord, raw: Option<&str>, position: usize) {
        match self.kind {
            FieldSlot::Text { slot, fallback } => {
                *slot(record) = match (raw, fallback) {
                    (Some(value), _) => value.to_string(),
                    (None, TextFallback::Literal(s)) => s.to_string(),
                    (None, TextFallback::Placeholder) => format!("Product {position}"),
                };
            }
            FieldSlot::Integer { slot, fallback } => {
                *slot(record) = raw.and_then(leading_integer).unwrap_or(match fallback {
                    IntegerFallback::Value(n) => n,
                    IntegerFallback::Position => i64::try_from(position).unwrap_or(i64::MAX),
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

// ASCII digits only; `\d` would also take other scripts' digits, which do not
// parse as i64.
static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?[0-9]+)").expect("leading integer pattern is valid")
});

/// Parse the leading integer run of `s`. Returns `None` when `s` has no
/// leading digits or the run does not fit in an `i64`.
pub fn leading_integer(s: &str) -> Option<i64> {
    LEADING_INTEGER
        .captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Normalisation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Drop records whose status is not `active`.
    pub active_only: bool,
}

/// Build a fully-defaulted record from one parsed row.
pub fn normalize_row(row: &RawRow) -> ProductRecord {
    let extra: BTreeMap<String, String> = row
        .values
        .iter()
        .filter(|(column, value)| !column.is_empty() && !value.is_empty() && !is_recognised(column))
        .map(|(column, value)| (column.clone(), value.clone()))
        .collect();

    let mut record = ProductRecord {
        extra,
        ..ProductRecord::default()
    };
    for rule in FIELDS {
        rule.apply(&mut record, row.get(rule.column), row.position);
    }
    record
}

/// Normalise every row, preserving input order, then apply the
/// active-only filter if enabled.
pub fn normalize(rows: &[RawRow], options: &NormalizeOptions) -> Vec<ProductRecord> {
    let records: Vec<ProductRecord> = rows.iter().map(normalize_row).collect();
    warn_duplicate_ids(rows, &records);

    let total = records.len();
    let kept: Vec<ProductRecord> = if options.active_only {
        records.into_iter().filter(ProductRecord::is_active).collect()
    } else {
        records
    };

    if kept.len() < total {
        tracing::info!(
            dropped = total - kept.len(),
            kept = kept.len(),
            "filtered inactive products"
        );
    }
    kept
}

/// Normalise a parsed feed. Warns when the header names none of the
/// recognised columns, which usually means the wrong delimiter.
pub fn normalize_feed(feed: &ParsedFeed, options: &NormalizeOptions) -> Vec<ProductRecord> {
    if !feed.headers.is_empty() && !feed.headers.iter().any(|h| is_recognised(h)) {
        tracing::warn!(headers = ?feed.headers, "feed header has no recognised product columns");
    }
    normalize(&feed.rows, options)
}

fn is_recognised(column: &str) -> bool {
    FIELDS.iter().any(|rule| rule.column == column)
}

fn warn_duplicate_ids(rows: &[RawRow], records: &[ProductRecord]) {
    let mut first_seen: HashMap<i64, usize> = HashMap::new();
    for (row, record) in rows.iter().zip(records) {
        if let Some(&earlier) = first_seen.get(&record.id) {
            tracing::warn!(
                id = record.id,
                first_row = earlier,
                row = row.position,
                "duplicate product id"
            );
        } else {
            first_seen.insert(record.id, row.position);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
