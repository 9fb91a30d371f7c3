//! Core types for shelf-core.
//!
//! This module defines the data structures shared across the pipeline: the
//! normalised [`ProductRecord`], the emitted [`Catalog`] document with its
//! optional [`CatalogMeta`], and the [`RawRow`] handed from the parser to the
//! normalizer.

use serde::Serialize;
use std::collections::BTreeMap;

/// A normalised product entry.
///
/// Every field is always populated: the normalizer applies a default for any
/// column that is missing, empty, or fails numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    /// Falls back to the row's 1-based position when absent or non-numeric.
    pub id: i64,
    /// Falls back to `"Product {position}"`.
    pub name: String,
    /// Defaults to `"other"`.
    pub category: String,
    /// Whole currency units; fractional input is truncated.
    pub price: i64,
    pub description: String,
    /// Path or filename reference.
    pub image: String,
    /// Defaults to `"active"`.
    pub status: String,
    pub stock: i64,
    /// Columns outside the recognised set, keyed by lower-case header name.
    /// Empty values are not recorded.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl ProductRecord {
    /// True when `status` is `active` (ASCII case-insensitive).
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case(ACTIVE_STATUS)
    }

    /// True when at least one unit is in stock.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// The status value that marks a record as live.
pub const ACTIVE_STATUS: &str = "active";

/// One data row as produced by the parser, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based position among data rows (the header is not counted).
    pub position: usize,
    /// Lower-case header name → trimmed raw value. Every header column is
    /// present; short rows map their missing trailing columns to `""`.
    pub values: BTreeMap<String, String>,
}

impl RawRow {
    /// Look up a column, treating an empty value as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Run metadata attached to an emitted catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogMeta {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub count: usize,
    /// Human-readable description of where the rows came from.
    pub source: String,
    /// Set when the feed could not be read and the catalog is a fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The document handed to every sink: the ordered record sequence plus
/// optional metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub products: Vec<ProductRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<CatalogMeta>,
}

impl Catalog {
    /// A catalog without metadata.
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self {
            products,
            meta: None,
        }
    }

    /// Attach metadata stamped with `generated_at`; `count` is derived from
    /// the product list.
    pub fn with_meta(
        mut self,
        source: impl Into<String>,
        generated_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        self.meta = Some(CatalogMeta {
            generated_at,
            count: self.products.len(),
            source: source.into(),
            error: None,
        });
        self
    }

    /// An empty catalog annotated with the error that prevented reading the
    /// feed. Metadata is always present on a fallback.
    pub fn fallback(
        source: impl Into<String>,
        error: impl Into<String>,
        generated_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let mut catalog = Self::new(Vec::new()).with_meta(source, generated_at);
        if let Some(meta) = catalog.meta.as_mut() {
            meta.error = Some(error.into());
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(product.category.as_str());
            }
        }
        seen
    }
}
