//! Test builders — ergonomic constructors for `ProductRecord` and `Config`.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use shelf_core::config::{Config, SourceKind};
use shelf_core::export::ExportTarget;
use shelf_core::ProductRecord;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ProductBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`ProductRecord`] fixtures. Starts from the defaults a
/// record at `id` would get from an empty row.
///
/// # Example
///
/// ```rust
/// let product = ProductBuilder::new(1)
///     .name("Oak Desk")
///     .category("furniture")
///     .price(250)
///     .build();
/// ```
pub struct ProductBuilder {
    record: ProductRecord,
}

impl ProductBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            record: ProductRecord {
                id,
                name: format!("Product {id}"),
                category: "other".to_string(),
                price: 0,
                description: String::new(),
                image: String::new(),
                status: "active".to_string(),
                stock: 0,
                extra: BTreeMap::new(),
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.record.category = category.into();
        self
    }

    pub fn price(mut self, price: i64) -> Self {
        self.record.price = price;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.record.description = description.into();
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.record.image = image.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.record.status = status.into();
        self
    }

    pub fn stock(mut self, stock: i64) -> Self {
        self.record.stock = stock;
        self
    }

    pub fn extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.extra.insert(column.into(), value.into());
        self
    }

    pub fn build(self) -> ProductRecord {
        self.record
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// Defaults with every output redirected into `dir` and the source pointed
/// at `dir/products.csv`.
pub fn config_in(dir: &Path) -> Config {
    let mut cfg = Config::defaults();
    cfg.source.kind = SourceKind::File;
    cfg.source.path = dir.join("products.csv");
    cfg.output.json_path = dir.join("products.json");
    cfg.output.script_path = dir.join("products.js");
    cfg.output.html_path = dir.join("catalog.html");
    cfg
}

/// Like [`config_in`] with every target enabled.
pub fn config_all_targets(dir: &Path) -> Config {
    let mut cfg = config_in(dir);
    cfg.output.targets = vec![ExportTarget::Json, ExportTarget::Script, ExportTarget::Html];
    cfg
}

/// Like [`config_in`] but reading from `url`.
pub fn config_http(dir: &Path, url: impl Into<String>) -> Config {
    let mut cfg = config_in(dir);
    cfg.source.kind = SourceKind::Http;
    cfg.source.url = url.into();
    cfg
}

/// Read a written JSON artifact back as a value.
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("read json artifact");
    serde_json::from_str(&text).expect("json artifact parses")
}
