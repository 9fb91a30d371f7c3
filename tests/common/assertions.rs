//! Domain-specific assertion macros for shelf harnesses.
//!
//! These add context-rich failure messages that make it clear *which*
//! record invariant was violated.

use shelf_core::ProductRecord;

/// Assert that a record carries the defaults for every field not named in
/// the input row.
///
/// ```rust
/// assert_defaults!(record, position = 3, except = ["id", "price"]);
/// ```
#[macro_export]
macro_rules! assert_defaults {
    ($record:expr, position = $pos:expr, except = [$($skip:expr),* $(,)?]) => {{
        let record: &shelf_core::ProductRecord = &$record;
        let position: i64 = $pos;
        let skip: &[&str] = &[$($skip),*];
        let check = |field: &str, ok: bool, actual: String| {
            if !skip.contains(&field) && !ok {
                panic!(
                    "assert_defaults! failed: field {:?} is not defaulted\n  actual: {}\n  record: {:?}",
                    field, actual, record
                );
            }
        };
        check("id", record.id == position, record.id.to_string());
        check("name", record.name == format!("Product {}", position), record.name.clone());
        check("category", record.category == "other", record.category.clone());
        check("price", record.price == 0, record.price.to_string());
        check("description", record.description.is_empty(), record.description.clone());
        check("image", record.image.is_empty(), record.image.clone());
        check("status", record.status == "active", record.status.clone());
        check("stock", record.stock == 0, record.stock.to_string());
    }};
}

/// Assert that every record in a slice satisfies a predicate.
///
/// ```rust
/// assert_records_all!(records, |r| r.is_active());
/// ```
#[macro_export]
macro_rules! assert_records_all {
    ($records:expr, $pred:expr) => {{
        let records: &[shelf_core::ProductRecord] = &$records;
        let pred = $pred;
        let failing: Vec<_> = records.iter().filter(|r| !pred(*r)).map(|r| r.id).collect();
        if !failing.is_empty() {
            panic!(
                "assert_records_all! failed: {} of {} records did not satisfy predicate (ids {:?}).",
                failing.len(),
                records.len(),
                failing
            );
        }
    }};
}

/// Ids of `records` in order.
pub fn ids(records: &[ProductRecord]) -> Vec<i64> {
    records.iter().map(|r| r.id).collect()
}

/// Assert that a JSON catalog document has the expected shape: a
/// `products` array, and a `meta` block whose `count` matches it.
pub fn assert_catalog_document(value: &serde_json::Value) {
    let products = value["products"]
        .as_array()
        .unwrap_or_else(|| panic!("catalog document has no products array: {value}"));
    if let Some(meta) = value.get("meta") {
        assert_eq!(
            meta["count"].as_u64(),
            Some(products.len() as u64),
            "meta.count must equal products length: {meta}"
        );
        assert!(
            meta["generated_at"].is_string(),
            "meta.generated_at must be a timestamp string: {meta}"
        );
    }
}
