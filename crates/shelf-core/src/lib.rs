//! shelf-core — product feed normalisation and catalog rendering.
//!
//! This crate exposes the pipeline stages as public modules, plus the shared
//! types used across all of them.
//!
//! # Architecture
//!
//! ```text
//! Feed text ──► Parser ──► Normalizer ──► Export (json | script | html)
//! ```
//!
//! Every stage is a pure function of its input. Reading the feed and writing
//! the rendered artifacts happen outside this crate.

pub mod config;
pub mod export;
pub mod normalizer;
pub mod parser;
pub mod types;

pub use types::{Catalog, CatalogMeta, ProductRecord, RawRow};
