//! shelf — product feed to catalog generator.
//!
//! Reads a product CSV from a local file or a published sheet, normalises
//! every row into a fully-defaulted product record, and writes the enabled
//! artifacts (JSON document, browser script, static HTML page). This crate
//! wires the stages together so integration tests can drive a whole run
//! without spawning the binary.
//!
//! # Architecture
//!
//! ```text
//! Feed (file | http) ──► Parser ──► Normalizer ──► Sinks ──► files on disk
//! ```
//!
//! A local file that cannot be read aborts the run before anything is
//! written. A failed fetch is answered with an empty catalog whose metadata
//! carries the error, so consumers of the artifacts always find them.

use anyhow::Context;
use shelf_core::config::{Config, OutputConfig};
use shelf_core::export::{ExportTarget, HtmlSink, JsonSink, ScriptSink, Sink};
use shelf_core::normalizer::normalize_feed;
use shelf_core::parser::parse;
use shelf_core::Catalog;
use shelf_feeds::{Feed, FeedError};
use std::path::{Path, PathBuf};

pub use shelf_core;
pub use shelf_feeds;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Products in the emitted catalog.
    pub products: usize,
    /// Files written, in target order.
    pub written: Vec<PathBuf>,
    /// Set when the feed failed and a fallback catalog was emitted instead.
    pub fallback: Option<String>,
}

/// Load configuration; see [`Config::load`] for the layering order.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load(path).context("failed to load configuration")
}

/// Execute one batch run: read the feed, normalise, write every enabled
/// artifact.
pub async fn run(config: &Config) -> anyhow::Result<RunReport> {
    let feed = Feed::from_config(&config.source);
    let generated_at = chrono::Utc::now();

    let catalog = load_catalog(&feed, config, generated_at)
        .await
        .with_context(|| format!("cannot read {} feed {}", feed, feed.describe()))?;
    let fallback = catalog.meta.as_ref().and_then(|m| m.error.clone());

    let written = write_artifacts(&catalog, &config.output)?;
    Ok(RunReport {
        products: catalog.len(),
        written,
        fallback,
    })
}

/// Read and normalise the feed into a catalog.
///
/// Errors that [`FeedError::allows_fallback`] are logged and turned into an
/// empty catalog annotated with the error; any other error is returned.
pub async fn load_catalog(
    feed: &Feed,
    config: &Config,
    generated_at: chrono::DateTime<chrono::Utc>,
) -> Result<Catalog, FeedError> {
    let text = match feed.read().await {
        Ok(text) => text,
        Err(err) if err.allows_fallback() => {
            let message = error_chain(&err);
            tracing::error!(source = %feed.describe(), error = %message, "feed unavailable, emitting fallback catalog");
            return Ok(Catalog::fallback(feed.describe(), message, generated_at));
        }
        Err(err) => return Err(err),
    };

    Ok(catalog_from_text(&text, config, &feed.describe(), generated_at))
}

/// Parse and normalise already-acquired feed text.
pub fn catalog_from_text(
    text: &str,
    config: &Config,
    source: &str,
    generated_at: chrono::DateTime<chrono::Utc>,
) -> Catalog {
    // Validated when the config was loaded; fall back to the default grammar
    // for hand-built configs.
    let parse_options = config.parse.options().unwrap_or_default();
    let parsed = parse(text, &parse_options);
    let products = normalize_feed(&parsed, &config.normalize.options());

    if products.is_empty() {
        tracing::warn!(source, "no products found in feed");
    } else {
        tracing::info!(source, count = products.len(), "normalised products");
    }

    let catalog = Catalog::new(products);
    if config.output.include_meta {
        catalog.with_meta(source, generated_at)
    } else {
        catalog
    }
}

/// The sink that renders `target` under the given output settings.
pub fn sink_for(target: ExportTarget, output: &OutputConfig) -> Box<dyn Sink> {
    match target {
        ExportTarget::Json => Box::new(JsonSink),
        ExportTarget::Script => Box::new(ScriptSink::new(output.script_global.clone())),
        ExportTarget::Html => Box::new(HtmlSink::new(output.html_title.clone())),
    }
}

/// Render and write every enabled target, overwriting existing files.
///
/// Every target is attempted; if any fails the error lists all failures.
pub fn write_artifacts(catalog: &Catalog, output: &OutputConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut failures = Vec::new();

    for target in output.enabled_targets() {
        let path = output.path_for(target);
        match write_artifact(catalog, target, output, path) {
            Ok(()) => {
                tracing::info!(%target, path = %path.display(), "wrote artifact");
                written.push(path.to_path_buf());
            }
            Err(err) => {
                tracing::error!(%target, path = %path.display(), error = %format!("{err:#}"), "failed to write artifact");
                failures.push(format!("{target} ({})", path.display()));
            }
        }
    }

    if !failures.is_empty() {
        anyhow::bail!("failed to write {}", failures.join(", "));
    }
    Ok(written)
}

fn write_artifact(
    catalog: &Catalog,
    target: ExportTarget,
    output: &OutputConfig,
    path: &Path,
) -> anyhow::Result<()> {
    let rendered = sink_for(target, output).render(catalog)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(path, rendered).with_context(|| format!("cannot write {}", path.display()))
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
