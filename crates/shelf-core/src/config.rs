//! Configuration types for shelf.
//!
//! [`Config::load`] layers, in order: the embedded defaults, `shelf.toml` in
//! the working directory (or an explicit path, which must then exist), and
//! `SHELF_*` environment variables using `__` as the section separator
//! (`SHELF_SOURCE__KIND=http`). [`Config::defaults`] returns the embedded
//! defaults without touching the filesystem or environment (useful in tests).

use crate::export::ExportTarget;
use crate::normalizer::NormalizeOptions;
use crate::parser::ParseOptions;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
kind = "file"
path = "products.csv"
url  = ""

[parse]
delimiter = ","

[normalize]
active_only = false

[output]
targets       = ["json", "script"]
include_meta  = true
json_path     = "products.json"
script_path   = "products.js"
script_global = "productsData"
html_path     = "catalog.html"
html_title    = "Product Catalog"
"#;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "shelf.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("config file {0} does not exist")]
    Missing(PathBuf),
    #[error("source.kind = \"http\" requires a non-empty source.url")]
    MissingUrl,
    #[error("parse.delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(String),
    #[error("output.script_global must be a JavaScript identifier, got {0:?}")]
    ScriptGlobal(String),
}

// Spliced verbatim into `window.<name> = …;`.
static SCRIPT_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("script global pattern is valid")
});

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the feed comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Http,
}

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub url: String,
}

fn default_source_kind() -> SourceKind { SourceKind::File }
fn default_source_path() -> PathBuf { PathBuf::from("products.csv") }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            path: default_source_path(),
            url: String::new(),
        }
    }
}

/// `[parse]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String { ",".to_string() }

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl ParseConfig {
    pub fn options(&self) -> Result<ParseOptions, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(ParseOptions { delimiter: *b }),
            _ => Err(ConfigError::Delimiter(self.delimiter.clone())),
        }
    }
}

/// `[normalize]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub active_only: bool,
}

impl NormalizeConfig {
    pub fn options(&self) -> NormalizeOptions {
        NormalizeOptions {
            active_only: self.active_only,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_targets")]
    pub targets: Vec<ExportTarget>,
    #[serde(default = "default_include_meta")]
    pub include_meta: bool,
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,
    #[serde(default = "default_script_global")]
    pub script_global: String,
    #[serde(default = "default_html_path")]
    pub html_path: PathBuf,
    #[serde(default = "default_html_title")]
    pub html_title: String,
}

fn default_targets() -> Vec<ExportTarget> { vec![ExportTarget::Json, ExportTarget::Script] }
fn default_include_meta() -> bool { true }
fn default_json_path() -> PathBuf { PathBuf::from("products.json") }
fn default_script_path() -> PathBuf { PathBuf::from("products.js") }
fn default_script_global() -> String { "productsData".to_string() }
fn default_html_path() -> PathBuf { PathBuf::from("catalog.html") }
fn default_html_title() -> String { "Product Catalog".to_string() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            include_meta: default_include_meta(),
            json_path: default_json_path(),
            script_path: default_script_path(),
            script_global: default_script_global(),
            html_path: default_html_path(),
            html_title: default_html_title(),
        }
    }
}

impl OutputConfig {
    /// Destination file for `target`.
    pub fn path_for(&self, target: ExportTarget) -> &Path {
        match target {
            ExportTarget::Json => &self.json_path,
            ExportTarget::Script => &self.script_path,
            ExportTarget::Html => &self.html_path,
        }
    }

    /// Enabled targets with duplicates removed, in configured order.
    pub fn enabled_targets(&self) -> Vec<ExportTarget> {
        let mut out = Vec::new();
        for target in &self.targets {
            if !out.contains(target) {
                out.push(*target);
            }
        }
        out
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. With `path = None`, `shelf.toml` in
    /// the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.exists() => return Err(ConfigError::Missing(p.to_path_buf())),
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("SHELF")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("output.targets")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a TOML string layered on the defaults. No file or
    /// environment lookup.
    pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Cross-field checks the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.kind == SourceKind::Http && self.source.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        self.parse.options()?;
        if !SCRIPT_GLOBAL.is_match(&self.output.script_global) {
            return Err(ConfigError::ScriptGlobal(self.output.script_global.clone()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
