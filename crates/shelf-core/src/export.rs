//! Export — renders a [`Catalog`] into output artifacts.
//!
//! Every sink is a pure `&Catalog → String` transform. Writing the rendered
//! text to disk is the binary's job; nothing here touches the filesystem.
//!
//! | Target   | Artifact                                              |
//! |----------|-------------------------------------------------------|
//! | `json`   | `{ "products": [...], "meta": {...} }`                |
//! | `script` | `window.<global> = { ... };` for direct page include  |
//! | `html`   | static catalog page, one card per product             |

use crate::types::{Catalog, ProductRecord};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialise catalog: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to format {target} output")]
    Format {
        target: ExportTarget,
        #[source]
        source: std::fmt::Error,
    },
}

/// Which artifact a sink produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    Json,
    Script,
    Html,
}

impl std::fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportTarget::Json => write!(f, "json"),
            ExportTarget::Script => write!(f, "script"),
            ExportTarget::Html => write!(f, "html"),
        }
    }
}

/// A renderer for one output representation.
pub trait Sink {
    fn target(&self) -> ExportTarget;
    fn render(&self, catalog: &Catalog) -> Result<String, ExportError>;
}

// ---------------------------------------------------------------------------
// JSON document
// ---------------------------------------------------------------------------

/// Pretty-printed JSON document with two-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink;

impl Sink for JsonSink {
    fn target(&self) -> ExportTarget {
        ExportTarget::Json
    }

    fn render(&self, catalog: &Catalog) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(catalog)?)
    }
}

// ---------------------------------------------------------------------------
// Script snippet
// ---------------------------------------------------------------------------

/// Assigns the JSON document to `window.<global>`.
#[derive(Debug, Clone)]
pub struct ScriptSink {
    pub global: String,
}

impl ScriptSink {
    pub fn new(global: impl Into<String>) -> Self {
        Self {
            global: global.into(),
        }
    }
}

impl Default for ScriptSink {
    fn default() -> Self {
        Self::new("productsData")
    }
}

impl Sink for ScriptSink {
    fn target(&self) -> ExportTarget {
        ExportTarget::Script
    }

    fn render(&self, catalog: &Catalog) -> Result<String, ExportError> {
        let body = JsonSink.render(catalog)?;
        Ok(format!("window.{} = {};", self.global, body))
    }
}

// ---------------------------------------------------------------------------
// HTML page
// ---------------------------------------------------------------------------

const PAGE_STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f6f4; color: #222; }
header { padding: 1.5rem 2rem; background: #fff; border-bottom: 1px solid #ddd; }
.filters { display: flex; flex-wrap: wrap; gap: .5rem; padding: 1rem 2rem; }
.filters button { border: 1px solid #bbb; background: #fff; border-radius: 999px; padding: .35rem .9rem; cursor: pointer; }
.filters button.active { background: #222; color: #fff; border-color: #222; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; padding: 0 2rem 2rem; }
.card { background: #fff; border: 1px solid #e2e2e2; border-radius: 8px; overflow: hidden; display: flex; flex-direction: column; }
.card img { width: 100%; aspect-ratio: 4 / 3; object-fit: cover; background: #eee; }
.card .body { padding: 1rem; display: flex; flex-direction: column; gap: .5rem; flex: 1; }
.card .price { font-weight: 600; }
.badge { font-size: .8rem; padding: .1rem .5rem; border-radius: 4px; align-self: flex-start; }
.badge.in-stock { background: #e3f4e6; color: #17642b; }
.badge.out-of-stock { background: #f8e3e3; color: #8a1c1c; }
.card button { margin-top: auto; padding: .5rem; border: 0; border-radius: 4px; background: #222; color: #fff; cursor: pointer; }
.empty { padding: 2rem; color: #666; }
"#;

const PAGE_SCRIPT: &str = r#"
(function () {
  var quote = [];
  var buttons = document.querySelectorAll('.filters button');
  var cards = document.querySelectorAll('.card');
  buttons.forEach(function (button) {
    button.addEventListener('click', function () {
      var category = button.getAttribute('data-filter');
      buttons.forEach(function (b) { b.classList.toggle('active', b === button); });
      cards.forEach(function (card) {
        var match = category === 'all' || card.getAttribute('data-category') === category;
        card.style.display = match ? '' : 'none';
      });
    });
  });
  document.querySelectorAll('.add-to-quote').forEach(function (button) {
    button.addEventListener('click', function () {
      quote.push(button.getAttribute('data-product-id'));
      button.textContent = 'Added (' + quote.length + ' in quote)';
    });
  });
})();
"#;

/// Static catalog page with category filters and an "add to quote" stub.
#[derive(Debug, Clone)]
pub struct HtmlSink {
    pub title: String,
}

impl HtmlSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for HtmlSink {
    fn default() -> Self {
        Self::new("Product Catalog")
    }
}

impl Sink for HtmlSink {
    fn target(&self) -> ExportTarget {
        ExportTarget::Html
    }

    fn render(&self, catalog: &Catalog) -> Result<String, ExportError> {
        self.write_page(catalog).map_err(|source| ExportError::Format {
            target: ExportTarget::Html,
            source,
        })
    }
}

impl HtmlSink {
    fn write_page(&self, catalog: &Catalog) -> Result<String, std::fmt::Error> {
        let title = encode_text(&self.title);
        let mut out = String::new();

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(
            out,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(out, "<title>{title}</title>")?;
        writeln!(out, "<style>{PAGE_STYLE}</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<header><h1>{title}</h1></header>")?;

        writeln!(out, "<nav class=\"filters\">")?;
        writeln!(
            out,
            "<button class=\"active\" data-filter=\"all\">All</button>"
        )?;
        for category in catalog.categories() {
            writeln!(
                out,
                "<button data-filter=\"{}\">{}</button>",
                encode_double_quoted_attribute(category),
                encode_text(category)
            )?;
        }
        writeln!(out, "</nav>")?;

        writeln!(out, "<main class=\"grid\">")?;
        if catalog.is_empty() {
            writeln!(out, "<p class=\"empty\">No products available.</p>")?;
        }
        for product in &catalog.products {
            write_card(&mut out, product)?;
        }
        writeln!(out, "</main>")?;

        writeln!(out, "<script>{PAGE_SCRIPT}</script>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(out)
    }
}

fn write_card(out: &mut String, product: &ProductRecord) -> std::fmt::Result {
    let (badge_class, badge_text) = if product.in_stock() {
        ("in-stock", "In stock")
    } else {
        ("out-of-stock", "Out of stock")
    };

    writeln!(
        out,
        "<article class=\"card\" data-category=\"{}\" data-stock=\"{}\">",
        encode_double_quoted_attribute(&product.category),
        badge_class
    )?;
    if !product.image.is_empty() {
        writeln!(
            out,
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            encode_double_quoted_attribute(&product.image),
            encode_double_quoted_attribute(&product.name)
        )?;
    }
    writeln!(out, "<div class=\"body\">")?;
    writeln!(out, "<h2>{}</h2>", encode_text(&product.name))?;
    writeln!(
        out,
        "<span class=\"badge {badge_class}\">{badge_text}</span>"
    )?;
    writeln!(out, "<p class=\"price\">${}</p>", product.price)?;
    if !product.description.is_empty() {
        writeln!(out, "<p>{}</p>", encode_text(&product.description))?;
    }
    writeln!(
        out,
        "<button class=\"add-to-quote\" data-product-id=\"{}\">Add to quote</button>",
        product.id
    )?;
    writeln!(out, "</div>")?;
    writeln!(out, "</article>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
