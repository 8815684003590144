//! sheet-stencil - Template expansion for office spreadsheets
//!
//! This library turns a spreadsheet template into a rendered document. The
//! template is an ordinary `.ods`/`.ots` or `.xlsx`/`.xltx` file: cells carry
//! expressions, cell notes or comments carry control directives (loops,
//! conditions) scoped to the cell, its row, or its sheet. Only the parts
//! holding cells and notes are rewritten; every other entry of the
//! container is copied byte for byte.
//!
//! # Features
//!
//! - **Lossless container handling**: unmodified entries are raw-copied
//! - **Two formats**: OpenDocument and Office Open XML workbooks
//! - **Directive relocation**: note directives wrap cells, rows or sheets
//! - **Typed cells**: `*`, `:` and `@`/`$` prefixes write text, numbers and formulas
//! - **Position tracker**: a row/column cursor templates can move while emitting
//! - **Pluggable evaluator**: bring any template engine; MiniJinja ships by default
//!
//! # Example - Rendering a report
//!
//! ```no_run
//! use sheet_stencil::template::{Context, RenderConfig, TemplateRenderer};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RenderConfig::from_yaml_file("render.yaml")?;
//! let renderer = TemplateRenderer::with_minijinja(config);
//!
//! let mut context = Context::new();
//! context.insert("invoices", json!([
//!     {"number": "F/2024/001", "net": 1200.0},
//!     {"number": "F/2024/002", "net": 310.5},
//! ]));
//!
//! // A row note `!!{% for inv in invoices %}@{% endfor %}` repeats the row,
//! // a cell `:{{ inv.net }}` is written as a number.
//! let rendered = renderer.render(vec!["rep_invoices.ots", "rep_default.ots"], &context)?;
//! println!("{} ({:?})", rendered.download_name(), rendered.media_type());
//! rendered.persist_to("invoices.ods")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a container
//!
//! ```no_run
//! use sheet_stencil::common::markup::Document;
//! use sheet_stencil::odf::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let package = Package::open("template.ods")?;
//! for entry in package.entries() {
//!     println!("Entry: {}", entry);
//! }
//!
//! let content = Document::parse(&package.read_entry("content.xml")?)?;
//! println!("Sheets: {:?}", sheet_stencil::odf::ods::sheet_names(&content));
//! # Ok(())
//! # }
//! ```

/// Errors, the content tree, cell coordinates and XML text helpers
pub mod common;

/// ZIP container handling and OpenDocument spreadsheet structure
pub mod odf;

/// Office Open XML packages and SpreadsheetML parts
pub mod ooxml;

/// Template rendering: directives, typed cells, evaluator, driver
pub mod template;

pub use common::{Error, RenderPhase, Result};
pub use template::{
    Context, Evaluator, PositionTracker, RenderConfig, RenderFailure, RenderedDocument,
    TemplateRenderer, TemplateSource,
};
