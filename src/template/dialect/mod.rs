//! Format-specific cell access used by directive relocation and typed cell
//! writing.
//!
//! The expansion steps are the same for every spreadsheet format; what
//! differs is where cells and their notes live and how a value is written
//! into a cell. A [`SheetDialect`] answers those questions for one content
//! part.

mod ods;
mod xlsx;

pub use ods::OdsDialect;
pub use xlsx::XlsxDialect;

use crate::common::CellSite;
use crate::common::markup::{Document, Element, NodePath};

/// Where a note is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NoteSource {
    /// An element inside the content part, removed in place
    Inline(NodePath),
    /// A separate part, keyed by cell reference
    Part(String),
}

/// Text of a cell note and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub text: String,
    pub source: NoteSource,
}

/// Cell structure and value encoding of one spreadsheet format.
pub trait SheetDialect {
    /// Every cell of the part in document order.
    fn cell_sites(&self, doc: &Document) -> Vec<CellSite>;

    /// Notes attached to the cell at `site`.
    fn notes(&self, doc: &Document, site: &CellSite) -> Vec<Note>;

    /// Whether sheet-scope fragments go inside the sheet anchor (around its
    /// rows) rather than around it.
    fn sheet_fragments_inside(&self) -> bool {
        false
    }

    /// Whether the cell's text may carry a type prefix.
    fn is_prefixable(&self, cell: &Element) -> bool;

    /// First character of the cell's text.
    fn leading_char(&self, cell: &Element) -> Option<char>;

    /// Remove and return the first character of the cell's text.
    fn strip_leading_char(&self, cell: &mut Element) -> Option<char>;

    /// The cell's displayed text.
    fn cell_text(&self, cell: &Element) -> String;

    /// Write the cell as text.
    fn write_text(&self, cell: &mut Element);

    /// Write `value` as a number; `text` is its rendered spelling.
    fn write_number(&self, cell: &mut Element, value: f64, text: &str);

    /// Write a formula; `body` has no leading `=` or namespace.
    fn write_formula(&self, cell: &mut Element, body: &str);

    /// Leave the cell empty.
    fn write_blank(&self, cell: &mut Element);

    /// Fix-ups on the evaluated part, before typed cells are written.
    fn finish(&self, _doc: &mut Document) {}
}
