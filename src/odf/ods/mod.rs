//! OpenDocument Spreadsheet structure.
//!
//! Locates sheets, rows, cells and cell annotations inside a parsed
//! `content.xml` tree and provides the cell-content edits the render
//! pipeline needs.

mod cell;
mod walker;

pub use cell::{
    is_prefixable, leading_char, paragraphs_text, remove_paragraphs, set_single_paragraph,
    strip_leading_char,
};
pub use walker::{cell_sites, sheet_names};
