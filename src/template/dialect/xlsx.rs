//! SpreadsheetML cells: notes come from the worksheet's comments part,
//! values are `v`, `f` and `is` children of `c`.

use super::{Note, NoteSource, SheetDialect};
use crate::common::CellSite;
use crate::common::coordinates::CellCoord;
use crate::common::markup::{Document, Element};
use crate::ooxml::xlsx::{CellNote, sheet};
use crate::template::cell_type::format_number;
use std::collections::HashMap;

/// Cells of one worksheet part.
#[derive(Debug, Clone, Default)]
pub struct XlsxDialect {
    sheet: String,
    notes: HashMap<String, String>,
}

impl XlsxDialect {
    /// Dialect for the worksheet named `sheet` with the notes of its
    /// comments part.
    pub fn new(sheet: impl Into<String>, notes: Vec<CellNote>) -> Self {
        Self {
            sheet: sheet.into(),
            notes: notes.into_iter().map(|n| (n.cell_ref, n.text)).collect(),
        }
    }
}

impl SheetDialect for XlsxDialect {
    fn cell_sites(&self, doc: &Document) -> Vec<CellSite> {
        sheet::cell_sites(doc, &self.sheet)
    }

    fn notes(&self, _doc: &Document, site: &CellSite) -> Vec<Note> {
        let cell_ref = CellCoord::new(site.col, site.row).to_string();
        match self.notes.get(&cell_ref) {
            Some(text) => vec![Note {
                text: text.clone(),
                source: NoteSource::Part(cell_ref),
            }],
            None => Vec::new(),
        }
    }

    // A worksheet part holds exactly one sheet
    fn sheet_fragments_inside(&self) -> bool {
        true
    }

    fn is_prefixable(&self, cell: &Element) -> bool {
        sheet::is_prefixable(cell)
    }

    fn leading_char(&self, cell: &Element) -> Option<char> {
        sheet::leading_char(cell)
    }

    fn strip_leading_char(&self, cell: &mut Element) -> Option<char> {
        sheet::strip_leading_char(cell)
    }

    fn cell_text(&self, cell: &Element) -> String {
        sheet::cell_text(cell)
    }

    fn write_text(&self, cell: &mut Element) {
        sheet::write_text(cell);
    }

    fn write_number(&self, cell: &mut Element, value: f64, _text: &str) {
        sheet::write_number(cell, &format_number(value));
    }

    fn write_formula(&self, cell: &mut Element, body: &str) {
        sheet::write_formula(cell, body);
    }

    fn write_blank(&self, cell: &mut Element) {
        sheet::write_blank(cell);
    }

    fn finish(&self, doc: &mut Document) {
        sheet::renumber(doc);
    }
}
