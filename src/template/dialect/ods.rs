//! OpenDocument cells: notes are `office:annotation` children, values live
//! in `office:*` attributes next to a displayed paragraph.

use super::{Note, NoteSource, SheetDialect};
use crate::common::CellSite;
use crate::common::markup::{Document, Element};
use crate::odf::constants::{
    ANNOTATION, ATTR_CALCEXT_VALUE_TYPE, ATTR_FORMULA, ATTR_VALUE, ATTR_VALUE_TYPE,
    FORMULA_NAMESPACE, VALUE_ATTRIBUTES,
};
use crate::odf::ods;
use crate::template::cell_type::format_number;

/// Cells of an ODF `content.xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OdsDialect;

impl SheetDialect for OdsDialect {
    fn cell_sites(&self, doc: &Document) -> Vec<CellSite> {
        ods::cell_sites(doc)
    }

    fn notes(&self, doc: &Document, site: &CellSite) -> Vec<Note> {
        let Some(cell) = doc.element_at(&site.path) else {
            return Vec::new();
        };
        cell.children
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let annotation = node.as_element().filter(|e| e.is(ANNOTATION))?;
                let mut path = site.path.clone();
                path.push(index);
                Some(Note {
                    text: ods::paragraphs_text(annotation),
                    source: NoteSource::Inline(path),
                })
            })
            .collect()
    }

    fn is_prefixable(&self, cell: &Element) -> bool {
        ods::is_prefixable(cell)
    }

    fn leading_char(&self, cell: &Element) -> Option<char> {
        ods::leading_char(cell)
    }

    fn strip_leading_char(&self, cell: &mut Element) -> Option<char> {
        ods::strip_leading_char(cell)
    }

    fn cell_text(&self, cell: &Element) -> String {
        ods::paragraphs_text(cell)
    }

    fn write_text(&self, cell: &mut Element) {
        set_value_type(cell, "string");
    }

    fn write_number(&self, cell: &mut Element, value: f64, text: &str) {
        set_value_type(cell, "float");
        cell.set_attribute(ATTR_VALUE, format_number(value));
        ods::set_single_paragraph(cell, text);
    }

    fn write_formula(&self, cell: &mut Element, body: &str) {
        clear_value(cell);
        cell.remove_attribute(ATTR_VALUE_TYPE);
        cell.set_attribute(ATTR_FORMULA, format!("{FORMULA_NAMESPACE}={body}"));
        ods::remove_paragraphs(cell);
    }

    fn write_blank(&self, cell: &mut Element) {
        clear_value(cell);
        cell.remove_attribute(ATTR_VALUE_TYPE);
        ods::remove_paragraphs(cell);
    }
}

/// Drop every value attribute, returning whether the cell carried the
/// `calcext` type mirror.
fn clear_value(cell: &mut Element) -> bool {
    let had_calcext = cell.has_attribute(ATTR_CALCEXT_VALUE_TYPE);
    for name in VALUE_ATTRIBUTES {
        cell.remove_attribute(name);
    }
    had_calcext
}

fn set_value_type(cell: &mut Element, value_type: &str) {
    let had_calcext = clear_value(cell);
    cell.set_attribute(ATTR_VALUE_TYPE, value_type);
    if had_calcext {
        cell.set_attribute(ATTR_CALCEXT_VALUE_TYPE, value_type);
    }
}
