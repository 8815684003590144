//! Worksheet structure and cell content.
//!
//! Cells are located the way [`crate::odf::ods`] locates them, by path in
//! the generic tree. Positions come from the `r` references when present
//! and from a running count otherwise. After rendering, loops may have
//! duplicated rows and cells with their original references, so
//! [`renumber`] writes fresh, strictly increasing ones.

use super::workbook::sibling_name;
use crate::common::CellSite;
use crate::common::coordinates::CellCoord;
use crate::common::markup::{Document, Element, Node, NodePath};
use crate::ooxml::constants::{
    ATTR_CELL_TYPE, ATTR_REF, ATTR_SPANS, CELL, CELL_FORMULA, CELL_TYPE_INLINE, CELL_VALUE,
    INLINE_STRING, PHONETIC_RUN, ROW, SHEET_DATA, TEXT,
};

/// Path of the worksheet's `sheetData` element.
pub fn sheet_data_path(doc: &Document) -> Option<NodePath> {
    let root_index = doc.root_index()?;
    let root = doc.root()?;
    let index = root
        .children
        .iter()
        .position(|node| node.as_element().is_some_and(|e| e.local_name() == SHEET_DATA))?;
    Some(vec![root_index, index])
}

/// Collect every cell of the worksheet in document order.
pub fn cell_sites(doc: &Document, sheet: &str) -> Vec<CellSite> {
    let mut sites = Vec::new();
    let Some(data_path) = sheet_data_path(doc) else {
        return sites;
    };
    let Some(data) = doc.element_at(&data_path) else {
        return sites;
    };

    let mut next_row = 0;
    for (row_index, row) in child_elements_indexed(data, ROW) {
        let row_number = row
            .attribute(ATTR_REF)
            .and_then(|r| r.trim().parse::<usize>().ok())
            .filter(|&r| r > 0)
            .map_or(next_row, |r| r - 1);
        let mut row_path = data_path.clone();
        row_path.push(row_index);

        let mut next_col = 0;
        for (cell_index, cell) in child_elements_indexed(row, CELL) {
            let col = cell
                .attribute(ATTR_REF)
                .and_then(|r| r.parse::<CellCoord>().ok())
                .map_or(next_col, |coord| coord.column());
            let mut path = row_path.clone();
            path.push(cell_index);
            sites.push(CellSite {
                path,
                row_path: Some(row_path.clone()),
                sheet_path: Some(data_path.clone()),
                sheet: sheet.to_string(),
                row: row_number,
                col,
            });
            next_col = col + 1;
        }
        next_row = row_number + 1;
    }
    sites
}

fn child_elements_indexed<'a>(
    parent: &'a Element,
    local: &'a str,
) -> impl Iterator<Item = (usize, &'a Element)> + 'a {
    parent
        .children
        .iter()
        .enumerate()
        .filter_map(|(i, node)| node.as_element().map(|e| (i, e)))
        .filter(move |(_, e)| e.local_name() == local)
}

/// Plain text of a rich string (`si`, `is`, or a comment's `text`).
///
/// Phonetic runs are not part of the displayed text and are skipped.
pub fn rich_text(element: &Element) -> String {
    let mut text = String::new();
    collect_rich_text(&element.children, &mut text);
    text
}

fn collect_rich_text(nodes: &[Node], out: &mut String) {
    for element in nodes.iter().filter_map(Node::as_element) {
        match element.local_name() {
            TEXT => out.push_str(&element.text_content()),
            PHONETIC_RUN => {},
            _ => collect_rich_text(&element.children, out),
        }
    }
}

fn inline_string(cell: &Element) -> Option<&Element> {
    cell.child_elements().find(|e| e.local_name() == INLINE_STRING)
}

/// Whether the cell holds a string a type prefix may be read from.
///
/// Only inline strings qualify; numbers, booleans, errors and formula
/// results are never mistaken for a prefix.
pub fn is_prefixable(cell: &Element) -> bool {
    cell.attribute(ATTR_CELL_TYPE) == Some(CELL_TYPE_INLINE)
}

/// Displayed text of the cell: the inline string, or the raw value.
pub fn cell_text(cell: &Element) -> String {
    match inline_string(cell) {
        Some(inline) => rich_text(inline),
        None => cell
            .child_elements()
            .find(|e| e.local_name() == CELL_VALUE)
            .map(Element::text_content)
            .unwrap_or_default(),
    }
}

/// Leading character of the cell's inline string.
pub fn leading_char(cell: &Element) -> Option<char> {
    cell_text(cell).chars().next()
}

/// Remove the leading character of the cell's inline string.
///
/// Returns the removed character; nothing is removed when the first text
/// run is empty.
pub fn strip_leading_char(cell: &mut Element) -> Option<char> {
    let inline = cell
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|e| e.local_name() == INLINE_STRING)?;
    let text = first_text_mut(&mut inline.children)?;
    let c = text.chars().next()?;
    text.replace_range(..c.len_utf8(), "");
    Some(c)
}

fn first_text_mut(nodes: &mut [Node]) -> Option<&mut String> {
    for element in nodes.iter_mut().filter_map(Node::as_element_mut) {
        match element.local_name() {
            TEXT => {
                return element.children.iter_mut().find_map(|node| match node {
                    Node::Text(text) | Node::CData(text) if !text.is_empty() => Some(text),
                    _ => None,
                });
            },
            PHONETIC_RUN => {},
            _ => {
                if let Some(text) = first_text_mut(&mut element.children) {
                    return Some(text);
                }
            },
        }
    }
    None
}

fn remove_children(cell: &mut Element, locals: &[&str]) {
    cell.children
        .retain(|node| !node.as_element().is_some_and(|e| locals.contains(&e.local_name())));
}

/// Keep the inline string, dropping any formula or cached value.
pub fn write_text(cell: &mut Element) {
    remove_children(cell, &[CELL_FORMULA, CELL_VALUE]);
}

/// Write a numeric value.
pub fn write_number(cell: &mut Element, value: &str) {
    cell.remove_attribute(ATTR_CELL_TYPE);
    remove_children(cell, &[CELL_FORMULA, CELL_VALUE, INLINE_STRING]);
    let mut v = Element::new(sibling_name(cell, CELL_VALUE));
    v.children.push(Node::Text(value.to_string()));
    cell.children.insert(0, Node::Element(v));
}

/// Write a formula without a cached value.
pub fn write_formula(cell: &mut Element, body: &str) {
    cell.remove_attribute(ATTR_CELL_TYPE);
    remove_children(cell, &[CELL_FORMULA, CELL_VALUE, INLINE_STRING]);
    let mut f = Element::new(sibling_name(cell, CELL_FORMULA));
    f.children.push(Node::Text(body.to_string()));
    cell.children.insert(0, Node::Element(f));
}

/// Leave the cell empty, keeping its style.
pub fn write_blank(cell: &mut Element) {
    cell.remove_attribute(ATTR_CELL_TYPE);
    remove_children(cell, &[CELL_FORMULA, CELL_VALUE, INLINE_STRING]);
}

/// Give every row and cell a reference past the previous one.
///
/// A row keeps its number unless an earlier row already reached it; cells
/// follow the same rule within their row. Row span hints are dropped since
/// duplicated cells may have widened them.
pub fn renumber(doc: &mut Document) {
    let Some(data_path) = sheet_data_path(doc) else {
        return;
    };
    let Some(data) = doc.element_at_mut(&data_path) else {
        return;
    };

    let mut next_row = 0;
    for row in data
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .filter(|e| e.local_name() == ROW)
    {
        let declared = row
            .attribute(ATTR_REF)
            .and_then(|r| r.trim().parse::<usize>().ok())
            .filter(|&r| r > 0)
            .map(|r| r - 1);
        let row_number = declared.map_or(next_row, |r| r.max(next_row));
        row.set_attribute(ATTR_REF, (row_number + 1).to_string());
        row.remove_attribute(ATTR_SPANS);

        let mut next_col = 0;
        for cell in row
            .children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .filter(|e| e.local_name() == CELL)
        {
            let declared = cell
                .attribute(ATTR_REF)
                .and_then(|r| r.parse::<CellCoord>().ok())
                .map(|coord| coord.column());
            let col = declared.map_or(next_col, |c| c.max(next_col));
            cell.set_attribute(ATTR_REF, CellCoord::new(col, row_number).to_string());
            next_col = col + 1;
        }
        next_row = row_number + 1;
    }
}
