//! Spreadsheet structure on top of the generic content tree.
//!
//! Walks `content.xml` the way the ODS reader walks it (sheet → row → cell),
//! but instead of building value objects it records where each cell lives in
//! the tree, so callers can edit cells and their ancestors by path after the
//! walk has finished.

use crate::common::CellSite;
use crate::common::markup::{Document, Element, Node, NodePath};
use crate::odf::constants::{
    ATTR_COLUMNS_REPEATED, ATTR_ROWS_REPEATED, ATTR_TABLE_NAME, COVERED_TABLE_CELL,
    ROW_CONTAINERS, TABLE, TABLE_CELL, TABLE_ROW,
};

#[derive(Default, Clone)]
struct WalkState {
    sheet_path: Option<NodePath>,
    sheet: String,
    row_path: Option<NodePath>,
    row: usize,
    col: usize,
}

/// Collect every cell of the document in document order.
pub fn cell_sites(doc: &Document) -> Vec<CellSite> {
    let mut sites = Vec::new();
    let mut path = Vec::new();
    let mut state = WalkState::default();
    walk(&doc.nodes, &mut path, &mut state, &mut sites);
    sites
}

fn walk(nodes: &[Node], path: &mut NodePath, state: &mut WalkState, sites: &mut Vec<CellSite>) {
    for (index, node) in nodes.iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };
        path.push(index);

        if element.is(TABLE) {
            let outer = std::mem::replace(
                state,
                WalkState {
                    sheet_path: Some(path.clone()),
                    sheet: element.attribute(ATTR_TABLE_NAME).unwrap_or_default().to_string(),
                    ..WalkState::default()
                },
            );
            walk(&element.children, path, state, sites);
            *state = outer;
        } else if element.is(TABLE_ROW) {
            state.row_path = Some(path.clone());
            state.col = 0;
            walk(&element.children, path, state, sites);
            state.row_path = None;
            state.row += repeat_count(element, ATTR_ROWS_REPEATED);
        } else if element.is(TABLE_CELL) || element.is(COVERED_TABLE_CELL) {
            sites.push(CellSite {
                path: path.clone(),
                row_path: state.row_path.clone(),
                sheet_path: state.sheet_path.clone(),
                sheet: state.sheet.clone(),
                row: state.row,
                col: state.col,
            });
            state.col += repeat_count(element, ATTR_COLUMNS_REPEATED);
        } else if ROW_CONTAINERS.contains(&element.name.as_str()) || state.row_path.is_none() {
            // Row groups, headers, and the wrappers above the sheets
            walk(&element.children, path, state, sites);
        }

        path.pop();
    }
}

fn repeat_count(element: &Element, attribute: &str) -> usize {
    match element.attribute(attribute) {
        None => 1,
        Some(value) => match value.trim().parse::<usize>() {
            Ok(count) if count > 0 => count,
            _ => {
                log::warn!("Ignoring invalid {}=\"{}\" on <{}>", attribute, value, element.name);
                1
            },
        },
    }
}

/// Names of all sheets in document order.
pub fn sheet_names(doc: &Document) -> Vec<String> {
    let mut names = Vec::new();
    collect_sheet_names(&doc.nodes, &mut names);
    names
}

fn collect_sheet_names(nodes: &[Node], names: &mut Vec<String>) {
    for element in nodes.iter().filter_map(Node::as_element) {
        if element.is(TABLE) {
            names.push(element.attribute(ATTR_TABLE_NAME).unwrap_or_default().to_string());
        } else if !element.is(TABLE_CELL) {
            collect_sheet_names(&element.children, names);
        }
    }
}
