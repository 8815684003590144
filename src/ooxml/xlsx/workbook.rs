//! Workbook part: sheet list, part locations and calculation settings.

use crate::common::markup::{Document, Element, Node};
use crate::common::{Error, Result};
use crate::ooxml::constants::{
    ATTR_FULL_CALC_ON_LOAD, BEFORE_CALC_PR, CALC_PR, DEFAULT_WORKBOOK_PART, SHEET, SHEETS,
    content_type, relationship_type,
};
use crate::ooxml::opc::{read_relationships, related_parts, resolve_target};
use crate::odf::Package;
use std::io::{Read, Seek};

/// A sheet and the part holding its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub part: String,
}

/// Where the parts of a workbook live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    /// Workbook part name
    pub part: String,
    /// Worksheets in workbook order
    pub sheets: Vec<SheetEntry>,
    /// Shared string table part, when the workbook has one
    pub shared_strings: Option<String>,
    doc: Document,
}

impl Workbook {
    /// Locate the workbook part and its worksheets.
    pub fn locate<R: Read + Seek>(package: &Package<R>) -> Result<Self> {
        let part = workbook_part(package)?;
        let doc = Document::parse(&package.read_entry(&part)?)?;
        let rels = read_relationships(package, &part)?;

        let mut sheets = Vec::new();
        for (name, id) in sheet_ids(&doc) {
            let target = rels
                .iter()
                .find(|rel| rel.id == id && rel.is(relationship_type::WORKSHEET));
            match target {
                Some(rel) => sheets.push(SheetEntry {
                    name,
                    part: resolve_target(&part, &rel.target),
                }),
                // Chart sheets and dialog sheets carry no cells
                None => log::debug!("Skipping sheet {name:?} ({id}): not a worksheet"),
            }
        }

        let shared_strings = rels
            .iter()
            .find(|rel| rel.is(relationship_type::SHARED_STRINGS))
            .map(|rel| resolve_target(&part, &rel.target));

        Ok(Self {
            part,
            sheets,
            shared_strings,
            doc,
        })
    }

    /// Names of the worksheets in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Workbook XML asking the application to recalculate every formula
    /// when the file is opened.
    ///
    /// Rendered formulas carry no cached values, so without this the
    /// application would show them empty until the user recalculates.
    pub fn with_full_calculation(&self) -> Vec<u8> {
        let mut doc = self.doc.clone();
        request_full_calculation(&mut doc);
        doc.to_bytes()
    }
}

/// Workbook part named by the package's office document relationship.
pub fn workbook_part<R: Read + Seek>(package: &Package<R>) -> Result<String> {
    if let Some(part) = related_parts(package, "", relationship_type::OFFICE_DOCUMENT)?
        .into_iter()
        .next()
    {
        return Ok(part);
    }
    if package.has_entry(DEFAULT_WORKBOOK_PART) {
        return Ok(DEFAULT_WORKBOOK_PART.to_string());
    }
    Err(Error::EntryMissing(DEFAULT_WORKBOOK_PART.to_string()))
}

fn sheet_ids(doc: &Document) -> Vec<(String, String)> {
    let Some(sheets) = doc
        .root()
        .and_then(|root| root.child_elements().find(|e| e.local_name() == SHEETS))
    else {
        return Vec::new();
    };
    sheets
        .child_elements()
        .filter(|e| e.local_name() == SHEET)
        .filter_map(|e| {
            let name = e.attribute("name")?;
            let id = e.attribute_local("id")?;
            Some((name.to_string(), id.to_string()))
        })
        .collect()
}

/// Set `fullCalcOnLoad` on the workbook's `calcPr`, creating the element in
/// schema position when absent.
pub fn request_full_calculation(doc: &mut Document) {
    let Some(root) = doc.root_mut() else {
        return;
    };
    if let Some(calc) = root
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|e| e.local_name() == CALC_PR)
    {
        calc.set_attribute(ATTR_FULL_CALC_ON_LOAD, "1");
        return;
    }

    let index = root
        .children
        .iter()
        .rposition(|node| {
            node.as_element()
                .is_some_and(|e| BEFORE_CALC_PR.contains(&e.local_name()))
        })
        .map_or(0, |i| i + 1);
    let mut calc = Element::new(sibling_name(root, CALC_PR));
    calc.set_attribute(ATTR_FULL_CALC_ON_LOAD, "1");
    root.children.insert(index, Node::Element(calc));
}

/// Main part content type of the document a template workbook renders
/// into; `None` when `main` is not a template type.
pub fn document_content_type(main: &str) -> Option<&'static str> {
    match main {
        content_type::SML_TEMPLATE_MAIN => Some(content_type::SML_SHEET_MAIN),
        content_type::SML_TEMPLATE_MACRO_MAIN => Some(content_type::SML_SHEET_MACRO_MAIN),
        _ => None,
    }
}

/// `local` qualified with the namespace prefix `parent` uses.
pub(crate) fn sibling_name(parent: &Element, local: &str) -> String {
    match parent.name.split_once(':') {
        Some((prefix, _)) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}
