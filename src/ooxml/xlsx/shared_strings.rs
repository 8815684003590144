//! Shared string table.
//!
//! Template expressions must sit inside the worksheet markup the evaluator
//! sees, so every shared-string cell is rewritten as an inline string
//! before rendering. Rich runs are kept.

use super::sheet::{cell_sites, rich_text};
use super::workbook::sibling_name;
use crate::common::markup::{Document, Element, Node};
use crate::common::{Error, Result};
use crate::ooxml::constants::{
    ATTR_CELL_TYPE, CELL_TYPE_INLINE, CELL_TYPE_SHARED, CELL_VALUE, INLINE_STRING,
    SHARED_STRING_ITEM,
};

/// The `si` items of a shared string table, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    items: Vec<Element>,
}

impl SharedStrings {
    /// Parse `sharedStrings.xml`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let doc = Document::parse(bytes)?;
        let items = doc
            .root()
            .map(|root| {
                root.child_elements()
                    .filter(|e| e.local_name() == SHARED_STRING_ITEM)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { items })
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    /// Plain text of the item at `index`.
    pub fn text(&self, index: usize) -> Option<String> {
        self.get(index).map(rich_text)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Rewrite every shared-string cell of a worksheet as an inline string,
/// returning how many cells changed.
///
/// Fails with [`Error::MalformedMarkup`] when a cell refers to an index the
/// table does not have.
pub fn inline_shared_strings(doc: &mut Document, strings: &SharedStrings) -> Result<usize> {
    let mut inlined = 0;
    for site in cell_sites(doc, "") {
        let Some(cell) = doc.element_at_mut(&site.path) else {
            continue;
        };
        if cell.attribute(ATTR_CELL_TYPE) != Some(CELL_TYPE_SHARED) {
            continue;
        }
        let index = cell
            .child_elements()
            .find(|e| e.local_name() == CELL_VALUE)
            .map(Element::text_content)
            .and_then(|v| v.trim().parse::<usize>().ok());
        let item = index.and_then(|i| strings.get(i)).ok_or_else(|| {
            Error::MalformedMarkup(format!(
                "Cell {} refers to a missing shared string",
                cell.attribute("r").unwrap_or("?")
            ))
        })?;

        let mut inline = Element::new(sibling_name(cell, INLINE_STRING));
        inline.children = item.children.clone();
        cell.children
            .retain(|node| !node.as_element().is_some_and(|e| e.local_name() == CELL_VALUE));
        cell.children.push(Node::Element(inline));
        cell.set_attribute(ATTR_CELL_TYPE, CELL_TYPE_INLINE);
        inlined += 1;
    }
    Ok(inlined)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRINGS: &str = concat!(
        "<sst count=\"2\" uniqueCount=\"2\">",
        "<si><t>:{{ qty }}</t></si>",
        "<si><r><rPr><b/></rPr><t>Total</t></r><r><t xml:space=\"preserve\"> due</t></r></si>",
        "</sst>"
    );

    #[test]
    fn test_parse_items() {
        let strings = SharedStrings::parse(STRINGS.as_bytes()).unwrap();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings.text(0).as_deref(), Some(":{{ qty }}"));
        assert_eq!(strings.text(1).as_deref(), Some("Total due"));
        assert!(strings.get(2).is_none());
    }

    #[test]
    fn test_inline_keeps_rich_runs() {
        let strings = SharedStrings::parse(STRINGS.as_bytes()).unwrap();
        let mut doc = Document::parse_str(concat!(
            "<worksheet><sheetData><row r=\"1\">",
            "<c r=\"A1\" t=\"s\" s=\"3\"><v>1</v></c>",
            "<c r=\"B1\"><v>7</v></c>",
            "</row></sheetData></worksheet>"
        ))
        .unwrap();
        assert_eq!(inline_shared_strings(&mut doc, &strings).unwrap(), 1);
        assert_eq!(
            doc.to_xml(),
            concat!(
                "<worksheet><sheetData><row r=\"1\">",
                "<c r=\"A1\" t=\"inlineStr\" s=\"3\"><is><r><rPr><b/></rPr><t>Total</t></r>",
                "<r><t xml:space=\"preserve\"> due</t></r></is></c>",
                "<c r=\"B1\"><v>7</v></c>",
                "</row></sheetData></worksheet>"
            )
        );
    }

    #[test]
    fn test_missing_index_is_malformed() {
        let strings = SharedStrings::parse(STRINGS.as_bytes()).unwrap();
        let mut doc =
            Document::parse_str("<worksheet><sheetData><row><c r=\"A1\" t=\"s\"><v>9</v></c></row></sheetData></worksheet>")
                .unwrap();
        assert!(matches!(inline_shared_strings(&mut doc, &strings), Err(Error::MalformedMarkup(_))));
    }
}
