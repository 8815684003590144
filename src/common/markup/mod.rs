//! Content-stream tree adapter.
//!
//! XML parts (`content.xml`, worksheets, comments) are parsed into a
//! generic, lossless node tree: elements keep their attributes in source
//! order, and comments, processing instructions, CDATA and doctype
//! declarations survive as passthrough nodes. Spreadsheet structure is
//! interpreted on top of this tree by [`crate::odf::ods`] and
//! [`crate::ooxml::xlsx`]; everything else is re-emitted unchanged.
//!
//! Serialization normalizes only what XML considers insignificant: empty
//! elements are written self-closing, attribute values are always
//! double-quoted, and text escapes `&`, `<` and `>`.
//!
//! # Examples
//!
//! ```
//! use sheet_stencil::common::markup::Document;
//!
//! # fn main() -> sheet_stencil::Result<()> {
//! let doc = Document::parse(b"<root><a x=\"1\">text</a></root>")?;
//! assert_eq!(doc.root().map(|r| r.name.as_str()), Some("root"));
//! assert_eq!(doc.to_xml(), "<root><a x=\"1\">text</a></root>");
//! # Ok(())
//! # }
//! ```

mod node;
mod parser;
mod serializer;

pub use node::{Attribute, Element, Node, local_name};

use crate::common::Result;

/// Path from the document's top-level node list down to a node: each entry
/// indexes into the children of the previous one.
pub type NodePath = Vec<usize>;

/// A parsed content stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Top-level nodes (declaration, comments, the root element, whitespace)
    pub nodes: Vec<Node>,
}

impl Document {
    /// Parse a content stream from bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes)?;
        Self::parse_str(xml)
    }

    /// Parse a content stream from text.
    pub fn parse_str(xml: &str) -> Result<Self> {
        Ok(Self {
            nodes: parser::parse_nodes(xml)?,
        })
    }

    /// Serialize back to XML text.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        serializer::write_nodes(&self.nodes, &mut out);
        out
    }

    /// Serialize back to UTF-8 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml().into_bytes()
    }

    /// The document element.
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// The document element, mutably.
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(Node::as_element_mut)
    }

    /// Index of the document element among the top-level nodes.
    pub fn root_index(&self) -> Option<usize> {
        self.nodes.iter().position(|node| node.as_element().is_some())
    }

    /// Element at `path`.
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        let mut element = self.nodes.get(*first)?.as_element()?;
        for &index in rest {
            element = element.children.get(index)?.as_element()?;
        }
        Some(element)
    }

    /// Element at `path`, mutably.
    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let (first, rest) = path.split_first()?;
        let mut element = self.nodes.get_mut(*first)?.as_element_mut()?;
        for &index in rest {
            element = element.children.get_mut(index)?.as_element_mut()?;
        }
        Some(element)
    }

    /// The sibling list containing the node at `path`, with the node's index
    /// in it.
    pub fn siblings_mut(&mut self, path: &[usize]) -> Option<(&mut Vec<Node>, usize)> {
        let (index, parent) = path.split_last()?;
        let siblings = if parent.is_empty() {
            &mut self.nodes
        } else {
            &mut self.element_at_mut(parent)?.children
        };
        (*index < siblings.len()).then_some((siblings, *index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_navigation() {
        let mut doc = Document::parse(b"<?xml version=\"1.0\"?><r><a/><b><c/></b></r>").unwrap();
        assert_eq!(doc.element_at(&[1, 1, 0]).map(|e| e.name.as_str()), Some("c"));
        assert!(doc.element_at(&[1, 5]).is_none());
        assert!(doc.element_at(&[0]).is_none());

        let (siblings, index) = doc.siblings_mut(&[1, 1]).unwrap();
        assert_eq!(index, 1);
        siblings.insert(index, Node::Markup("<!-- before b -->".to_string()));
        assert_eq!(doc.to_xml(), "<?xml version=\"1.0\"?><r><a/><!-- before b --><b><c/></b></r>");
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        assert!(Document::parse(&[b'<', b'a', b'>', 0xff, b'<', b'/', b'a', b'>']).is_err());
    }
}
