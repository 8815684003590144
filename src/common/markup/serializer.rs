//! [`Node`] tree back to XML text.

use super::node::{Element, Node};
use crate::common::xml::{escape_attribute, escape_text};

/// Serialize nodes into `out`.
pub(crate) fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        write_node(node, out);
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(element) => write_element(element, out),
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        },
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        },
        Node::Instruction(text) | Node::Declaration(text) => {
            out.push_str("<?");
            out.push_str(text);
            out.push_str("?>");
        },
        Node::DocType(text) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(text);
            out.push('>');
        },
        Node::Markup(markup) => out.push_str(markup),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&attr.value));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    write_nodes(&element.children, out);
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse_nodes;
    use super::*;

    fn round_trip(xml: &str) -> String {
        let nodes = parse_nodes(xml).unwrap();
        let mut out = String::new();
        write_nodes(&nodes, &mut out);
        out
    }

    #[test]
    fn test_round_trip_is_stable() {
        let xml = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            "<office:document-content xmlns:office=\"urn:office\" office:version=\"1.3\">",
            "<!-- keep --><unknown:thing a=\"x &amp; y\"><![CDATA[a<b]]></unknown:thing>",
            "<text:p>1 &lt; 2 &amp; \"q\"</text:p><empty/>",
            "</office:document-content>"
        );
        let once = round_trip(xml);
        assert_eq!(once, xml);
        assert_eq!(round_trip(&once), once);
    }

    #[test]
    fn test_markup_nodes_are_not_escaped() {
        let mut out = String::new();
        write_nodes(
            &[
                Node::Markup("{% if a < b %}".to_string()),
                Node::Text("a < b".to_string()),
            ],
            &mut out,
        );
        assert_eq!(out, "{% if a < b %}a &lt; b");
    }
}
