//! quick-xml event stream to [`Node`] tree.

use super::node::{Attribute, Element, Node};
use crate::common::xml::{decode_reference, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a complete document into its top-level nodes.
pub(crate) fn parse_nodes(xml: &str) -> Result<Vec<Node>> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    // Root-level nodes, then one open element per nesting level
    let mut top: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::MalformedMarkup(format!(
                "XML parsing error at position {}: {}",
                reader.error_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                stack.push(start_element(e)?);
            },
            Event::Empty(ref e) => {
                let element = start_element(e)?;
                push_node(&mut stack, &mut top, Node::Element(element));
            },
            Event::End(ref e) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::MalformedMarkup(format!(
                        "Unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                push_node(&mut stack, &mut top, Node::Element(element));
            },
            Event::Text(ref t) => {
                let raw = std::str::from_utf8(t)?;
                push_text(&mut stack, &mut top, &unescape_xml(raw));
            },
            Event::GeneralRef(ref r) => {
                let name = std::str::from_utf8(r)?;
                match decode_reference(name) {
                    Some(c) => push_text(&mut stack, &mut top, c.encode_utf8(&mut [0; 4])),
                    // Entities declared in a DTD are carried through untouched
                    None => push_node(&mut stack, &mut top, Node::Markup(format!("&{};", name))),
                }
            },
            Event::CData(ref c) => {
                let text = std::str::from_utf8(c)?;
                push_node(&mut stack, &mut top, Node::CData(text.to_string()));
            },
            Event::Comment(ref c) => {
                let text = std::str::from_utf8(c)?;
                push_node(&mut stack, &mut top, Node::Comment(text.to_string()));
            },
            Event::Decl(ref d) => {
                let text = std::str::from_utf8(d)?;
                push_node(&mut stack, &mut top, Node::Declaration(text.to_string()));
            },
            Event::PI(ref p) => {
                let text = std::str::from_utf8(p)?;
                push_node(&mut stack, &mut top, Node::Instruction(text.to_string()));
            },
            Event::DocType(ref d) => {
                let text = std::str::from_utf8(d)?;
                push_node(&mut stack, &mut top, Node::DocType(text.to_string()));
            },
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::MalformedMarkup(format!(
            "Unclosed element <{}> at end of input",
            open.name
        )));
    }

    Ok(top)
}

fn start_element(e: &BytesStart) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();

    for attr_result in e.attributes() {
        let attr = attr_result?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        attributes.push(Attribute {
            name: key.to_string(),
            value: unescape_xml(value),
        });
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

#[inline]
fn push_node(stack: &mut [Element], top: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

/// Append text, merging with a preceding text node so references split by
/// the reader come back as one run.
fn push_text(stack: &mut [Element], top: &mut Vec<Node>, text: &str) {
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => top,
    };
    match siblings.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => siblings.push(Node::Text(text.to_string())),
    }
}
