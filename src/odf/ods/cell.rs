//! Cell content helpers: paragraph text, annotations, value rewriting.

use crate::common::markup::{Element, Node};
use crate::odf::constants::{
    ANNOTATION, ATTR_SPACE_COUNT, ATTR_VALUE_TYPE, PREFIXABLE_VALUE_TYPES, TEXT_LINE_BREAK,
    TEXT_P, TEXT_S, TEXT_TAB,
};

/// Plain text of the paragraphs directly under `element`, joined by `\n`.
///
/// Works for both cells and annotations. Spaces (`text:s`), tabs and line
/// breaks are expanded; spans and links contribute their text.
pub fn paragraphs_text(element: &Element) -> String {
    let mut text = String::new();
    for (i, p) in element.child_elements().filter(|e| e.is(TEXT_P)).enumerate() {
        if i > 0 {
            text.push('\n');
        }
        inline_text(&p.children, &mut text);
    }
    text
}

fn inline_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::CData(text) => out.push_str(text),
            Node::Element(e) if e.is(TEXT_S) => {
                let count = e
                    .attribute(ATTR_SPACE_COUNT)
                    .and_then(|c| c.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                out.extend(std::iter::repeat_n(' ', count));
            },
            Node::Element(e) if e.is(TEXT_TAB) => out.push('\t'),
            Node::Element(e) if e.is(TEXT_LINE_BREAK) => out.push('\n'),
            // Notes nested in paragraphs are not content
            Node::Element(e) if e.is(ANNOTATION) => {},
            Node::Element(e) => inline_text(&e.children, out),
            _ => {},
        }
    }
}

/// Whether the cell's displayed text is eligible for a type prefix.
///
/// Only string cells (or cells with no declared type) qualify, so a currency
/// cell showing `$5` is never mistaken for a formula.
pub fn is_prefixable(cell: &Element) -> bool {
    cell.attribute(ATTR_VALUE_TYPE)
        .is_none_or(|t| PREFIXABLE_VALUE_TYPES.contains(&t))
}

/// Leading character of the cell's first paragraph.
pub fn leading_char(cell: &Element) -> Option<char> {
    let p = cell.child_elements().find(|e| e.is(TEXT_P))?;
    let mut text = String::new();
    inline_text(&p.children, &mut text);
    text.chars().next()
}

/// Remove the leading character of the cell's first paragraph.
///
/// Returns the removed character. Nothing is removed when the paragraph
/// starts with an expanded element (`text:s`, `text:tab`, ...).
pub fn strip_leading_char(cell: &mut Element) -> Option<char> {
    let p = cell
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|e| e.is(TEXT_P))?;
    let text = first_text_mut(&mut p.children)?;
    let c = text.chars().next()?;
    text.replace_range(..c.len_utf8(), "");
    Some(c)
}

fn first_text_mut(nodes: &mut [Node]) -> Option<&mut String> {
    for node in nodes.iter_mut() {
        match node {
            Node::Text(text) | Node::CData(text) if !text.is_empty() => return Some(text),
            Node::Element(e) if e.is(TEXT_S) || e.is(TEXT_TAB) || e.is(TEXT_LINE_BREAK) => {
                return None;
            },
            Node::Element(e) if e.is(ANNOTATION) => {},
            Node::Element(e) => {
                if let Some(text) = first_text_mut(&mut e.children) {
                    return Some(text);
                }
            },
            _ => {},
        }
    }
    None
}

/// Drop every paragraph directly under the cell, returning the index the
/// first one occupied.
pub fn remove_paragraphs(cell: &mut Element) -> Option<usize> {
    let first = cell
        .children
        .iter()
        .position(|node| node.as_element().is_some_and(|e| e.is(TEXT_P)));
    cell.children
        .retain(|node| !node.as_element().is_some_and(|e| e.is(TEXT_P)));
    first
}

/// Replace the cell's paragraphs with a single one holding `text`.
pub fn set_single_paragraph(cell: &mut Element, text: &str) {
    let index = remove_paragraphs(cell).unwrap_or(cell.children.len());
    let mut p = Element::new(TEXT_P);
    if !text.is_empty() {
        p.children.push(Node::Text(text.to_string()));
    }
    cell.children.insert(index, Node::Element(p));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::markup::Document;

    fn cell(xml: &str) -> Element {
        Document::parse_str(xml).unwrap().root().unwrap().clone()
    }

    #[test]
    fn test_paragraphs_text_expands_inline_elements() {
        let c = cell(concat!(
            "<table:table-cell>",
            "<office:annotation><text:p>note</text:p></office:annotation>",
            "<text:p>a<text:s text:c=\"3\"/>b<text:tab/>c</text:p>",
            "<text:p><text:span>second</text:span><text:line-break/>line</text:p>",
            "</table:table-cell>"
        ));
        assert_eq!(paragraphs_text(&c), "a   b\tc\nsecond\nline");
    }

    #[test]
    fn test_strip_leading_char_inside_span() {
        let mut c = cell("<table:table-cell><text:p><text:span>:{{ n }}</text:span></text:p></table:table-cell>");
        assert_eq!(leading_char(&c), Some(':'));
        assert_eq!(strip_leading_char(&mut c), Some(':'));
        assert_eq!(paragraphs_text(&c), "{{ n }}");
    }

    #[test]
    fn test_strip_leading_char_stops_at_space_element() {
        let mut c = cell("<table:table-cell><text:p><text:s/>*x</text:p></table:table-cell>");
        assert_eq!(strip_leading_char(&mut c), None);
        assert_eq!(paragraphs_text(&c), " *x");
    }

    #[test]
    fn test_strip_leading_char_from_cdata() {
        let mut c = cell("<table:table-cell><text:p><![CDATA[:5]]>x</text:p></table:table-cell>");
        assert_eq!(leading_char(&c), Some(':'));
        assert_eq!(strip_leading_char(&mut c), Some(':'));
        assert_eq!(paragraphs_text(&c), "5x");
    }

    #[test]
    fn test_prefixable_value_types() {
        assert!(is_prefixable(&cell("<table:table-cell/>")));
        assert!(is_prefixable(&cell("<table:table-cell office:value-type=\"string\"/>")));
        assert!(!is_prefixable(&cell("<table:table-cell office:value-type=\"currency\"/>")));
    }

    #[test]
    fn test_set_single_paragraph_keeps_annotation() {
        let mut c = cell(concat!(
            "<table:table-cell><office:annotation><text:p>n</text:p></office:annotation>",
            "<text:p>1</text:p><text:p>2</text:p></table:table-cell>"
        ));
        set_single_paragraph(&mut c, "42");
        assert_eq!(c.children.len(), 2);
        assert_eq!(paragraphs_text(&c), "42");
        assert!(c.children[0].as_element().is_some_and(|e| e.is(ANNOTATION)));
    }
}
