//! Legacy cell comments (`xl/comments*.xml`).
//!
//! Comments live in their own part, linked from the worksheet by a
//! relationship and keyed by cell reference. Spreadsheet applications
//! usually open a new comment with a bold `Author:` line; that line is not
//! part of what the user typed and is dropped from the note text.

use super::sheet::rich_text;
use crate::common::Result;
use crate::common::markup::{Document, Node};
use crate::ooxml::constants::{AUTHOR, AUTHORS, COMMENT, COMMENT_LIST, COMMENT_TEXT, relationship_type};
use crate::ooxml::opc::related_parts;
use crate::odf::Package;
use std::collections::HashSet;
use std::io::{Read, Seek};

/// The text of one cell's comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellNote {
    /// Cell reference, e.g. `B3`
    pub cell_ref: String,
    pub text: String,
}

/// Comments part of a worksheet, when it has one.
pub fn comments_part<R: Read + Seek>(package: &Package<R>, sheet_part: &str) -> Result<Option<String>> {
    Ok(related_parts(package, sheet_part, relationship_type::COMMENTS)?
        .into_iter()
        .find(|part| package.has_entry(part)))
}

/// Notes of a comments part, in document order.
pub fn comment_notes(doc: &Document) -> Vec<CellNote> {
    let Some(root) = doc.root() else {
        return Vec::new();
    };
    let authors: Vec<String> = root
        .child_elements()
        .filter(|e| e.local_name() == AUTHORS)
        .flat_map(|e| e.child_elements())
        .filter(|e| e.local_name() == AUTHOR)
        .map(|e| e.text_content())
        .collect();

    root.child_elements()
        .filter(|e| e.local_name() == COMMENT_LIST)
        .flat_map(|e| e.child_elements())
        .filter(|e| e.local_name() == COMMENT)
        .filter_map(|comment| {
            let cell_ref = comment.attribute("ref")?.to_string();
            let text = comment
                .child_elements()
                .find(|e| e.local_name() == COMMENT_TEXT)
                .map(rich_text)
                .unwrap_or_default();
            let author = comment
                .attribute("authorId")
                .and_then(|id| id.trim().parse::<usize>().ok())
                .and_then(|id| authors.get(id));
            let text = match author {
                Some(author) => strip_author_line(&text, author).to_string(),
                None => text,
            };
            Some(CellNote { cell_ref, text })
        })
        .collect()
}

fn strip_author_line<'a>(text: &'a str, author: &str) -> &'a str {
    if author.is_empty() {
        return text;
    }
    text.strip_prefix(author)
        .and_then(|rest| rest.strip_prefix(':'))
        .map_or(text, str::trim_start)
}

/// Remove the comments on the cells in `refs`, returning how many were
/// removed.
pub fn remove_comments(doc: &mut Document, refs: &HashSet<String>) -> usize {
    let Some(root) = doc.root_mut() else {
        return 0;
    };
    let mut removed = 0;
    for list in root
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .filter(|e| e.local_name() == COMMENT_LIST)
    {
        let before = list.children.len();
        list.children.retain(|node| {
            !node.as_element().is_some_and(|e| {
                e.local_name() == COMMENT && e.attribute("ref").is_some_and(|r| refs.contains(r))
            })
        });
        removed += before - list.children.len();
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMENTS: &str = concat!(
        "<comments><authors><author>Ann</author><author>Bo</author></authors><commentList>",
        "<comment ref=\"A2\" authorId=\"0\"><text><r><rPr><b/></rPr><t>Ann:</t></r>",
        "<r><t xml:space=\"preserve\">\n!!{% for r in rows %}@{% endfor %}</t></r></text></comment>",
        "<comment ref=\"B5\" authorId=\"1\"><text><t>check totals</t></text></comment>",
        "<comment ref=\"C1\" authorId=\"1\"><text><t>Ann: keep</t></text></comment>",
        "</commentList></comments>"
    );

    #[test]
    fn test_notes_drop_author_line() {
        let doc = Document::parse_str(COMMENTS).unwrap();
        let notes = comment_notes(&doc);
        let pairs: Vec<_> = notes.iter().map(|n| (n.cell_ref.as_str(), n.text.as_str())).collect();
        assert_eq!(
            pairs,
            [
                ("A2", "!!{% for r in rows %}@{% endfor %}"),
                ("B5", "check totals"),
                ("C1", "Ann: keep"),
            ]
        );
    }

    #[test]
    fn test_remove_selected_comments() {
        let mut doc = Document::parse_str(COMMENTS).unwrap();
        let refs: HashSet<String> = ["A2".to_string()].into_iter().collect();
        assert_eq!(remove_comments(&mut doc, &refs), 1);
        let notes = comment_notes(&doc);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].cell_ref, "B5");
    }
}
