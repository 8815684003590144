//! Note directives.
//!
//! A cell note (an ODF annotation or an OOXML comment) whose text starts
//! with `!`, `!!` or `!!!` is a directive: the rest of the note is split on
//! the first `@` into a fragment placed before and a fragment placed after
//! the cell, its row, or its sheet. This is how a template wraps a whole row
//! in a loop without putting loop tags into the cells themselves:
//!
//! ```text
//! !!{% for item in items %}@{% endfor %}
//! ```
//!
//! Relocation runs in two phases. Every directive is extracted and its
//! anchor resolved first; only when all anchors are valid is the tree
//! changed, working backwards through the document so that pending anchor
//! paths are never shifted by earlier insertions.

use super::dialect::{NoteSource, SheetDialect};
use crate::common::coordinates::CellCoord;
use crate::common::markup::{Document, Node, NodePath};
use crate::common::xml::escape_text;
use crate::common::{CellSite, Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Marker character introducing a directive.
pub const DIRECTIVE_MARKER: char = '!';

/// Separator between the before and after fragments.
pub const FRAGMENT_SEPARATOR: char = '@';

/// Where a directive's fragments are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Around the annotated cell (`!`)
    Cell,
    /// Around the cell's row (`!!`)
    Row,
    /// Around the cell's sheet (`!!!`)
    Sheet,
}

impl Scope {
    /// Scope for a run of `count` markers.
    pub fn from_marker_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Scope::Cell),
            2 => Some(Scope::Row),
            _ => Some(Scope::Sheet),
        }
    }

    /// Number of markers introducing this scope.
    pub fn marker_count(self) -> usize {
        match self {
            Scope::Cell => 1,
            Scope::Row => 2,
            Scope::Sheet => 3,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Cell => "cell",
            Scope::Row => "row",
            Scope::Sheet => "sheet",
        })
    }
}

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub scope: Scope,
    /// Inserted immediately before the anchor
    pub before: String,
    /// Inserted immediately after the anchor (empty without a separator)
    pub after: String,
}

/// Parse annotation text as a directive.
///
/// Returns `None` when the text does not start with a marker. At most three
/// markers are consumed; a fourth `!` belongs to the before fragment.
///
/// # Examples
///
/// ```
/// use sheet_stencil::template::directive::{Scope, parse_directive};
///
/// let d = parse_directive("!!{% for r in rows %}@{% endfor %}").unwrap();
/// assert_eq!(d.scope, Scope::Row);
/// assert_eq!(d.before, "{% for r in rows %}");
/// assert_eq!(d.after, "{% endfor %}");
///
/// assert!(parse_directive("just a note").is_none());
/// ```
pub fn parse_directive(text: &str) -> Option<Directive> {
    let count = text
        .chars()
        .take(3)
        .take_while(|&c| c == DIRECTIVE_MARKER)
        .count();
    let scope = Scope::from_marker_count(count)?;
    let body = &text[count..];
    let (before, after) = body
        .split_once(FRAGMENT_SEPARATOR)
        .unwrap_or((body, ""));
    Some(Directive {
        scope,
        before: before.to_string(),
        after: after.to_string(),
    })
}

/// The node a directive's fragments surround.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor {
    pub path: NodePath,
    /// Fragments go around the anchor's children instead of the anchor
    pub inside: bool,
}

/// A directive bound to its place in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedDirective {
    pub directive: Directive,
    /// Cell, row or sheet the fragments surround
    pub anchor: Anchor,
    /// Note to remove
    pub source: NoteSource,
}

/// Find every directive note and resolve its anchor.
///
/// Fails with [`Error::InvalidDirectiveScope`] when a row or sheet directive
/// sits in a cell that has no enclosing row or sheet. The tree is not
/// modified.
pub fn extract<D: SheetDialect + ?Sized>(doc: &Document, dialect: &D) -> Result<Vec<PlacedDirective>> {
    let mut placed = Vec::new();
    for site in dialect.cell_sites(doc) {
        for note in dialect.notes(doc, &site) {
            let Some(directive) = parse_directive(&note.text) else {
                log::debug!(
                    "Keeping non-directive note in {}.{}",
                    site.sheet,
                    CellCoord::new(site.col, site.row)
                );
                continue;
            };
            let anchor = resolve_anchor(&site, directive.scope, dialect)?;
            placed.push(PlacedDirective {
                directive,
                anchor,
                source: note.source,
            });
        }
    }
    Ok(placed)
}

fn resolve_anchor<D: SheetDialect + ?Sized>(site: &CellSite, scope: Scope, dialect: &D) -> Result<Anchor> {
    let path = match scope {
        Scope::Cell => Some(site.path.clone()),
        Scope::Row => site.row_path.clone(),
        Scope::Sheet => site.sheet_path.clone(),
    };
    let inside = scope == Scope::Sheet && dialect.sheet_fragments_inside();
    path.map(|path| Anchor { path, inside }).ok_or_else(|| {
        Error::InvalidDirectiveScope(format!(
            "{} directive in {}.{} has no enclosing {}",
            scope,
            site.sheet,
            CellCoord::new(site.col, site.row),
            scope
        ))
    })
}

/// Remove the inline directive notes and insert their fragments around the
/// anchors.
///
/// Fragments sharing an anchor are concatenated in the order the
/// directives were found. Fragment text is escaped, so an expression such as
/// `{% if a < b %}` reaches the evaluator intact once expression spans are
/// unescaped. Notes kept in other parts are left to the caller.
pub fn apply(doc: &mut Document, placed: &[PlacedDirective]) -> Result<()> {
    let mut notes: Vec<&NodePath> = placed
        .iter()
        .filter_map(|p| match &p.source {
            NoteSource::Inline(path) => Some(path),
            NoteSource::Part(_) => None,
        })
        .collect();
    notes.sort_unstable();

    let mut groups: BTreeMap<&Anchor, (String, String)> = BTreeMap::new();
    for PlacedDirective {
        directive, anchor, ..
    } in placed
    {
        let (before, after) = groups.entry(anchor).or_default();
        before.push_str(&directive.before);
        after.push_str(&directive.after);
    }

    // Notes live inside cells, below every anchor, so removing them leaves
    // anchor paths untouched.
    for path in notes.iter().rev() {
        let (siblings, index) = doc
            .siblings_mut(path)
            .ok_or_else(|| Error::InvalidDirectiveScope(format!("note vanished at {path:?}")))?;
        siblings.remove(index);
    }

    for (anchor, (before, after)) in groups.into_iter().rev() {
        let vanished = || Error::InvalidDirectiveScope(format!("anchor vanished at {:?}", anchor.path));
        let (siblings, index, end) = if anchor.inside {
            let children = &mut doc.element_at_mut(&anchor.path).ok_or_else(vanished)?.children;
            let end = children.len();
            (children, 0, end)
        } else {
            let (siblings, index) = doc.siblings_mut(&anchor.path).ok_or_else(vanished)?;
            (siblings, index, index + 1)
        };
        if !after.is_empty() {
            siblings.insert(end, Node::Markup(escape_text(&after)));
        }
        if !before.is_empty() {
            siblings.insert(index, Node::Markup(escape_text(&before)));
        }
    }
    Ok(())
}

/// Extract and apply all directives, returning the ones relocated.
pub fn relocate<D: SheetDialect + ?Sized>(doc: &mut Document, dialect: &D) -> Result<Vec<PlacedDirective>> {
    let placed = extract(doc, dialect)?;
    apply(doc, &placed)?;
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::CellNote;
    use crate::template::dialect::{OdsDialect, XlsxDialect};
    use proptest::prelude::*;

    fn note(text: &str) -> String {
        format!("<office:annotation><dc:creator>me</dc:creator><text:p>{text}</text:p></office:annotation>")
    }

    fn relocated(xml: &str) -> String {
        let mut doc = Document::parse_str(xml).unwrap();
        relocate(&mut doc, &OdsDialect).unwrap();
        doc.to_xml()
    }

    #[test]
    fn test_scope_from_marker_count() {
        assert_eq!(parse_directive("!a").unwrap().scope, Scope::Cell);
        assert_eq!(parse_directive("!!a").unwrap().scope, Scope::Row);
        assert_eq!(parse_directive("!!!a").unwrap().scope, Scope::Sheet);

        let capped = parse_directive("!!!!a@b@c").unwrap();
        assert_eq!(capped.scope, Scope::Sheet);
        assert_eq!(capped.before, "!a");
        assert_eq!(capped.after, "b@c");
        assert!(parse_directive("").is_none());
        assert!(parse_directive(" !a").is_none());
    }

    #[test]
    fn test_cell_scope_wraps_cell() {
        let xml = format!(
            "<table:table><table:table-row><table:table-cell>{}<text:p>x</text:p></table:table-cell></table:table-row></table:table>",
            note("!{% if a &lt; b %}@{% endif %}")
        );
        assert_eq!(
            relocated(&xml),
            concat!(
                "<table:table><table:table-row>",
                "{% if a &lt; b %}<table:table-cell><text:p>x</text:p></table:table-cell>{% endif %}",
                "</table:table-row></table:table>"
            )
        );
    }

    #[test]
    fn test_row_and_sheet_scopes_nest() {
        let xml = format!(
            concat!(
                "<table:table><table:table-row>",
                "<table:table-cell>{}</table:table-cell>",
                "<table:table-cell>{}</table:table-cell>",
                "</table:table-row></table:table>"
            ),
            note("!!R1@R2"),
            note("!!!S1@S2")
        );
        assert_eq!(
            relocated(&xml),
            concat!(
                "S1<table:table>R1<table:table-row>",
                "<table:table-cell/><table:table-cell/>",
                "</table:table-row>R2</table:table>S2"
            )
        );
    }

    #[test]
    fn test_same_anchor_concatenates_in_document_order() {
        let xml = format!(
            concat!(
                "<table:table><table:table-row>",
                "<table:table-cell>{}</table:table-cell>",
                "<table:table-cell>{}</table:table-cell>",
                "</table:table-row></table:table>"
            ),
            note("!!A@a"),
            note("!!B@b")
        );
        assert_eq!(
            relocated(&xml),
            concat!(
                "<table:table>AB<table:table-row>",
                "<table:table-cell/><table:table-cell/>",
                "</table:table-row>ab</table:table>"
            )
        );
    }

    #[test]
    fn test_sibling_rows_keep_their_fragments() {
        let xml = format!(
            concat!(
                "<table:table>",
                "<table:table-row><table:table-cell>{}</table:table-cell></table:table-row>",
                "<table:table-row><table:table-cell>{}</table:table-cell></table:table-row>",
                "</table:table>"
            ),
            note("!!first@/first"),
            note("!!second@/second")
        );
        assert_eq!(
            relocated(&xml),
            concat!(
                "<table:table>",
                "first<table:table-row><table:table-cell/></table:table-row>/first",
                "second<table:table-row><table:table-cell/></table:table-row>/second",
                "</table:table>"
            )
        );
    }

    #[test]
    fn test_plain_annotation_is_kept() {
        let xml = format!(
            "<table:table><table:table-row><table:table-cell>{}</table:table-cell></table:table-row></table:table>",
            note("remember to update")
        );
        let mut doc = Document::parse_str(&xml).unwrap();
        assert!(relocate(&mut doc, &OdsDialect).unwrap().is_empty());
        assert_eq!(doc.to_xml(), xml);
    }

    #[test]
    fn test_unresolvable_scope_changes_nothing() {
        let xml = format!(
            concat!(
                "<table:table><table:table-row><table:table-cell>{}</table:table-cell></table:table-row>",
                "<table:table-cell>{}</table:table-cell></table:table>"
            ),
            note("!ok@ok"),
            note("!!row@row")
        );
        let mut doc = Document::parse_str(&xml).unwrap();
        let err = relocate(&mut doc, &OdsDialect).unwrap_err();
        assert!(matches!(err, Error::InvalidDirectiveScope(_)));
        assert_eq!(doc.to_xml(), xml);
    }

    fn comment(cell_ref: &str, text: &str) -> CellNote {
        CellNote {
            cell_ref: cell_ref.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_comment_directives_wrap_rows_and_sheet_data() {
        let xml = concat!(
            "<worksheet><sheetData>",
            "<row r=\"1\"><c r=\"A1\"/></row>",
            "<row r=\"2\"><c r=\"A2\"/><c r=\"B2\"/></row>",
            "</sheetData></worksheet>"
        );
        let dialect = XlsxDialect::new(
            "S",
            vec![comment("B2", "!!R1@R2"), comment("A1", "!!!S1@S2"), comment("A2", "plain")],
        );
        let mut doc = Document::parse_str(xml).unwrap();
        let placed = relocate(&mut doc, &dialect).unwrap();

        let sources: Vec<_> = placed.iter().map(|p| p.source.clone()).collect();
        assert_eq!(
            sources,
            [NoteSource::Part("A1".to_string()), NoteSource::Part("B2".to_string())]
        );
        assert_eq!(
            doc.to_xml(),
            concat!(
                "<worksheet><sheetData>S1",
                "<row r=\"1\"><c r=\"A1\"/></row>",
                "R1<row r=\"2\"><c r=\"A2\"/><c r=\"B2\"/></row>R2",
                "S2</sheetData></worksheet>"
            )
        );
    }

    proptest! {
        #[test]
        fn prop_fragments_reassemble(markers in 1usize..=3, body in "[^!][^\n]{0,40}") {
            let text = format!("{}{}", "!".repeat(markers), body);
            let d = parse_directive(&text).unwrap();
            prop_assert_eq!(d.scope.marker_count(), markers);
            prop_assert!(!d.before.contains(FRAGMENT_SEPARATOR));
            if body.contains(FRAGMENT_SEPARATOR) {
                prop_assert_eq!(format!("{}@{}", d.before, d.after), body);
            } else {
                prop_assert_eq!(d.before, body);
                prop_assert!(d.after.is_empty());
            }
        }

        #[test]
        fn prop_unmarked_text_is_not_a_directive(text in "[^!].{0,40}") {
            prop_assert!(parse_directive(&text).is_none());
        }
    }
}
