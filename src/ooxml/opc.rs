//! Package relationships and content types.
//!
//! Part names are handled in their ZIP member form (`xl/workbook.xml`, no
//! leading slash). Relationship targets are resolved against the directory
//! of the part that owns the relationship.

use crate::common::Result;
use crate::common::markup::{Document, Element};
use crate::ooxml::constants::{CONTENT_TYPES_PART, PACKAGE_RELS_PART};
use crate::odf::Package;
use std::io::{Read, Seek};

/// A relationship from one part to another (or to an external resource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id, e.g. `rId1`
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target as written, relative to the source part's directory
    pub target: String,
    /// Whether the target lies outside the package
    pub external: bool,
}

impl Relationship {
    /// Whether this relationship has the given type.
    ///
    /// Only the last segment of the type URI is compared, so transitional
    /// and strict schema URIs match alike.
    pub fn is(&self, rel_type: &str) -> bool {
        type_name(&self.rel_type) == type_name(rel_type)
    }
}

fn type_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Relationship part of `part`.
///
/// For example, `xl/worksheets/_rels/sheet1.xml.rels` for
/// `xl/worksheets/sheet1.xml`, and `_rels/.rels` for the package itself
/// (the empty part name).
pub fn rels_part(part: &str) -> String {
    if part.is_empty() {
        return PACKAGE_RELS_PART.to_string();
    }
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against its source part.
///
/// A target starting with `/` is package-absolute; otherwise it is relative
/// to the source part's directory. `.` and `..` segments are folded.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => match source_part.rsplit_once('/') {
            Some((dir, _)) => format!("{}/{}", dir, target),
            None => target.to_string(),
        },
    };
    normalize_path(&joined)
}

fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }
    parts.join("/")
}

/// Read the relationships of `part`; a part without a relationship part has
/// none.
pub fn read_relationships<R: Read + Seek>(package: &Package<R>, part: &str) -> Result<Vec<Relationship>> {
    let rels = rels_part(part);
    if !package.has_entry(&rels) {
        return Ok(Vec::new());
    }
    let doc = Document::parse(&package.read_entry(&rels)?)?;
    let Some(root) = doc.root() else {
        return Ok(Vec::new());
    };
    Ok(root
        .child_elements()
        .filter(|e| e.local_name() == "Relationship")
        .filter_map(|e| {
            Some(Relationship {
                id: e.attribute("Id")?.to_string(),
                rel_type: e.attribute("Type")?.to_string(),
                target: e.attribute("Target")?.to_string(),
                external: e.attribute("TargetMode") == Some("External"),
            })
        })
        .collect())
}

/// Targets of the internal relationships of `part` with the given type,
/// resolved to part names.
pub fn related_parts<R: Read + Seek>(package: &Package<R>, part: &str, rel_type: &str) -> Result<Vec<String>> {
    Ok(read_relationships(package, part)?
        .into_iter()
        .filter(|rel| rel.is(rel_type) && !rel.external)
        .map(|rel| resolve_target(part, &rel.target))
        .collect())
}

/// Content types declared for individual parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypes {
    doc: Document,
}

impl ContentTypes {
    /// Read `[Content_Types].xml`.
    pub fn read<R: Read + Seek>(package: &Package<R>) -> Result<Self> {
        Ok(Self {
            doc: Document::parse(&package.read_entry(CONTENT_TYPES_PART)?)?,
        })
    }

    /// Parse `[Content_Types].xml` text.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            doc: Document::parse(bytes)?,
        })
    }

    fn override_for(&self, part: &str) -> Option<&Element> {
        self.doc
            .root()?
            .child_elements()
            .find(|e| e.local_name() == "Override" && names_part(e, part))
    }

    /// Content type overridden for `part`.
    pub fn get(&self, part: &str) -> Option<&str> {
        self.override_for(part)?.attribute("ContentType")
    }

    /// Change the overridden content type of `part`, returning whether the
    /// part had an override.
    pub fn set(&mut self, part: &str, content_type: &str) -> bool {
        let Some(root) = self.doc.root_mut() else {
            return false;
        };
        let entry = root
            .children
            .iter_mut()
            .filter_map(|node| node.as_element_mut())
            .find(|e| e.local_name() == "Override" && names_part(e, part));
        match entry {
            Some(entry) => {
                entry.set_attribute("ContentType", content_type);
                true
            },
            None => false,
        }
    }

    /// Serialize back to XML bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.doc.to_bytes()
    }
}

fn names_part(entry: &Element, part: &str) -> bool {
    entry
        .attribute("PartName")
        .is_some_and(|name| name.trim_start_matches('/').eq_ignore_ascii_case(part))
}
