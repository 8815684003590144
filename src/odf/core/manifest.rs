//! ODF manifest (`META-INF/manifest.xml`) editing.
//!
//! The manifest's root entry (`manifest:full-path="/"`) repeats the package
//! MIME type, so converting a template into a document changes both.

use crate::common::markup::{Document, Node};
use crate::odf::constants::{MANIFEST_FILE_ENTRY, MANIFEST_FULL_PATH, MANIFEST_MEDIA_TYPE};

/// Set the media type of the manifest's root entry, returning whether the
/// manifest has one.
pub fn set_root_media_type(doc: &mut Document, media_type: &str) -> bool {
    let Some(root) = doc.root_mut() else {
        return false;
    };
    let entry = root
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|e| e.is(MANIFEST_FILE_ENTRY) && e.attribute(MANIFEST_FULL_PATH) == Some("/"));
    match entry {
        Some(entry) => {
            entry.set_attribute(MANIFEST_MEDIA_TYPE, media_type);
            true
        },
        None => false,
    }
}
