//! Container handling: reading entries from a ZIP package and writing a
//! copy of it in which only selected entries change.
//!
//! Nothing here depends on the document format, so Office Open XML
//! packages go through the same [`Package`].

/// ODF manifest editing
pub mod manifest;
/// ODF package handling
mod package;
/// ODF package writing
mod writer;

pub use package::{EntryOverrides, Package};
pub use writer::PackageWriter;
