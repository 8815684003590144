//! Template container formats and the document types they render into.
//!
//! A template type renders into its document type: `.ots` becomes `.ods`
//! and `.xltx` becomes `.xlsx`. The table below drives both the reported
//! media type and the default output file extension, so the two always
//! agree.

use crate::odf::Package;
use crate::odf::constants::ODF_MIMETYPE;
use crate::ooxml::constants::CONTENT_TYPES_PART;
use phf::{Map, phf_map};
use std::io::{Read, Seek};

/// Container type (ODF `mimetype` or OOXML main part content type) to
/// (rendered media type, file extension).
static OUTPUT_TYPES: Map<&'static str, (&'static str, &'static str)> = phf_map! {
    "application/vnd.oasis.opendocument.spreadsheet" =>
        ("application/vnd.oasis.opendocument.spreadsheet", "ods"),
    "application/vnd.oasis.opendocument.spreadsheet-template" =>
        ("application/vnd.oasis.opendocument.spreadsheet", "ods"),
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml" =>
        ("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", "xlsx"),
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml" =>
        ("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", "xlsx"),
    "application/vnd.ms-excel.sheet.macroEnabled.main+xml" =>
        ("application/vnd.ms-excel.sheet.macroEnabled.12", "xlsm"),
    "application/vnd.ms-excel.template.macroEnabled.main+xml" =>
        ("application/vnd.ms-excel.sheet.macroEnabled.12", "xlsm"),
};

/// Media type and file extension of the document a container type renders
/// into.
///
/// # Examples
///
/// ```
/// use sheet_stencil::template::format::output_type;
///
/// assert_eq!(
///     output_type("application/vnd.oasis.opendocument.spreadsheet-template"),
///     Some(("application/vnd.oasis.opendocument.spreadsheet", "ods"))
/// );
/// assert_eq!(output_type("text/plain"), None);
/// ```
pub fn output_type(container_type: &str) -> Option<(&'static str, &'static str)> {
    OUTPUT_TYPES.get(container_type).copied()
}

/// How a template container is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    /// `mimetype` entry plus a single content stream
    OpenDocument,
    /// OPC package: workbook, worksheets and comments found through
    /// relationships
    OfficeOpenXml,
}

impl TemplateFormat {
    /// Tell the layout of an opened container.
    ///
    /// A container with a `mimetype` entry is OpenDocument; one with
    /// `[Content_Types].xml` and no `mimetype` is Office Open XML. Anything
    /// else is treated as OpenDocument and fails later on its content
    /// entry.
    pub fn detect<R: Read + Seek>(package: &Package<R>) -> Self {
        if !package.has_entry(ODF_MIMETYPE) && package.has_entry(CONTENT_TYPES_PART) {
            TemplateFormat::OfficeOpenXml
        } else {
            TemplateFormat::OpenDocument
        }
    }
}
