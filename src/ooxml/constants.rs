//! Constant values of the Open Packaging Conventions and SpreadsheetML.
//!
//! Element names are local names; SpreadsheetML parts may be written with or
//! without a namespace prefix.

/// Content type URIs that specify a part's format
pub mod content_type {
    pub const SML_SHEET_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const SML_TEMPLATE_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml";
    pub const SML_SHEET_MACRO_MAIN: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";
    pub const SML_TEMPLATE_MACRO_MAIN: &str =
        "application/vnd.ms-excel.template.macroEnabled.main+xml";
}

/// Relationship type URIs used in OPC packages
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
    pub const COMMENTS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
}

/// Part holding the content type of every part
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Package-level relationships
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// Workbook part used when the package relationships do not name one
pub const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

// ============================================================================
// SPREADSHEETML ELEMENTS
// ============================================================================

pub const SHEETS: &str = "sheets";
pub const SHEET: &str = "sheet";
pub const CALC_PR: &str = "calcPr";
pub const SHEET_DATA: &str = "sheetData";
pub const ROW: &str = "row";
pub const CELL: &str = "c";
pub const CELL_VALUE: &str = "v";
pub const CELL_FORMULA: &str = "f";
pub const INLINE_STRING: &str = "is";
pub const TEXT: &str = "t";
pub const PHONETIC_RUN: &str = "rPh";
pub const SHARED_STRING_ITEM: &str = "si";
pub const AUTHORS: &str = "authors";
pub const AUTHOR: &str = "author";
pub const COMMENT_LIST: &str = "commentList";
pub const COMMENT: &str = "comment";
pub const COMMENT_TEXT: &str = "text";

/// Workbook children that precede `calcPr`, in schema order
pub const BEFORE_CALC_PR: &[&str] = &[
    "fileVersion",
    "fileSharing",
    "workbookPr",
    "workbookProtection",
    "bookViews",
    "sheets",
    "functionGroups",
    "externalReferences",
    "definedNames",
];

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Cell or row reference (`B3`, `3`)
pub const ATTR_REF: &str = "r";
/// Cell data type
pub const ATTR_CELL_TYPE: &str = "t";
/// Row column span hint
pub const ATTR_SPANS: &str = "spans";
pub const ATTR_FULL_CALC_ON_LOAD: &str = "fullCalcOnLoad";

/// Cell type of a shared string
pub const CELL_TYPE_SHARED: &str = "s";
/// Cell type of an inline rich string
pub const CELL_TYPE_INLINE: &str = "inlineStr";
