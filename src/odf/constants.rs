//! ODF constants: MIME types, part paths, and the spreadsheet element and
//! attribute names the engine understands.
//!
//! Everything else in `content.xml` is carried through opaquely.
//!
//! # References
//!
//! - OpenDocument v1.3, part 3: §9.1 (tables), §14.1 (annotations), §19.385 (value types)

// ============================================================================
// MIME TYPES
// ============================================================================

/// MIME type for OpenDocument Spreadsheet (.ods)
pub const ODF_SPREADSHEET: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// MIME type for OpenDocument Spreadsheet Template (.ots)
pub const ODF_SPREADSHEET_TEMPLATE: &str =
    "application/vnd.oasis.opendocument.spreadsheet-template";

// ============================================================================
// PACKAGE PARTS
// ============================================================================

/// Path to content.xml (main document content)
pub const ODF_CONTENT: &str = "content.xml";

/// Path to the uncompressed MIME type entry
pub const ODF_MIMETYPE: &str = "mimetype";

/// Path to the package manifest
pub const ODF_MANIFEST: &str = "META-INF/manifest.xml";

/// Manifest entry element
pub const MANIFEST_FILE_ENTRY: &str = "manifest:file-entry";
/// Manifest entry path attribute
pub const MANIFEST_FULL_PATH: &str = "manifest:full-path";
/// Manifest entry media type attribute
pub const MANIFEST_MEDIA_TYPE: &str = "manifest:media-type";

// ============================================================================
// SPREADSHEET ELEMENTS
// ============================================================================

/// A sheet
pub const TABLE: &str = "table:table";
/// A row
pub const TABLE_ROW: &str = "table:table-row";
/// A cell
pub const TABLE_CELL: &str = "table:table-cell";
/// A cell hidden under a spanning neighbour
pub const COVERED_TABLE_CELL: &str = "table:covered-table-cell";
/// A cell note
pub const ANNOTATION: &str = "office:annotation";

/// Elements that group rows without being rows themselves
pub const ROW_CONTAINERS: [&str; 3] = [
    "table:table-header-rows",
    "table:table-row-group",
    "table:table-rows",
];

/// Paragraph
pub const TEXT_P: &str = "text:p";
/// Run of spaces (`text:c` gives the count)
pub const TEXT_S: &str = "text:s";
/// Tab character
pub const TEXT_TAB: &str = "text:tab";
/// Line break
pub const TEXT_LINE_BREAK: &str = "text:line-break";

// ============================================================================
// CELL ATTRIBUTES
// ============================================================================

/// Sheet name
pub const ATTR_TABLE_NAME: &str = "table:name";
/// Cell value type (`string`, `float`, `currency`, ...)
pub const ATTR_VALUE_TYPE: &str = "office:value-type";
/// LibreOffice extension mirror of the value type
pub const ATTR_CALCEXT_VALUE_TYPE: &str = "calcext:value-type";
/// Numeric cell value
pub const ATTR_VALUE: &str = "office:value";
/// Cell formula
pub const ATTR_FORMULA: &str = "table:formula";
/// Horizontal repeat count of a cell
pub const ATTR_COLUMNS_REPEATED: &str = "table:number-columns-repeated";
/// Vertical repeat count of a row
pub const ATTR_ROWS_REPEATED: &str = "table:number-rows-repeated";
/// Space count of `text:s`
pub const ATTR_SPACE_COUNT: &str = "text:c";

/// Value-carrying attributes cleared whenever a cell's type is rewritten
pub const VALUE_ATTRIBUTES: [&str; 8] = [
    "office:value",
    "office:date-value",
    "office:time-value",
    "office:boolean-value",
    "office:string-value",
    "office:currency",
    "table:formula",
    "calcext:value-type",
];

/// Value types whose text content may carry a type prefix
pub const PREFIXABLE_VALUE_TYPES: [&str; 1] = ["string"];

/// Formula namespace prefix used by OpenFormula
pub const FORMULA_NAMESPACE: &str = "of:";
