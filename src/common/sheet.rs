//! Cell locations shared by the spreadsheet walkers.

use crate::common::markup::NodePath;

/// Location of one cell element in a content tree.
///
/// Produced by the OpenDocument and SpreadsheetML walkers so that cells and
/// their ancestors can be edited by path after the walk has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSite {
    /// Path of the cell element
    pub path: NodePath,
    /// Path of the enclosing row
    pub row_path: Option<NodePath>,
    /// Path of the element holding the sheet's rows
    pub sheet_path: Option<NodePath>,
    /// Name of the sheet (empty when unknown)
    pub sheet: String,
    /// 0-based row index within the sheet
    pub row: usize,
    /// 0-based column index within the row
    pub col: usize,
}
