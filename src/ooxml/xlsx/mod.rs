//! SpreadsheetML parts touched by template rendering.

pub mod comments;
pub mod shared_strings;
pub mod sheet;
pub mod workbook;

pub use comments::{CellNote, comment_notes, comments_part, remove_comments};
pub use shared_strings::{SharedStrings, inline_shared_strings};
pub use sheet::{cell_sites, renumber};
pub use workbook::{SheetEntry, Workbook, document_content_type};
