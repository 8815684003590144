//! Office Open XML spreadsheet packages.
//!
//! An `.xlsx` file is an OPC package: a ZIP container whose parts are found
//! through relationship parts rather than fixed names. [`opc`] resolves
//! those relationships and content types; [`xlsx`] interprets the
//! SpreadsheetML parts the template engine touches (workbook, worksheets,
//! shared strings, comments). The container itself is read and re-written
//! with [`crate::odf::Package`], which is format-neutral.

pub mod constants;
pub mod opc;
pub mod xlsx;
