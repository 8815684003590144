//! OpenDocument spreadsheet support.
//!
//! - [`core`]: the ZIP container: reading entries and writing a copy in which
//!   only selected entries change
//! - [`ods`]: sheet/row/cell/annotation structure on top of the markup tree
//! - [`constants`]: MIME types, element and attribute names

pub mod constants;
pub mod core;
pub mod ods;

#[cfg(test)]
pub(crate) mod testing;

pub use self::core::{EntryOverrides, Package};
