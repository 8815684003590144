//! Common types and utilities shared across the crate.
//!
//! This module provides the unified error type, the lossless markup tree
//! both container formats are edited through, A1 cell coordinates, and the
//! XML escaping helpers.

// Submodule declarations
pub mod coordinates;
pub mod error;
pub mod markup;
pub mod sheet;
pub mod xml;

// Re-exports for convenience
pub use error::{BoxError, Error, RenderPhase, Result};
pub use sheet::CellSite;
