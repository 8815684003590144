//! Unified error types for sheet-stencil.
//!
//! Every failure of a render pass maps onto one [`Error`] variant, and every
//! variant belongs to exactly one [`RenderPhase`], so callers can tell which
//! step of the pipeline failed without inspecting messages.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{BoxError, Error, RenderPhase, Result};
