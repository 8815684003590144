//! Template expansion.
//!
//! A template is an ordinary spreadsheet whose cells hold expressions and
//! whose cell notes hold control directives. Rendering moves the directives
//! out of the notes into the surrounding markup, evaluates each part holding
//! cells with an [`Evaluator`], and writes typed values back into the cells
//! that asked for them.
//!
//! OpenDocument notes are `office:annotation` elements inside the cell.
//! Workbook notes are the legacy comments of the worksheet; a comment whose
//! directive was relocated is removed from the comments part.
//!
//! # Template syntax
//!
//! First character of a cell:
//!
//! - `*` writes the result as text
//! - `:` writes the result as a number
//! - `@` or `$` writes the result as a formula
//!
//! First characters of a cell note:
//!
//! - `!` places the note around the cell
//! - `!!` places it around the cell's row
//! - `!!!` places it around the cell's sheet
//!
//! The note text is split on its first `@` into the part inserted before
//! and the part inserted after, e.g. `!!{% for r in rows %}@{% endfor %}`.
//! `_start_` and `_end_` may be written for the value delimiters.

pub mod cell_type;
mod config;
mod context;
pub mod dialect;
pub mod directive;
pub mod evaluator;
pub mod format;
#[cfg(feature = "minijinja")]
mod jinja;
mod locate;
mod render;
mod tracker;

pub use cell_type::CellType;
pub use config::{Aliases, DEFAULT_TRACKER_NAME, RenderConfig};
pub use context::{Context, ContextValue};
pub use dialect::{OdsDialect, SheetDialect, XlsxDialect};
pub use directive::{Directive, Scope};
pub use evaluator::Evaluator;
pub use format::TemplateFormat;
#[cfg(feature = "minijinja")]
pub use jinja::MiniJinjaEvaluator;
pub use locate::TemplateSource;
pub use render::{RenderFailure, RenderedDocument, TemplateRenderer};
pub use tracker::PositionTracker;
