//! Error type and phase taxonomy.
use crate::common::coordinates::CellCoord;
use std::fmt;
use thiserror::Error;

/// Boxed error produced by an external expression evaluator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for template rendering.
#[derive(Error, Debug)]
pub enum Error {
    /// None of the candidate template names exists under any search root
    #[error("Template not found: {}", .candidates.join(";"))]
    TemplateNotFound { candidates: Vec<String> },

    /// The container could not be opened or indexed
    #[error("Archive unreadable: {0}")]
    ArchiveUnreadable(String),

    /// A named entry is absent from the container
    #[error("Entry missing from archive: {0}")]
    EntryMissing(String),

    /// The content stream (or rendered markup) is not well-formed XML
    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),

    /// A directive's scope anchor could not be resolved
    #[error("Invalid directive scope: {0}")]
    InvalidDirectiveScope(String),

    /// Rendered text could not be written with the type its prefix requested
    #[error(
        "Cannot write {text:?} as a number in {sheet}.{} (row {row}, column {col})",
        cell_ref(.col, .row)
    )]
    TypeCoercion {
        sheet: String,
        row: usize,
        col: usize,
        text: String,
    },

    /// The output container could not be written
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// The external expression evaluator failed
    #[error("Evaluator error: {0}")]
    Evaluator(#[source] BoxError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// The pipeline phase this error originates from.
    pub fn phase(&self) -> RenderPhase {
        match self {
            Error::TemplateNotFound { .. } => RenderPhase::Resolve,
            Error::ArchiveUnreadable(_) | Error::EntryMissing(_) => RenderPhase::Open,
            Error::MalformedMarkup(_) => RenderPhase::Parse,
            Error::InvalidDirectiveScope(_) => RenderPhase::Relocate,
            Error::Evaluator(_) => RenderPhase::Evaluate,
            Error::TypeCoercion { .. } => RenderPhase::TypedWrite,
            Error::WriteFailed(_) => RenderPhase::Write,
            Error::Config(_) => RenderPhase::Configure,
        }
    }
}

/// Steps of a render pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    /// Loading a [`RenderConfig`](crate::template::RenderConfig)
    Configure,
    /// Locating the template file
    Resolve,
    /// Opening the container and reading the content entry
    Open,
    /// Parsing template or rendered markup
    Parse,
    /// Extracting and relocating annotation directives
    Relocate,
    /// Running the expression evaluator
    Evaluate,
    /// Writing typed values back into cells
    TypedWrite,
    /// Writing the output container
    Write,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderPhase::Configure => "configure",
            RenderPhase::Resolve => "resolve",
            RenderPhase::Open => "open",
            RenderPhase::Parse => "parse",
            RenderPhase::Relocate => "relocate",
            RenderPhase::Evaluate => "evaluate",
            RenderPhase::TypedWrite => "typed-write",
            RenderPhase::Write => "write",
        };
        f.write_str(name)
    }
}

fn cell_ref(col: &usize, row: &usize) -> CellCoord {
    CellCoord::new(*col, *row)
}

/// Result type for sheet-stencil operations.
pub type Result<T> = std::result::Result<T, Error>;
