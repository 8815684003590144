//! Typed cell output.
//!
//! The first character of a string cell selects how the rendered value is
//! written back:
//!
//! | Prefix      | ODF                                   | OOXML           |
//! |-------------|---------------------------------------|-----------------|
//! | `*`         | text                                  | inline string   |
//! | `:`         | number (`office:value-type="float"`)  | `<v>` value     |
//! | `@` or `$`  | formula (`table:formula="of:=..."`)   | `<f>` formula   |
//!
//! Before evaluation the prefix is stripped and the requested type is stored
//! on the cell element as a marker attribute, so every copy a loop makes of
//! the cell carries its type. After evaluation the rendered tree is walked in
//! document order and each marked cell is rewritten.

use super::dialect::SheetDialect;
use crate::common::markup::Document;
use crate::common::{Error, Result};
use crate::odf::constants::FORMULA_NAMESPACE;
use phf::{Map, phf_map};

/// Attribute carrying the requested type between marking and writing.
pub const CELL_TYPE_MARKER: &str = "stencil:cell-type";

/// Output type requested by a cell prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Text,
    Number,
    Formula,
}

static PREFIXES: Map<char, CellType> = phf_map! {
    '*' => CellType::Text,
    ':' => CellType::Number,
    '@' => CellType::Formula,
    '$' => CellType::Formula,
};

impl CellType {
    /// Type selected by a leading character.
    pub fn from_prefix(c: char) -> Option<Self> {
        PREFIXES.get(&c).copied()
    }

    fn marker(self) -> &'static str {
        match self {
            CellType::Text => "text",
            CellType::Number => "number",
            CellType::Formula => "formula",
        }
    }

    fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "text" => Some(CellType::Text),
            "number" => Some(CellType::Number),
            "formula" => Some(CellType::Formula),
            _ => None,
        }
    }
}

/// Strip type prefixes and mark the cells, returning how many were marked.
pub fn mark_cells<D: SheetDialect + ?Sized>(doc: &mut Document, dialect: &D) -> usize {
    let mut marked = 0;
    for site in dialect.cell_sites(doc) {
        let Some(cell) = doc.element_at_mut(&site.path) else {
            continue;
        };
        if !dialect.is_prefixable(cell) {
            continue;
        }
        let Some(cell_type) = dialect.leading_char(cell).and_then(CellType::from_prefix) else {
            continue;
        };
        if dialect.strip_leading_char(cell).is_some() {
            cell.set_attribute(CELL_TYPE_MARKER, cell_type.marker());
            marked += 1;
        }
    }
    marked
}

/// Rewrite every marked cell with its requested type, removing the markers.
///
/// Returns the number of cells rewritten. Fails with
/// [`Error::TypeCoercion`] on the first number cell whose text does not
/// parse.
pub fn apply_cell_types<D: SheetDialect + ?Sized>(doc: &mut Document, dialect: &D) -> Result<usize> {
    let mut written = 0;
    for site in dialect.cell_sites(doc) {
        let Some(cell) = doc.element_at_mut(&site.path) else {
            continue;
        };
        let Some(marker) = cell.remove_attribute(CELL_TYPE_MARKER) else {
            continue;
        };
        let Some(cell_type) = CellType::from_marker(&marker) else {
            log::warn!("Ignoring unknown cell type marker {marker:?}");
            continue;
        };
        let text = dialect.cell_text(cell);
        match cell_type {
            CellType::Text => dialect.write_text(cell),
            CellType::Formula => dialect.write_formula(cell, formula_body(&text)),
            CellType::Number => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    dialect.write_blank(cell);
                } else {
                    let value = parse_number(trimmed).ok_or_else(|| Error::TypeCoercion {
                        sheet: site.sheet.clone(),
                        row: site.row,
                        col: site.col,
                        text: text.clone(),
                    })?;
                    dialect.write_number(cell, value, trimmed);
                }
            },
        }
        written += 1;
    }
    Ok(written)
}

/// Formula text without surrounding space, `of:` namespace or leading `=`.
pub fn formula_body(text: &str) -> &str {
    let text = text.trim();
    let body = text.strip_prefix(FORMULA_NAMESPACE).unwrap_or(text);
    body.strip_prefix('=').unwrap_or(body)
}

/// Parse a rendered number, accepting `,` as the decimal separator when the
/// text has no `.`.
pub fn parse_number(text: &str) -> Option<f64> {
    let value: f64 = if !text.contains('.') && text.contains(',') {
        fast_float2::parse(text.replacen(',', ".", 1)).ok()?
    } else {
        fast_float2::parse(text).ok()?
    };
    value.is_finite().then_some(value)
}

/// Format a value for `office:value` or a `<v>` element.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        let mut buffer = itoa::Buffer::new();
        buffer.format(value as i64).to_string()
    } else {
        let mut buffer = ryu::Buffer::new();
        buffer.format_finite(value).to_string()
    }
}
