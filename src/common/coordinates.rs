//! Cell coordinates in A1 notation.
//!
//! Render errors report the offending cell in A1 notation so template
//! authors can jump straight to it; SpreadsheetML addresses its cells and
//! comments the same way.

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert alphabetic column notation to a 0-indexed column
///
/// # Examples
///
/// ```
/// use sheet_stencil::common::coordinates::alpha_to_digit;
///
/// assert_eq!(alpha_to_digit("A").unwrap(), 0);
/// assert_eq!(alpha_to_digit("ab").unwrap(), 27);
/// assert!(alpha_to_digit("A1").is_err());
/// ```
pub fn alpha_to_digit(alpha: &str) -> Result<usize> {
    if alpha.is_empty() || !alpha.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(Error::MalformedMarkup(format!(
            "Column value '{}' is malformed, must contain only letters",
            alpha
        )));
    }

    let mut column = 0usize;
    for b in alpha.bytes() {
        column = column * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize;
    }

    Ok(column - 1)
}

/// Convert numeric column to alphabetic notation (0-indexed)
///
/// # Examples
///
/// ```
/// use sheet_stencil::common::coordinates::digit_to_alpha;
///
/// assert_eq!(digit_to_alpha(0), "A");
/// assert_eq!(digit_to_alpha(25), "Z");
/// assert_eq!(digit_to_alpha(26), "AA");
/// assert_eq!(digit_to_alpha(27), "AB");
/// ```
pub fn digit_to_alpha(mut digit: usize) -> String {
    let mut column = Vec::new();
    digit += 1; // 1-indexed for the base-26 walk

    while digit > 0 {
        let c = ((digit - 1) % 26) as u8;
        column.push(b'A' + c);
        digit = (digit - 1) / 26;
    }

    column.reverse();
    String::from_utf8(column).unwrap_or_default()
}

/// Cell coordinates (column, row) both 0-indexed
///
/// # Examples
///
/// ```
/// use sheet_stencil::common::coordinates::CellCoord;
///
/// assert_eq!(CellCoord::new(0, 0).to_string(), "A1");
/// assert_eq!(CellCoord::new(26, 9).to_string(), "AA10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    column: usize,
    row: usize,
}

impl CellCoord {
    /// Create a new cell coordinate
    #[inline]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Get column index (0-indexed)
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Get row index (0-indexed)
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }
}

impl FromStr for CellCoord {
    type Err = Error;

    /// Parse an A1 reference such as `AA10`.
    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(|| Error::MalformedMarkup(format!("No row number found in '{}'", s)))?;
        let (alpha, numeric) = s.split_at(split);
        let column = alpha_to_digit(alpha)?;
        let row: usize = numeric
            .parse()
            .map_err(|_| Error::MalformedMarkup(format!("Failed to parse row number from '{}'", numeric)))?;
        if row == 0 {
            return Err(Error::MalformedMarkup(format!("Row number must be >= 1 in '{}'", s)));
        }
        Ok(Self::new(column, row - 1))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut row = itoa::Buffer::new();
        write!(f, "{}{}", digit_to_alpha(self.column), row.format(self.row + 1))
    }
}
