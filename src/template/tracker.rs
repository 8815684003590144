//! Row/column cursor exposed to template expressions.
//!
//! Templates call the tracker while the document is being emitted, for
//! example to remember where a generated block of rows started so a total
//! formula further down can reference it. Every operation returns an empty
//! string so it can be invoked inline (`{{ tbl.increment_row() }}`) without
//! leaving text behind.

use parking_lot::Mutex;

/// Cursor state; `-1` means "not yet positioned".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    row: i64,
    col: i64,
}

/// Mutable row/column cursor, one per render pass.
#[derive(Debug)]
pub struct PositionTracker {
    cursor: Mutex<Cursor>,
}

impl PositionTracker {
    /// Create a tracker at `(-1, -1)`.
    pub fn new() -> Self {
        Self::at(-1, -1)
    }

    /// Create a tracker at the given position.
    pub fn at(row: i64, col: i64) -> Self {
        Self {
            cursor: Mutex::new(Cursor { row, col }),
        }
    }

    /// Move the row cursor by `delta`.
    pub fn increment_row(&self, delta: i64) -> String {
        self.cursor.lock().row += delta;
        String::new()
    }

    /// Move the column cursor by `delta`.
    pub fn increment_col(&self, delta: i64) -> String {
        self.cursor.lock().col += delta;
        String::new()
    }

    /// Put the row cursor at `row`.
    pub fn set_row(&self, row: i64) -> String {
        self.cursor.lock().row = row;
        String::new()
    }

    /// Put the column cursor at `col`.
    pub fn set_col(&self, col: i64) -> String {
        self.cursor.lock().col = col;
        String::new()
    }

    /// Current row.
    pub fn row(&self) -> i64 {
        self.cursor.lock().row
    }

    /// Current column.
    pub fn col(&self) -> i64 {
        self.cursor.lock().col
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unpositioned() {
        let tracker = PositionTracker::default();
        assert_eq!((tracker.row(), tracker.col()), (-1, -1));
    }

    #[test]
    fn test_operations_return_empty_and_mutate() {
        let tracker = PositionTracker::new();
        assert_eq!(tracker.increment_row(1), "");
        assert_eq!(tracker.increment_row(5), "");
        assert_eq!(tracker.increment_col(1), "");
        assert_eq!((tracker.row(), tracker.col()), (5, 0));

        assert_eq!(tracker.set_row(10), "");
        assert_eq!(tracker.set_col(-3), "");
        assert_eq!(tracker.increment_col(-2), "");
        assert_eq!((tracker.row(), tracker.col()), (10, -5));
    }
}
