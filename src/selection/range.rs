//! Excel-style rectangular range notation.
//!
//! A range string is `"<TopLeft>:<BottomRight>"` (e.g. `B3:E20`); the
//! canonical form always puts the top-left corner first. Decoding accepts
//! any corner order and a bare single cell, and normalizes both.

use crate::spreadsheet::reference::{col_to_index, index_to_reference, row_to_index};
use regex::Regex;
use thiserror::Error;

/// Errors related to Excel-style range parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),
}

/// A cell position in 0-based dense grid coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellPos {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        CellPos { row, col }
    }
}

/// A normalized rectangle of cells, bounds inclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl CellRect {
    /// Builds the rectangle spanned by two corners, normalizing each axis
    /// independently so any corner pair yields the same rectangle.
    pub fn from_corners(a: CellPos, b: CellPos) -> Self {
        CellRect {
            row_start: a.row.min(b.row),
            row_end: a.row.max(b.row),
            col_start: a.col.min(b.col),
            col_end: a.col.max(b.col),
        }
    }

    /// The single-cell rectangle.
    pub fn single(pos: CellPos) -> Self {
        Self::from_corners(pos, pos)
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.row_end - self.row_start + 1
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.col_end - self.col_start + 1
    }

    /// Canonical range notation, top-left corner first.
    pub fn notation(&self) -> String {
        format!(
            "{}:{}",
            index_to_reference(self.row_start, self.col_start),
            index_to_reference(self.row_end, self.col_end)
        )
    }

    /// Clamps each bound independently into `[0, extent - 1]` on both axes.
    /// Returns None when either extent is zero.
    pub fn clamped(&self, row_extent: usize, col_extent: usize) -> Option<CellRect> {
        if row_extent == 0 || col_extent == 0 {
            return None;
        }
        Some(CellRect {
            row_start: self.row_start.min(row_extent - 1),
            row_end: self.row_end.min(row_extent - 1),
            col_start: self.col_start.min(col_extent - 1),
            col_end: self.col_end.min(col_extent - 1),
        })
    }
}

impl TryFrom<&str> for CellRect {
    type Error = RangeError;

    /// Parses a range string (e.g. "B3:E20", "b3:e20", or a bare "B3").
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^([A-Za-z]+)([0-9]+)(?::([A-Za-z]+)([0-9]+))?$")
            .expect("Hardcode regex pattern");
        let trimmed = value.trim();
        let captures = pattern
            .captures(trimmed)
            .ok_or_else(|| RangeError::FormatError(value.to_owned()))?;

        let corner = |col_match: usize, row_match: usize| -> Option<CellPos> {
            let col = col_to_index(captures.get(col_match)?.as_str())?;
            let row = row_to_index(captures.get(row_match)?.as_str())?;
            Some(CellPos { row, col })
        };
        let first = corner(1, 2).ok_or_else(|| RangeError::FormatError(value.to_owned()))?;
        let second = match captures.get(3) {
            Some(_) => corner(3, 4).ok_or_else(|| RangeError::FormatError(value.to_owned()))?,
            None => first,
        };
        Ok(CellRect::from_corners(first, second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_normalize_per_axis() {
        let expected = CellRect { row_start: 1, row_end: 4, col_start: 0, col_end: 2 };
        assert_eq!(CellRect::from_corners(CellPos::new(1, 0), CellPos::new(4, 2)), expected);
        assert_eq!(CellRect::from_corners(CellPos::new(4, 2), CellPos::new(1, 0)), expected);
        assert_eq!(CellRect::from_corners(CellPos::new(1, 2), CellPos::new(4, 0)), expected);
        assert_eq!(CellRect::from_corners(CellPos::new(4, 0), CellPos::new(1, 2)), expected);
    }

    #[test]
    fn notation_is_canonical() {
        let rect = CellRect::from_corners(CellPos::new(19, 4), CellPos::new(2, 1));
        assert_eq!(rect.notation(), "B3:E20");
        assert_eq!(CellRect::single(CellPos::new(0, 0)).notation(), "A1:A1");
    }

    #[test]
    fn decode_inverts_notation() {
        for (row_start, col_start, row_end, col_end) in
            [(0, 0, 0, 0), (2, 1, 19, 4), (0, 25, 999, 27), (5, 5, 5, 700)]
        {
            let rect = CellRect { row_start, row_end, col_start, col_end };
            assert_eq!(CellRect::try_from(rect.notation().as_str()).unwrap(), rect);
        }
    }

    #[test]
    fn decode_accepts_any_corner_order_and_case() {
        let expected = CellRect { row_start: 2, row_end: 19, col_start: 1, col_end: 4 };
        assert_eq!(CellRect::try_from("E20:B3").unwrap(), expected);
        assert_eq!(CellRect::try_from("b3:e20").unwrap(), expected);
    }

    #[test]
    fn decode_accepts_single_cell() {
        assert_eq!(
            CellRect::try_from("C7").unwrap(),
            CellRect { row_start: 6, row_end: 6, col_start: 2, col_end: 2 }
        );
    }

    #[test]
    fn decode_rejects_malformed_text() {
        for text in ["", ":", "A0:B2", "1:2", "AB", "A1:B", "A1:B2:C3", "garbage"] {
            assert!(CellRect::try_from(text).is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn clamp_bounds_each_edge_independently() {
        let rect = CellRect { row_start: 1, row_end: 50, col_start: 0, col_end: 9 };
        assert_eq!(
            rect.clamped(10, 3),
            Some(CellRect { row_start: 1, row_end: 9, col_start: 0, col_end: 2 })
        );
    }

    #[test]
    fn clamp_pulls_fully_outside_ranges_to_the_nearest_cells() {
        let rect = CellRect { row_start: 99, row_end: 199, col_start: 25, col_end: 26 };
        assert_eq!(
            rect.clamped(3, 2),
            Some(CellRect { row_start: 2, row_end: 2, col_start: 1, col_end: 1 })
        );
    }

    #[test]
    fn clamp_of_empty_extent_is_none() {
        let rect = CellRect { row_start: 0, row_end: 0, col_start: 0, col_end: 0 };
        assert_eq!(rect.clamped(0, 5), None);
        assert_eq!(rect.clamped(5, 0), None);
    }
}
