//! Parsed sheet model and the matrix-to-record projection.
//!
//! The matrix is the ground truth for a sheet; columns, rows, and CSV are a
//! projection of it. The same projection drives both the parser's default
//! view (first row is the header, full extent) and the selection applier.

use crate::spreadsheet::cell::{CellValue, Matrix};
use crate::spreadsheet::csv::write_csv;
use std::collections::HashSet;

static NULL_CELL: CellValue = CellValue::Null;

/// One data row as ordered column-to-value pairs, one entry per column.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Builds a record for the given columns from a positional row.
    /// Short rows are padded with nulls, extra cells beyond the columns are dropped.
    pub(crate) fn new(columns: &[String], mut values: Vec<CellValue>) -> Self {
        values.resize(columns.len(), CellValue::Null);
        Record {
            fields: columns.iter().cloned().zip(values).collect(),
        }
    }

    /// Looks a value up by column name.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Looks a value up by column name, falling back to position.
    ///
    /// The named path covers the regular case; the positional fallback keeps
    /// sparse or irregularly keyed records from dropping cells. A position
    /// outside the record reads as null.
    pub fn value_at(&self, name: &str, index: usize) -> &CellValue {
        self.get(name)
            .or_else(|| self.fields.get(index).map(|(_, value)| value))
            .unwrap_or(&NULL_CELL)
    }

    /// Iterates values in column order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Iterates (column, value) pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(column, value)| (column.as_str(), value))
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A sheet parsed from a workbook: the raw matrix plus its default projection.
#[derive(Clone, Debug)]
pub struct ParsedSheet {
    /// Sheet name
    pub name: String,
    /// Column identifiers of the default projection
    pub columns: Vec<String>,
    /// Data records of the default projection
    pub rows: Vec<Record>,
    /// Canonical CSV of the default projection
    pub csv: String,
    /// Raw header-inclusive grid; ground truth for re-projection
    pub matrix: Matrix,
}

impl ParsedSheet {
    /// Builds a sheet from its raw matrix with the default projection
    /// (first row is the header, full extent).
    pub(crate) fn from_matrix(name: &str, matrix: Matrix) -> Self {
        let projection = project(&matrix, true);
        ParsedSheet {
            name: name.to_owned(),
            columns: projection.columns,
            rows: projection.rows,
            csv: projection.csv,
            matrix,
        }
    }

    /// The canonical empty sheet.
    pub(crate) fn empty(name: &str) -> Self {
        ParsedSheet {
            name: name.to_owned(),
            columns: Vec::new(),
            rows: Vec::new(),
            csv: String::new(),
            matrix: Vec::new(),
        }
    }
}

/// Result of projecting a matrix slice into relational shape.
pub(crate) struct Projection {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Record>,
    pub(crate) csv: String,
}

impl Projection {
    fn empty() -> Self {
        Projection {
            columns: Vec::new(),
            rows: Vec::new(),
            csv: String::new(),
        }
    }
}

/// Projects a matrix into columns, records, and canonical CSV.
///
/// With a header, row 0 supplies the column names (blank or duplicate cells
/// fall back to `Column_<n>`) and the remaining rows become data; without
/// one, every row is data under synthesized `Column_<n>` names. An empty or
/// zero-width matrix projects to the canonical empty result.
pub(crate) fn project(matrix: &[Vec<CellValue>], first_row_is_header: bool) -> Projection {
    let width = matrix.iter().map(|row| row.len()).max().unwrap_or(0);
    if matrix.is_empty() || width == 0 {
        return Projection::empty();
    }

    let (columns, data) = if first_row_is_header {
        (header_names(&matrix[0], width), &matrix[1..])
    } else {
        (synthesized_names(width), matrix)
    };

    let rows: Vec<Record> = data
        .iter()
        .map(|row| Record::new(&columns, row.to_vec()))
        .collect();
    let csv = write_csv(&columns, &rows);
    Projection { columns, rows, csv }
}

/// Derives column names from a header row.
///
/// Blank cells and duplicates of an earlier name fall back to the positional
/// `Column_<n>` identifier, so every column gets a unique, non-empty,
/// position-stable name.
pub(crate) fn header_names(header: &[CellValue], width: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(width);
    for position in 0..width {
        let text = header
            .get(position)
            .map(|cell| cell.to_text().trim().to_owned())
            .unwrap_or_default();
        let mut name = if text.is_empty() || seen.contains(&text) {
            fallback_name(position)
        } else {
            text
        };
        // A header cell may itself spell a fallback name
        let mut attempt = 1;
        while seen.contains(&name) {
            name = format!("{}_{}", fallback_name(position), attempt);
            attempt += 1;
        }
        seen.insert(name.clone());
        columns.push(name);
    }
    columns
}

/// Positional column names for headerless projections.
fn synthesized_names(width: usize) -> Vec<String> {
    (0..width).map(fallback_name).collect()
}

/// The positional fallback identifier for a 0-based column position.
fn fallback_name(position: usize) -> String {
    format!("Column_{}", position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_owned())
    }

    #[test]
    fn record_pads_and_truncates() {
        let columns = vec!["A".to_owned(), "B".to_owned()];
        let short = Record::new(&columns, vec![CellValue::Int(1)]);
        assert_eq!(short.get("B"), Some(&CellValue::Null));
        let long = Record::new(&columns, vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)]);
        assert_eq!(long.len(), 2);
    }

    #[test]
    fn record_named_lookup_with_positional_fallback() {
        let columns = vec!["Name".to_owned(), "Age".to_owned()];
        let record = Record::new(&columns, vec![text("Ann"), CellValue::Int(30)]);
        assert_eq!(record.value_at("Age", 1), &CellValue::Int(30));
        // Unknown name drops to the positional path
        assert_eq!(record.value_at("age", 1), &CellValue::Int(30));
        // Unknown name and out-of-range position read as null
        assert_eq!(record.value_at("missing", 9), &CellValue::Null);
    }

    #[test]
    fn header_blanks_fall_back_to_positional_names() {
        let header = vec![text("Name"), CellValue::Null, text("  ")];
        assert_eq!(header_names(&header, 3), vec!["Name", "Column_2", "Column_3"]);
    }

    #[test]
    fn header_duplicates_fall_back_to_positional_names() {
        let header = vec![text("X"), text("X"), text("X")];
        assert_eq!(header_names(&header, 3), vec!["X", "Column_2", "Column_3"]);
    }

    #[test]
    fn header_colliding_with_fallback_stays_unique() {
        let header = vec![text("Column_2"), CellValue::Null];
        assert_eq!(header_names(&header, 2), vec!["Column_2", "Column_2_1"]);
    }

    #[test]
    fn header_shorter_than_width_is_padded() {
        let header = vec![text("Only")];
        assert_eq!(header_names(&header, 3), vec!["Only", "Column_2", "Column_3"]);
    }

    #[test]
    fn project_with_header() {
        let matrix = vec![
            vec![text("Name"), text("Age")],
            vec![text("Ann"), text("30")],
            vec![text("Bo"), text("25")],
        ];
        let projection = project(&matrix, true);
        assert_eq!(projection.columns, vec!["Name", "Age"]);
        assert_eq!(projection.rows.len(), 2);
        assert_eq!(projection.rows[0].get("Name"), Some(&text("Ann")));
        assert_eq!(projection.rows[1].get("Age"), Some(&text("25")));
        assert_eq!(projection.csv, "Name,Age\nAnn,30\nBo,25\n");
    }

    #[test]
    fn project_without_header_keeps_every_row() {
        let matrix = vec![
            vec![text("Name"), text("Age")],
            vec![text("Ann"), text("30")],
        ];
        let projection = project(&matrix, false);
        assert_eq!(projection.columns, vec!["Column_1", "Column_2"]);
        assert_eq!(projection.rows.len(), 2);
        assert_eq!(projection.rows[0].get("Column_1"), Some(&text("Name")));
    }

    #[test]
    fn project_jagged_rows_pad_with_null() {
        let matrix = vec![
            vec![text("A"), text("B"), text("C")],
            vec![text("1")],
        ];
        let projection = project(&matrix, true);
        assert_eq!(projection.columns.len(), 3);
        assert_eq!(projection.rows[0].value_at("B", 1), &CellValue::Null);
        assert_eq!(projection.csv, "A,B,C\n1,,\n");
    }

    #[test]
    fn project_empty_matrix() {
        let projection = project(&[], true);
        assert!(projection.columns.is_empty());
        assert!(projection.rows.is_empty());
        assert_eq!(projection.csv, "");
    }

    #[test]
    fn header_only_matrix_has_columns_but_no_rows() {
        let matrix = vec![vec![text("Name"), text("Age")]];
        let projection = project(&matrix, true);
        assert_eq!(projection.columns, vec!["Name", "Age"]);
        assert!(projection.rows.is_empty());
        assert_eq!(projection.csv, "Name,Age\n");
    }
}
