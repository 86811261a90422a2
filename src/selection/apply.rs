//! Selection applier: re-derives every sheet's relational view from its
//! matrix and the current selection configuration.
//!
//! Pure and total: malformed ranges fall back to the whole matrix and empty
//! slices short-circuit to the canonical empty sheet. A working (if empty)
//! preview beats a broken one.

use crate::selection::config::{SheetSelection, WorkbookSelection};
use crate::selection::range::CellRect;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::sheet::{project, ParsedSheet, Record};
use crate::spreadsheet::ParsedWorkbook;

/// A sheet after the selection is applied: a terminal projection without the
/// source matrix.
#[derive(Clone, Debug)]
pub struct ProcessedSheet {
    /// Sheet name
    pub name: String,
    /// Column identifiers
    pub columns: Vec<String>,
    /// Data records, one entry per column each
    pub rows: Vec<Record>,
    /// Canonical CSV of columns then rows
    pub csv: String,
}

impl ProcessedSheet {
    fn empty(name: &str) -> Self {
        ProcessedSheet {
            name: name.to_owned(),
            columns: Vec::new(),
            rows: Vec::new(),
            csv: String::new(),
        }
    }

    /// A sheet with no columns or no rows registers no table.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

/// A workbook after the selection is applied.
#[derive(Clone, Debug)]
pub struct ProcessedWorkbook {
    /// Name of the uploaded file, used for table naming
    pub file_name: String,
    /// Sheets in workbook order
    pub sheets: Vec<ProcessedSheet>,
}

impl ProcessedWorkbook {
    /// Finds a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&ProcessedSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Applies a workbook selection to every sheet of a parsed workbook.
pub fn apply_selection(
    workbook: &ParsedWorkbook,
    selection: &WorkbookSelection,
) -> ProcessedWorkbook {
    ProcessedWorkbook {
        file_name: workbook.file_name.clone(),
        sheets: workbook
            .sheets
            .iter()
            .map(|sheet| apply_sheet(sheet, &selection.sheet(&sheet.name)))
            .collect(),
    }
}

/// Applies one sheet's selection to its matrix.
fn apply_sheet(sheet: &ParsedSheet, selection: &SheetSelection) -> ProcessedSheet {
    let row_extent = sheet.matrix.len();
    let col_extent = sheet.matrix.iter().map(|row| row.len()).max().unwrap_or(0);
    if row_extent == 0 || col_extent == 0 {
        return ProcessedSheet::empty(&sheet.name);
    }

    let whole = CellRect {
        row_start: 0,
        row_end: row_extent - 1,
        col_start: 0,
        col_end: col_extent - 1,
    };
    let rect = match selection.range.trim() {
        "" => whole,
        // Malformed notation falls back to the whole matrix
        text => CellRect::try_from(text)
            .ok()
            .and_then(|rect| rect.clamped(row_extent, col_extent))
            .unwrap_or(whole),
    };

    let slice = slice_matrix(&sheet.matrix, &rect);
    let projection = project(&slice, selection.first_row_is_header);
    ProcessedSheet {
        name: sheet.name.clone(),
        columns: projection.columns,
        rows: projection.rows,
        csv: projection.csv,
    }
}

/// Cuts the clamped rectangle out of the matrix as a dense sub-matrix.
/// Cells a jagged source row does not cover become null.
fn slice_matrix(matrix: &[Vec<CellValue>], rect: &CellRect) -> Vec<Vec<CellValue>> {
    (rect.row_start..=rect.row_end)
        .map(|row| {
            (rect.col_start..=rect.col_end)
                .map(|col| {
                    matrix
                        .get(row)
                        .and_then(|cells| cells.get(col))
                        .cloned()
                        .unwrap_or(CellValue::Null)
                })
                .collect()
        })
        .collect()
}
