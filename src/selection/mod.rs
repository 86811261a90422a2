//! # Range selection
//!
//! The interactive selection model and its application to parsed workbooks:
//! drag tracking, range notation, per-sheet selection configuration, and the
//! pure applier that re-derives columns, rows, and CSV from a matrix.

pub mod apply;
pub mod config;
pub mod range;
pub mod selector;

pub use apply::{apply_selection, ProcessedSheet, ProcessedWorkbook};
pub use config::{SheetSelection, WorkbookSelection};
pub use range::{CellPos, CellRect, RangeError};
pub use selector::{DragState, RangeSelector};
