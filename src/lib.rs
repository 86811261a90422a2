//! # gridquery
//!
//! Turns a visually selected spreadsheet region into a relational table
//! inside an in-process analytical engine, and keeps the engine's table set
//! consistent as the selection changes.
//!
//! ## Pipeline
//!
//! - **Workbook parsing**: decode uploaded bytes into one matrix per sheet
//!   plus a default projection (first row is the header, full extent)
//! - **Range selection**: track an anchor-to-cursor rectangle per sheet and
//!   derive canonical `A1:D20` notation from it
//! - **Selection applying**: re-derive columns, records, and canonical CSV
//!   from a matrix and the per-sheet selection configuration
//! - **Table registry**: mirror every non-empty projected sheet into the
//!   engine, dropping stale tables and superseding overlapping syncs
//! - **Chat suggestions**: hand the registered schema to a
//!   natural-language-to-SQL service and recover its answers defensively
//!
//! The analytical engine, the grid widget, and the suggestion backend are
//! external collaborators reached through narrow interfaces; everything here
//! is plain in-memory state for the lifetime of one loaded workbook.

pub mod chat;
pub mod database;
pub mod error;
pub mod selection;
pub mod session;
pub mod spreadsheet;

pub use crate::chat::{
    parse_suggestion, schema_map, suggest_or_degraded, HttpSuggestionService, Suggestion,
    SuggestionError, SuggestionService, TableSchema,
};
pub use crate::database::{
    table_name, AnalyticalEngine, DuckDbEngine, EngineError, QueryResult, RegistrationError,
    SyncGeneration, SyncOutcome, TableRegistry,
};
pub use crate::error::GridQueryError;
pub use crate::selection::{
    apply_selection, CellPos, CellRect, DragState, ProcessedSheet, ProcessedWorkbook, RangeError,
    RangeSelector, SheetSelection, WorkbookSelection,
};
pub use crate::session::{SessionError, WorkbookSession};
pub use crate::spreadsheet::cell::{CellValue, Matrix};
pub use crate::spreadsheet::sheet::{ParsedSheet, Record};
pub use crate::spreadsheet::{parse_workbook, ParseError, ParsedWorkbook};
