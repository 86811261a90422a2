//! Workbook session: the bookkeeping from upload to engine tables.
//!
//! Owns one parsed workbook at a time, the per-sheet selection
//! configuration, the last applied projection, and the table registry.
//! Selection edits report whether they changed anything, so a completed drag
//! or header toggle triggers at most one refresh.

use crate::chat::{schema_map, TableSchema};
use crate::database::engine::{AnalyticalEngine, EngineError, QueryResult};
use crate::database::registry::{SyncOutcome, TableRegistry};
use crate::error::GridQueryError;
use crate::selection::apply::{apply_selection, ProcessedWorkbook};
use crate::selection::config::{SheetSelection, WorkbookSelection};
use crate::spreadsheet::{parse_workbook, ParseError, ParsedWorkbook};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by session-level operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No workbook is loaded")]
    NoWorkbook,

    #[error("Unknown sheet '{name}'")]
    UnknownSheet { name: String },
}

/// One loaded workbook and everything derived from it.
pub struct WorkbookSession<E: AnalyticalEngine> {
    workbook: Option<ParsedWorkbook>,
    selection: WorkbookSelection,
    processed: Option<ProcessedWorkbook>,
    registry: TableRegistry<E>,
}

impl<E: AnalyticalEngine> WorkbookSession<E> {
    pub fn new(engine: E) -> Self {
        WorkbookSession {
            workbook: None,
            selection: WorkbookSelection::new(),
            processed: None,
            registry: TableRegistry::new(engine),
        }
    }

    /// Parses an uploaded file, replacing any previous workbook wholesale.
    /// The selection configuration resets with it; nothing survives a reload.
    /// A parse failure leaves the previous workbook untouched.
    pub fn load(&mut self, bytes: &[u8], file_name: &str) -> Result<(), ParseError> {
        let workbook = parse_workbook(bytes, file_name)?;
        self.selection = WorkbookSelection::new();
        self.processed = None;
        self.workbook = Some(workbook);
        Ok(())
    }

    /// The currently loaded workbook, if any.
    pub fn workbook(&self) -> Option<&ParsedWorkbook> {
        self.workbook.as_ref()
    }

    /// The current selection configuration.
    pub fn selection(&self) -> &WorkbookSelection {
        &self.selection
    }

    /// Resolves one sheet's selection, defaulting when not configured.
    pub fn sheet_selection(&self, name: &str) -> SheetSelection {
        self.selection.sheet(name)
    }

    /// Stores a committed range for a sheet of the loaded workbook.
    /// Returns true when the stored configuration changed.
    pub fn set_range(&mut self, sheet: &str, range: &str) -> Result<bool, SessionError> {
        self.ensure_sheet(sheet)?;
        Ok(self.selection.set_range(sheet, range))
    }

    /// Stores a sheet's header flag. Returns true when it changed.
    pub fn set_first_row_is_header(
        &mut self,
        sheet: &str,
        value: bool,
    ) -> Result<bool, SessionError> {
        self.ensure_sheet(sheet)?;
        Ok(self.selection.set_first_row_is_header(sheet, value))
    }

    /// Re-applies the selection and syncs the engine's table set.
    pub fn refresh(&mut self) -> Result<SyncOutcome, GridQueryError> {
        let workbook = self.workbook.as_ref().ok_or(SessionError::NoWorkbook)?;
        let processed = apply_selection(workbook, &self.selection);
        let outcome = self.registry.sync(&processed)?;
        self.processed = Some(processed);
        Ok(outcome)
    }

    /// The projection produced by the last refresh.
    pub fn processed(&self) -> Option<&ProcessedWorkbook> {
        self.processed.as_ref()
    }

    /// The live sheet-to-table mapping.
    pub fn mapping(&self) -> &BTreeMap<String, String> {
        self.registry.mapping()
    }

    /// False after a failed sync, until a refresh succeeds.
    pub fn is_consistent(&self) -> bool {
        self.registry.is_consistent()
    }

    /// Runs an ad hoc query against the registered tables.
    pub fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        self.registry.engine().query(sql)
    }

    /// Schema map for the suggestion service, from the last refresh.
    pub fn schemas(&self, sample_limit: usize) -> Vec<TableSchema> {
        match self.processed.as_ref() {
            Some(processed) => schema_map(processed, self.registry.mapping(), sample_limit),
            None => Vec::new(),
        }
    }

    fn ensure_sheet(&self, name: &str) -> Result<(), SessionError> {
        let workbook = self.workbook.as_ref().ok_or(SessionError::NoWorkbook)?;
        if workbook.sheet(name).is_none() {
            return Err(SessionError::UnknownSheet {
                name: name.to_owned(),
            });
        }
        Ok(())
    }
}
