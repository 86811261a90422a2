//! Table registry: keeps the engine's table set in lock-step with the
//! current processed workbook.
//!
//! Every sync recomputes the sheet-to-table mapping in full: the previous
//! tables are dropped (best effort) and each non-empty processed sheet is
//! registered under its computed name. The registry is the sole writer of
//! engine table state.

use crate::database::engine::{AnalyticalEngine, EngineError};
use crate::selection::apply::ProcessedWorkbook;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised when the engine rejects a table during a sync.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Registering table '{table}' for sheet '{sheet}' failed: {source}")]
    TableRejected {
        sheet: String,
        table: String,
        source: EngineError,
    },
}

/// Monotonic token identifying one submitted sync.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SyncGeneration(u64);

/// What a sync did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The mapping and engine tables now reflect this sync's workbook
    Applied,
    /// A newer sync was submitted first; nothing was touched
    Superseded,
}

/// Owns the live sheet-to-table mapping and the engine-side tables.
pub struct TableRegistry<E: AnalyticalEngine> {
    engine: E,
    mapping: BTreeMap<String, String>,
    consistent: bool,
    submitted: u64,
    applied: u64,
}

impl<E: AnalyticalEngine> TableRegistry<E> {
    pub fn new(engine: E) -> Self {
        TableRegistry {
            engine,
            mapping: BTreeMap::new(),
            consistent: true,
            submitted: 0,
            applied: 0,
        }
    }

    /// The engine handle, for ad hoc queries against registered tables.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The current sheet-to-table mapping.
    pub fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }

    /// False after a failed sync, until a later sync succeeds.
    pub fn is_consistent(&self) -> bool {
        self.consistent
    }

    /// Allocates the next sync generation. Later generations supersede
    /// earlier ones regardless of completion order.
    pub fn begin_sync(&mut self) -> SyncGeneration {
        self.submitted += 1;
        SyncGeneration(self.submitted)
    }

    /// Submits and runs a sync in one step.
    pub fn sync(&mut self, processed: &ProcessedWorkbook) -> Result<SyncOutcome, RegistrationError> {
        let generation = self.begin_sync();
        self.sync_generation(generation, processed)
    }

    /// Runs a previously submitted sync.
    ///
    /// A generation older than the newest submitted or applied one is
    /// abandoned before touching the engine, so a stale sync can never
    /// overwrite a newer mapping: the last submission wins.
    ///
    /// On a registration failure the sync aborts, the mapping is cleared,
    /// and the registry reports inconsistent until a later sync succeeds.
    pub fn sync_generation(
        &mut self,
        generation: SyncGeneration,
        processed: &ProcessedWorkbook,
    ) -> Result<SyncOutcome, RegistrationError> {
        if generation.0 < self.submitted || generation.0 <= self.applied {
            debug!("sync generation {} superseded", generation.0);
            return Ok(SyncOutcome::Superseded);
        }

        for table in self.mapping.values() {
            if let Err(error) = self.engine.drop_table(table) {
                // A dangling table must never block progress
                warn!("dropping table {} failed: {}", table, error);
            }
        }

        let mut next = BTreeMap::new();
        for (index, sheet) in processed.sheets.iter().enumerate() {
            if sheet.is_empty() {
                debug!("sheet {} is empty, no table registered", sheet.name);
                continue;
            }
            let table = table_name(&processed.file_name, &sheet.name, index);
            if let Err(source) = self.engine.register_table(&table, &sheet.csv) {
                // Partial table sets are never committed as success
                self.mapping.clear();
                self.consistent = false;
                return Err(RegistrationError::TableRejected {
                    sheet: sheet.name.clone(),
                    table,
                    source,
                });
            }
            next.insert(sheet.name.clone(), table);
        }

        self.mapping = next;
        self.consistent = true;
        self.applied = generation.0;
        Ok(SyncOutcome::Applied)
    }
}

/// Derives the engine table identifier for a sheet.
///
/// `<sanitized file stem>_<sanitized sheet name>`, lower-cased, with any run
/// of non-alphanumeric characters collapsed to a single underscore and
/// leading/trailing underscores stripped. An empty sheet part falls back to
/// the positional `sheet_<1-based index>`.
pub fn table_name(file_name: &str, sheet_name: &str, index: usize) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);
    let file_part = sanitize(stem);
    let mut sheet_part = sanitize(sheet_name);
    if sheet_part.is_empty() {
        sheet_part = format!("sheet_{}", index + 1);
    }
    if file_part.is_empty() {
        sheet_part
    } else {
        format!("{}_{}", file_part, sheet_part)
    }
}

/// Lower-cases and collapses every non-alphanumeric run to one underscore.
fn sanitize(text: &str) -> String {
    let mut out = String::new();
    let mut gap = false;
    for character in text.to_lowercase().chars() {
        if character.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.push(character);
        } else {
            gap = true;
        }
    }
    out
}
