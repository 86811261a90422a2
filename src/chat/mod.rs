//! # Chat suggestion support
//!
//! Builds the sheet schema map handed to the natural-language-to-SQL
//! suggestion service and recovers its answers defensively. Service
//! failures never cross this boundary: callers always get a suggestion,
//! degraded to explanation-only when needed.

pub mod client;
pub mod suggestion;

pub use client::HttpSuggestionService;
pub use suggestion::{parse_suggestion, Suggestion};

use crate::selection::apply::ProcessedWorkbook;
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while talking to the suggestion service.
#[derive(Error, Debug)]
pub enum SuggestionError {
    #[error("Suggestion request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// One registered table's shape, as shown to the suggestion service.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TableSchema {
    /// Source sheet name
    pub sheet: String,
    /// Engine table identifier
    pub table: String,
    /// Column identifiers
    pub columns: Vec<String>,
    /// A few leading rows as text, for context
    pub sample_rows: Vec<Vec<String>>,
}

/// Builds the schema map for every sheet with a registered table.
pub fn schema_map(
    processed: &ProcessedWorkbook,
    mapping: &BTreeMap<String, String>,
    sample_limit: usize,
) -> Vec<TableSchema> {
    processed
        .sheets
        .iter()
        .filter_map(|sheet| {
            let table = mapping.get(&sheet.name)?;
            Some(TableSchema {
                sheet: sheet.name.clone(),
                table: table.clone(),
                columns: sheet.columns.clone(),
                sample_rows: sheet
                    .rows
                    .iter()
                    .take(sample_limit)
                    .map(|record| record.values().map(|value| value.to_text()).collect())
                    .collect(),
            })
        })
        .collect()
}

/// A natural-language-to-SQL suggestion backend.
pub trait SuggestionService {
    /// Answers a question about the given tables.
    fn suggest(&self, question: &str, tables: &[TableSchema])
        -> Result<Suggestion, SuggestionError>;
}

/// Asks the service, absorbing any failure into a degraded suggestion.
pub fn suggest_or_degraded(
    service: &dyn SuggestionService,
    question: &str,
    tables: &[TableSchema],
) -> Suggestion {
    match service.suggest(question, tables) {
        Ok(suggestion) => suggestion,
        Err(error) => {
            warn!("suggestion service failed: {}", error);
            Suggestion::degraded(format!("The suggestion service is unavailable: {}", error))
        }
    }
}
