use crate::chat::SuggestionError;
use crate::database::engine::EngineError;
use crate::database::registry::RegistrationError;
use crate::selection::range::RangeError;
use crate::session::SessionError;
use crate::spreadsheet::ParseError;
use thiserror::Error;

/// Main error type for the gridquery pipeline.
/// Aggregates errors from every stage so top-level callers surface a single
/// human-readable message.
#[derive(Error, Debug)]
pub enum GridQueryError {
    #[error("{0}")]
    ParseError(#[from] ParseError),

    #[error("{0}")]
    RangeError(#[from] RangeError),

    #[error("{0}")]
    EngineError(#[from] EngineError),

    #[error("{0}")]
    RegistrationError(#[from] RegistrationError),

    #[error("{0}")]
    SuggestionError(#[from] SuggestionError),

    #[error("{0}")]
    SessionError(#[from] SessionError),
}
