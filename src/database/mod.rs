//! # Analytical engine integration
//!
//! The narrow engine interface, its embedded DuckDB implementation, and the
//! registry that mirrors the current selection into engine tables.

pub mod engine;
pub mod registry;

pub use engine::{AnalyticalEngine, DuckDbEngine, EngineError, QueryResult};
pub use registry::{table_name, RegistrationError, SyncGeneration, SyncOutcome, TableRegistry};
