//! Analytical engine interface and its embedded DuckDB implementation.
//!
//! The pipeline reaches the engine only through [`AnalyticalEngine`]:
//! register a CSV payload as a table, drop a table, run a query. Identifiers
//! are always double-quoted on use, so sanitized table names can never
//! collide with reserved words.

use chrono::NaiveDate;
use duckdb::types::{TimeUnit, Value};
use duckdb::Connection;
use log::debug;
use once_cell::sync::Lazy;
use std::io::Write;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised by engine connect/execute calls.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Database(#[from] duckdb::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Engine connection lock poisoned")]
    LockPoisoned,
}

/// Result of an ad hoc query: column names plus rows of nullable text values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// The narrow interface the pipeline uses to talk to the analytical engine.
pub trait AnalyticalEngine {
    /// Creates or replaces a table from CSV text with a header row.
    fn register_table(&self, name: &str, csv_text: &str) -> Result<(), EngineError>;

    /// Drops a table. Idempotent: dropping an absent table is a no-op.
    fn drop_table(&self, name: &str) -> Result<(), EngineError>;

    /// Runs a query and collects the full result set.
    fn query(&self, sql: &str) -> Result<QueryResult, EngineError>;
}

impl<E: AnalyticalEngine + ?Sized> AnalyticalEngine for Arc<E> {
    fn register_table(&self, name: &str, csv_text: &str) -> Result<(), EngineError> {
        (**self).register_table(name, csv_text)
    }

    fn drop_table(&self, name: &str) -> Result<(), EngineError> {
        (**self).drop_table(name)
    }

    fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        (**self).query(sql)
    }
}

/// An in-process DuckDB connection.
pub struct DuckDbEngine {
    connection: Mutex<Connection>,
}

static SHARED_ENGINE: Lazy<Mutex<Option<Arc<DuckDbEngine>>>> = Lazy::new(|| Mutex::new(None));

impl DuckDbEngine {
    /// Opens a private in-memory engine.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        Ok(DuckDbEngine {
            connection: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Returns the process-wide engine, starting it on first use.
    /// Concurrent first uses share one initialization.
    pub fn shared() -> Result<Arc<DuckDbEngine>, EngineError> {
        let mut guard = SHARED_ENGINE.lock().map_err(|_| EngineError::LockPoisoned)?;
        if let Some(engine) = guard.as_ref() {
            return Ok(Arc::clone(engine));
        }
        debug!("starting shared analytical engine");
        let engine = Arc::new(DuckDbEngine::open_in_memory()?);
        *guard = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Tears down the process-wide engine. The next [`shared`](Self::shared)
    /// call starts a fresh one.
    pub fn shutdown() {
        if let Ok(mut guard) = SHARED_ENGINE.lock() {
            *guard = None;
        }
    }

    fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, EngineError> {
        self.connection.lock().map_err(|_| EngineError::LockPoisoned)
    }
}

impl AnalyticalEngine for DuckDbEngine {
    /// Ingests the CSV through a temporary file, the engine's native
    /// CSV-with-header path, with create-or-replace semantics.
    fn register_table(&self, name: &str, csv_text: &str) -> Result<(), EngineError> {
        let mut file = tempfile::Builder::new()
            .prefix("gridquery-")
            .suffix(".csv")
            .tempfile()?;
        file.write_all(csv_text.as_bytes())?;
        file.flush()?;
        let path = file.path().to_string_lossy().into_owned();

        let sql = format!(
            "CREATE OR REPLACE TABLE {} AS SELECT * FROM read_csv({}, header = true)",
            quote_identifier(name),
            quote_literal(&path),
        );
        debug!("registering table {}", name);
        self.connection()?.execute_batch(&sql)?;
        Ok(())
    }

    fn drop_table(&self, name: &str) -> Result<(), EngineError> {
        let sql = format!("DROP TABLE IF EXISTS {}", quote_identifier(name));
        self.connection()?.execute_batch(&sql)?;
        Ok(())
    }

    fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare(sql)?;
        let mut records: Vec<Vec<Option<String>>> = Vec::new();
        {
            let mut rows = statement.query([])?;
            while let Some(row) = rows.next()? {
                let width = row.as_ref().column_count();
                let mut record = Vec::with_capacity(width);
                for index in 0..width {
                    record.push(value_to_text(row.get::<_, Value>(index)?));
                }
                records.push(record);
            }
        }
        let columns = statement
            .column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        Ok(QueryResult {
            columns,
            rows: records,
        })
    }
}

/// Double-quotes an identifier for the engine.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quotes a string literal for the engine.
fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Renders an engine value as text; None is SQL NULL.
/// Date-typed values use their ISO-8601 string forms.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Boolean(value) => Some(value.to_string()),
        Value::TinyInt(value) => Some(value.to_string()),
        Value::SmallInt(value) => Some(value.to_string()),
        Value::Int(value) => Some(value.to_string()),
        Value::BigInt(value) => Some(value.to_string()),
        Value::HugeInt(value) => Some(value.to_string()),
        Value::UTinyInt(value) => Some(value.to_string()),
        Value::USmallInt(value) => Some(value.to_string()),
        Value::UInt(value) => Some(value.to_string()),
        Value::UBigInt(value) => Some(value.to_string()),
        Value::Float(value) => Some(value.to_string()),
        Value::Double(value) => Some(value.to_string()),
        Value::Decimal(value) => Some(value.to_string()),
        Value::Text(value) => Some(value),
        Value::Date32(days) => Some(
            (NaiveDate::from_ymd_opt(1970, 1, 1).expect("Epoch literal")
                + chrono::Duration::days(days as i64))
            .format("%Y-%m-%d")
            .to_string(),
        ),
        Value::Timestamp(unit, value) => {
            let micros = unit_to_micros(&unit, value);
            chrono::DateTime::from_timestamp_micros(micros)
                .map(|datetime| datetime.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
                .or(Some(value.to_string()))
        }
        Value::Time64(unit, value) => {
            let micros = unit_to_micros(&unit, value);
            let seconds = (micros / 1_000_000) as u32;
            let nanos = ((micros % 1_000_000) * 1_000) as u32;
            chrono::NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
                .map(|time| time.format("%H:%M:%S").to_string())
                .or(Some(value.to_string()))
        }
        other => Some(format!("{:?}", other)),
    }
}

/// Converts a counted time value to microseconds.
fn unit_to_micros(unit: &TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value * 1_000_000,
        TimeUnit::Millisecond => value * 1_000,
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}
