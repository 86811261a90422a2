//! Canonical CSV serialization for projected sheets.
//!
//! The header row comes first, then every record in column order. Fields are
//! comma-separated and only quoted when they contain a comma, a quote, or a
//! newline; blank cells serialize as empty fields; date-typed values use
//! their ISO-8601 string forms.

use crate::spreadsheet::sheet::Record;

/// Serializes columns and records to CSV text.
/// A sheet with no columns yields the empty string.
pub(crate) fn write_csv(columns: &[String], rows: &[Record]) -> String {
    if columns.is_empty() {
        return String::new();
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns).expect("write csv header to memory");
    for record in rows {
        let fields = columns
            .iter()
            .enumerate()
            .map(|(index, column)| record.value_at(column, index).to_text());
        writer.write_record(fields).expect("write csv record to memory");
    }
    let bytes = writer.into_inner().expect("flush csv to memory");
    String::from_utf8(bytes).expect("csv text is utf-8")
}
