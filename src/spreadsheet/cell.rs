//! Cell value model shared by the parser and the selection applier.
//!
//! Values keep their source type: numbers stay numeric, dates stay dates, and
//! blank cells are an explicit [`CellValue::Null`] rather than an empty string.

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Display;

/// A single cell value from a spreadsheet grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Blank or missing cell
    #[default]
    Null,
    /// Boolean values (true/false)
    Bool(bool),
    /// Integer numbers
    Int(i64),
    /// Floating point numbers
    Float(f64),
    /// String values
    Text(String),
    /// Date without time component
    Date(NaiveDate),
    /// Time without date component
    Time(NaiveTime),
    /// Combined date and time
    DateTime(NaiveDateTime),
}

/// A sheet's raw position-indexed grid, header row included.
pub type Matrix = Vec<Vec<CellValue>>;

impl CellValue {
    /// Returns true if the cell is blank.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the canonical string form used for headers and CSV fields.
    /// Null becomes the empty string; date-typed values use ISO-8601.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(value) => write!(f, "{}", value),
            CellValue::Int(value) => write!(f, "{}", value),
            CellValue::Float(value) => write!(f, "{}", value),
            CellValue::Text(value) => write!(f, "{}", value),
            CellValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            CellValue::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
            CellValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<&Data> for CellValue {
    /// Converts a calamine cell into the crate's value model.
    ///
    /// Serial date/time numbers are split into Date, Time, or DateTime the
    /// same way the sheet readers classify them: a value below one day is a
    /// time, an integral value is a date, anything else is a full datetime.
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Null,
            Data::Bool(value) => CellValue::Bool(*value),
            Data::Int(value) => CellValue::Int(*value),
            Data::Float(value) => CellValue::Float(*value),
            Data::String(value) => CellValue::Text(value.to_owned()),
            Data::DateTime(value) => {
                let serial = value.as_f64();
                match value.as_datetime() {
                    Some(datetime) if serial < 1.0 => CellValue::Time(datetime.time()),
                    Some(datetime) if serial.fract() == 0.0 => CellValue::Date(datetime.date()),
                    Some(datetime) => CellValue::DateTime(datetime),
                    None => CellValue::Float(serial),
                }
            }
            Data::DateTimeIso(value) => {
                if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
                    CellValue::DateTime(datetime)
                } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                    CellValue::Date(date)
                } else {
                    CellValue::Text(value.to_owned())
                }
            }
            // Durations and error cells keep their display text
            Data::DurationIso(value) => CellValue::Text(value.to_owned()),
            Data::Error(value) => CellValue::Text(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_empty_text() {
        assert!(CellValue::Null.is_null());
        assert_eq!(CellValue::Null.to_text(), "");
    }

    #[test]
    fn numbers_keep_their_shape() {
        assert_eq!(CellValue::Int(30).to_text(), "30");
        assert_eq!(CellValue::Float(30.0).to_text(), "30");
        assert_eq!(CellValue::Float(2.5).to_text(), "2.5");
    }

    #[test]
    fn dates_format_as_iso_8601() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CellValue::Date(date).to_text(), "2024-03-09");
        let datetime = date.and_hms_opt(13, 30, 5).unwrap();
        assert_eq!(CellValue::DateTime(datetime).to_text(), "2024-03-09T13:30:05");
        let time = NaiveTime::from_hms_opt(8, 0, 59).unwrap();
        assert_eq!(CellValue::Time(time).to_text(), "08:00:59");
    }

    #[test]
    fn calamine_scalars_convert() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Null);
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(CellValue::from(&Data::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(
            CellValue::from(&Data::String("Ann".to_owned())),
            CellValue::Text("Ann".to_owned())
        );
    }

    #[test]
    fn iso_strings_convert_to_dates() {
        assert_eq!(
            CellValue::from(&Data::DateTimeIso("2024-03-09T13:30:05".to_owned())),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(13, 30, 5).unwrap()
            )
        );
        assert_eq!(
            CellValue::from(&Data::DateTimeIso("2024-03-09".to_owned())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
        );
        assert_eq!(
            CellValue::from(&Data::DateTimeIso("not a date".to_owned())),
            CellValue::Text("not a date".to_owned())
        );
    }
}
