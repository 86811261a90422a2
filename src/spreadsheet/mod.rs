//! # Workbook parsing
//!
//! Turns raw spreadsheet bytes into a normalized in-memory workbook: one
//! matrix per sheet plus the default projection (first row is the header,
//! full extent). Format detection follows the file extension; the container
//! itself is decoded by calamine.

pub mod cell;
pub(crate) mod csv;
pub mod reference;
pub mod sheet;

use crate::spreadsheet::cell::{CellValue, Matrix};
use crate::spreadsheet::sheet::ParsedSheet;
use calamine::{Data, Ods, OdsError, Range, Reader, Xls, XlsError, Xlsb, XlsbError, Xlsx, XlsxError};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Errors raised while decoding a workbook byte stream.
/// Fatal to that upload only; a previously loaded workbook is unaffected.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unrecognized spreadsheet format for '{name}'")]
    UnrecognizedFormat { name: String },

    #[error("Invalid xlsx data: {0}")]
    InvalidXlsx(#[from] XlsxError),

    #[error("Invalid xlsb data: {0}")]
    InvalidXlsb(#[from] XlsbError),

    #[error("Invalid xls data: {0}")]
    InvalidXls(#[from] XlsError),

    #[error("Invalid ods data: {0}")]
    InvalidOds(#[from] OdsError),
}

/// A fully parsed workbook. Replaced wholesale on the next upload.
#[derive(Clone, Debug)]
pub struct ParsedWorkbook {
    /// Name of the uploaded file, used for table naming
    pub file_name: String,
    /// Sheets in workbook order
    pub sheets: Vec<ParsedSheet>,
}

impl ParsedWorkbook {
    /// Finds a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&ParsedSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Names of all sheets in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }
}

/// Parses an in-memory spreadsheet byte buffer into a [`ParsedWorkbook`].
///
/// A sheet with an empty declared extent yields the canonical empty sheet
/// rather than failing the whole workbook.
pub fn parse_workbook(bytes: &[u8], file_name: &str) -> Result<ParsedWorkbook, ParseError> {
    let mut spreadsheet = Spreadsheet::open(bytes, file_name)?;
    let mut sheets = Vec::new();
    for name in spreadsheet.sheet_names() {
        let matrix = spreadsheet.read_matrix(&name)?;
        let sheet = if matrix.is_empty() {
            ParsedSheet::empty(&name)
        } else {
            ParsedSheet::from_matrix(&name, matrix)
        };
        sheets.push(sheet);
    }
    Ok(ParsedWorkbook {
        file_name: file_name.to_owned(),
        sheets,
    })
}

type ByteReader = Cursor<Vec<u8>>;

/// Wrapper enum over the calamine readers for the supported containers.
enum Spreadsheet {
    /// Excel 2007+ format (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<ByteReader>),
    /// Excel Binary format (.xlsb)
    Xlsb(Xlsb<ByteReader>),
    /// Legacy Excel format (.xls, .xla)
    Xls(Xls<ByteReader>),
    /// OpenDocument format (.ods)
    Ods(Ods<ByteReader>),
}

impl Spreadsheet {
    /// Opens an in-memory byte buffer, choosing the reader by file extension.
    fn open(bytes: &[u8], file_name: &str) -> Result<Self, ParseError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_ascii_lowercase());
        let reader = Cursor::new(bytes.to_vec());
        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(Xlsx::new(reader)?)),
            Some("xlsb") => Ok(Self::Xlsb(Xlsb::new(reader)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(Xls::new(reader)?)),
            Some("ods") => Ok(Self::Ods(Ods::new(reader)?)),
            _ => Err(ParseError::UnrecognizedFormat {
                name: file_name.to_owned(),
            }),
        }
    }

    /// Names of all sheets in the container.
    fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Reads one sheet's declared extent as a dense matrix.
    fn read_matrix(&mut self, sheet_name: &str) -> Result<Matrix, ParseError> {
        let range = match self {
            Self::Xlsx(xlsx) => xlsx.worksheet_range(sheet_name)?,
            Self::Xlsb(xlsb) => xlsb.worksheet_range(sheet_name)?,
            Self::Xls(xls) => xls.worksheet_range(sheet_name)?,
            Self::Ods(ods) => ods.worksheet_range(sheet_name)?,
        };
        Ok(matrix_from_range(&range))
    }
}

/// Converts a calamine range into the dense matrix model.
/// The matrix origin is the top-left of the sheet's used extent.
fn matrix_from_range(range: &Range<Data>) -> Matrix {
    if range.is_empty() {
        return Vec::new();
    }
    range
        .rows()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect()
}
