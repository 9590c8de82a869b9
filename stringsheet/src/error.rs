//! All error types for the stringsheet crate.
//!
//! These are returned from every fallible operation: reading resource trees,
//! reading and writing spreadsheets, projecting tables and loading config.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet read error: {0}")]
    SheetRead(#[from] calamine::Error),

    #[error("spreadsheet write error: {0}")]
    SheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document or spreadsheet lacks an element every reader relies on
    /// (root element, header row, first sheet).
    #[error("structural error in {}: {reason}", path.display())]
    StructuralRead { path: PathBuf, reason: String },

    /// The grid handed to the table projector is not a valid table.
    /// `row` and `column` are zero-based grid coordinates.
    #[error("malformed table at row {row}, column {column}: {reason}")]
    MalformedTable {
        row: usize,
        column: usize,
        reason: String,
    },

    /// A spreadsheet cell holds a value type that cannot be read as text.
    #[error("unsupported cell type `{kind}` at row {row}, column {column}")]
    UnsupportedCellType {
        row: usize,
        column: usize,
        kind: String,
    },

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a structural read error for the given file.
    pub fn structural(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::StructuralRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed table error at the given grid position.
    pub fn malformed_table(row: usize, column: usize, reason: impl Into<String>) -> Self {
        Error::MalformedTable {
            row,
            column,
            reason: reason.into(),
        }
    }
}
