//! Document and spreadsheet formats.
//!
//! `android_strings` is the per-locale resource document. `xlsx` and `csv`
//! are the two spreadsheet renditions of a [`Table`]; [`SheetFormat`] picks
//! one from a file extension.

pub mod android_strings;
pub mod csv;
pub mod xlsx;

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    table::{Cell, Table},
    traits::TextFormat,
};

pub use android_strings::Format as AndroidStringsFormat;
pub use csv::Format as CsvFormat;

/// A named table, written as one spreadsheet sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

impl Sheet {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// An Excel workbook holding one sheet per module.
    Xlsx,
    /// One CSV file per sheet.
    Csv,
}

impl SheetFormat {
    /// Infers the format from the file extension (case-insensitive).
    /// `xls`, `xlsm`, `xlsb` and `ods` are accepted for reading only.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SheetFormat::Xlsx),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(Error::UnsupportedFormat(format!(
                "cannot infer spreadsheet format from `{}`",
                path.display()
            ))),
        }
    }
}

impl Display for SheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetFormat::Xlsx => write!(f, "xlsx"),
            SheetFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Reads the first (for CSV: the only) sheet of a spreadsheet as raw cells.
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Cell>>, Error> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::structural(path, "spreadsheet file not found"));
    }
    match SheetFormat::from_path(path)? {
        SheetFormat::Xlsx => Ok(xlsx::read_first_sheet(path)?.1),
        SheetFormat::Csv => Ok(CsvFormat::read_file(path)?.to_cells()),
    }
}

/// Writes sheets to `path`, creating parent directories as needed.
///
/// An xlsx target receives one workbook with every sheet. A CSV target
/// receives one file per sheet named `<stem>.<sheet>.csv` beside `path`.
/// Returns the files written.
pub fn write_sheets<P: AsRef<Path>>(path: P, sheets: &[Sheet]) -> Result<Vec<PathBuf>, Error> {
    let path = path.as_ref();
    let format = SheetFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        SheetFormat::Xlsx => {
            if !matches!(
                path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
                Some("xlsx")
            ) {
                return Err(Error::UnsupportedFormat(format!(
                    "only .xlsx workbooks can be written, got `{}`",
                    path.display()
                )));
            }
            xlsx::write_sheets(path, sheets)?;
            Ok(vec![path.to_path_buf()])
        }
        SheetFormat::Csv => sheets
            .iter()
            .map(|sheet| {
                let target = csv_sheet_path(path, &sheet.name);
                CsvFormat::from(&sheet.table).write_file(&target)?;
                Ok(target)
            })
            .collect(),
    }
}

/// `out/strings.csv` + `app` → `out/strings.app.csv`.
pub fn csv_sheet_path(path: &Path, sheet_name: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet");
    path.with_file_name(format!("{stem}.{sheet_name}.csv"))
}
