//! Support for a table stored as a single CSV file.
//!
//! The layout is the same as a spreadsheet sheet: the first record is the
//! header, the first field of every later record is the string name.
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    table::{Cell, Table},
    traits::TextFormat,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub records: Vec<Vec<String>>,
}

impl Format {
    /// Cells for [`Table::from_grid`]; empty fields read as [`Cell::Empty`].
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field.clone())
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl From<&Table> for Format {
    fn from(table: &Table) -> Self {
        Self {
            records: table.to_grid(),
        }
    }
}

impl TextFormat for Format {
    /// Parse from any reader. Records may have different lengths.
    fn parse<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { records })
    }

    /// Write to any writer (file, memory, etc.).
    fn render<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        for record in &self.records {
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
