//! The read/write seam shared by the text-based formats (`strings.xml`, CSV).

use std::{
    fs,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::Error;

/// A file format that is decoded from and rendered to a byte stream.
///
/// ```rust,no_run
/// use stringsheet::traits::TextFormat;
/// use stringsheet::formats::AndroidStringsFormat;
///
/// let document = AndroidStringsFormat::read_file("res/values/strings.xml")?;
/// document.write_file("res/values-fr/strings.xml")?;
/// # Ok::<(), stringsheet::Error>(())
/// ```
pub trait TextFormat: Sized {
    fn parse<R: BufRead>(reader: R) -> Result<Self, Error>;

    fn render<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Reads a file. A UTF-8 or UTF-16 byte order mark selects the
    /// encoding; without one the bytes are taken as UTF-8.
    fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding_rs::UTF_8))
            .bom_override(true)
            .build(fs::File::open(path)?);
        Self::parse(BufReader::new(decoder))
    }

    fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut out = io::BufWriter::new(fs::File::create(path)?);
        self.render(&mut out)?;
        out.flush()?;
        Ok(())
    }

    fn parse_str(text: &str) -> Result<Self, Error> {
        Self::parse(text.as_bytes())
    }
}
