//! Plain-text output sink.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::record::CdrRecord;

/// Writes records as human-readable text, one per line.
///
/// Each line is the record's creation date followed by the labeled fields as
/// a JSON object (see [`CdrRecord::text_line`]). Every field present in the
/// record is preserved.
pub struct TextSink {
    writer: BufWriter<File>,
}

impl TextSink {
    /// Creates the text artifact.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Appends one record line.
    pub fn write(&mut self, record: &CdrRecord) -> Result<()> {
        let line = record.text_line()?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Flushes buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
