//! CSV output sink.

use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::record::{CdrRecord, COLUMNS};

/// Writes records to CSV, one row per record.
///
/// # Format
/// - Delimiter: `,`
/// - First row: header naming the [`COLUMNS`]
/// - Fields containing the delimiter, quotes or newlines are quoted per
///   standard CSV rules (RFC 4180 via the `csv` crate)
/// - Encoding: UTF-8
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Creates the CSV artifact and writes the header row.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new().from_writer(file);
        writer.write_record(COLUMNS)?;
        Ok(Self { writer })
    }

    /// Appends one record as a row.
    pub fn write(&mut self, record: &CdrRecord) -> Result<()> {
        self.writer.write_record(record.csv_fields())?;
        Ok(())
    }

    /// Flushes buffered rows to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_header_matches_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::open(&path).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn test_reserved_characters_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let record: CdrRecord = serde_json::from_value(json!({
            "Caller": "+1555",
            "MessageBody": "hello, \"world\"\nsecond line"
        }))
        .unwrap();

        let mut sink = CsvSink::open(&path).unwrap();
        sink.write(&record).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        // the body cell is quoted, with inner quotes doubled
        assert!(content.contains("\"hello, \"\"world\"\"\nsecond line\""));
    }

    #[test]
    fn test_row_cell_count_is_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let record: CdrRecord = serde_json::from_value(json!({"Caller": "x"})).unwrap();

        let mut sink = CsvSink::open(&path).unwrap();
        sink.write(&record).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row.split(',').count(), COLUMNS.len());
    }
}
