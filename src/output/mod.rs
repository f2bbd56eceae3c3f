//! Output sinks for extracted records.
//!
//! Two artifacts are produced per run:
//! - [`TextSink`] — one lightly reformatted record per line, all fields kept
//! - [`CsvSink`] — header plus one row per record, fixed column order
//!
//! Both handles are opened once by [`OutputSinks::create`], written
//! incrementally as records are matched, and flushed at the end of the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use cdrsync::config::ExtractConfig;
//! use cdrsync::output::OutputSinks;
//!
//! # fn main() -> cdrsync::Result<()> {
//! let config = ExtractConfig::new().with_output_dir("parsedlogs");
//! let mut sinks = OutputSinks::create(&config)?;
//! // ... write records ...
//! sinks.flush()?;
//! # Ok(())
//! # }
//! ```

mod csv_writer;
mod text_writer;

pub use csv_writer::CsvSink;
pub use text_writer::TextSink;

use std::fs;

use crate::config::ExtractConfig;
use crate::error::Result;
use crate::record::CdrRecord;

/// The pair of long-lived output handles owned by the extractor.
pub struct OutputSinks {
    /// Plain-text artifact
    pub text: TextSink,
    /// CSV artifact
    pub csv: CsvSink,
}

impl OutputSinks {
    /// Opens both artifacts under the configured output directory,
    /// creating the directory if needed. The CSV header is written
    /// immediately.
    pub fn create(config: &ExtractConfig) -> Result<Self> {
        fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            text: TextSink::open(config.text_path())?,
            csv: CsvSink::open(config.csv_path())?,
        })
    }

    /// Appends one record to both artifacts.
    pub fn write(&mut self, record: &CdrRecord) -> Result<()> {
        self.text.write(record)?;
        self.csv.write(record)?;
        Ok(())
    }

    /// Flushes both artifacts.
    pub fn flush(&mut self) -> Result<()> {
        self.text.flush()?;
        self.csv.flush()?;
        Ok(())
    }
}
