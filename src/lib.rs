//! # cdrsync
//!
//! A small pipeline for retrieving account session logs over FTPS and
//! extracting the Call Detail Records (CDRs) buried in them, emitted as
//! plain text and CSV.
//!
//! ## Overview
//!
//! Two stages, composed linearly:
//!
//! - **Fetch** ([`fetch`]) — connect to the provider's FTP host, list the
//!   account's log files modified within the lookback window, and stage
//!   them locally. Archives are decompressed in place.
//! - **Extract** ([`extract`]) — scan each staged file line by line for CDR
//!   submission lines and append every match to a text artifact and a CSV
//!   artifact.
//!
//! The fetch stage runs to completion before extraction begins; a per-file
//! failure in either stage is reported and skipped, so a run yields partial
//! output rather than none. Only a rejected login or an unreachable host
//! aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdrsync::config::{ExtractConfig, FetchConfig};
//! use cdrsync::fetch::{Fetcher, FtpLogSource};
//! use cdrsync::output::OutputSinks;
//!
//! fn main() -> cdrsync::Result<()> {
//!     let config = FetchConfig::new("ftp.example.com", "operator", "secret");
//!     config.validate()?;
//!
//!     let mut session = FtpLogSource::connect(&config)?;
//!     let report = Fetcher::new(config).sync(&mut session)?;
//!     session.quit();
//!
//!     let extract_config = ExtractConfig::new();
//!     let mut sinks = OutputSinks::create(&extract_config)?;
//!     let stats = cdrsync::extract::extract_files(&report.staged, &mut sinks)?;
//!     println!("{} records extracted", stats.records);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing without a live host
//!
//! All fetch policy (window filter, size-skip, per-file error handling) sits
//! behind the [`fetch::LogSource`] trait; tests drive [`fetch::Fetcher`]
//! with an in-memory implementation instead of a real session.
//!
//! ## Module Structure
//!
//! - [`fetch`] — [`Fetcher`](fetch::Fetcher), [`LogSource`](fetch::LogSource),
//!   [`FtpLogSource`](fetch::FtpLogSource)
//! - [`extract`] — [`scan_line`](extract::scan_line),
//!   [`extract_files`](extract::extract_files)
//! - [`record`] — [`CdrRecord`], the vendor code tables
//! - [`output`] — [`OutputSinks`](output::OutputSinks) (text + CSV)
//! - [`config`] — [`FetchConfig`](config::FetchConfig),
//!   [`ExtractConfig`](config::ExtractConfig)
//! - [`cli`] — clap argument types for the binary
//! - [`error`] — [`CdrSyncError`], [`Result`]

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{CdrSyncError, Result};
pub use record::CdrRecord;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::{ExtractConfig, FetchConfig};
    pub use crate::error::{CdrSyncError, Result};
    pub use crate::extract::{extract_files, scan_line, ExtractReport, LineScan};
    pub use crate::fetch::{Fetcher, FtpLogSource, LogSource, RemoteEntry};
    pub use crate::output::OutputSinks;
    pub use crate::record::CdrRecord;
}
