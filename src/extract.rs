//! CDR extraction from staged log files.
//!
//! The account session logs are verbose: most lines are request traces,
//! scripting output and provider chatter. A CDR is carried on a single line
//! containing the marker
//!
//! ```text
//! ... Submitting CDR [text={"call":{"Caller":"+1555...","StatusCode":0,...}}]
//! ```
//!
//! [`scan_line`] recognizes the marker and decodes the JSON payload into a
//! [`CdrRecord`]. Lines without the marker are skipped silently; lines with
//! the marker but a truncated or unparsable payload are dropped and counted,
//! never partially emitted.
//!
//! [`extract_files`] drives the scan over a batch of staged files, appending
//! every record to both output sinks in the order encountered. A file that
//! cannot be read is reported and skipped; it does not abort the batch.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::error::{CdrSyncError, Result};
use crate::output::OutputSinks;
use crate::record::CdrRecord;

/// Marker identifying a CDR submission line in the session logs.
pub const CDR_MARKER: &str = "Submitting CDR [text=";

/// Outcome of scanning a single log line.
#[derive(Debug)]
pub enum LineScan {
    /// The line carried a well-formed CDR payload.
    Record(Box<CdrRecord>),
    /// The line carried the CDR marker but the payload did not decode.
    Malformed,
    /// Ordinary log content; not a CDR line.
    Skip,
}

// The JSON payload wraps the record in a "call" member.
#[derive(Debug, Deserialize)]
struct CdrEnvelope {
    call: CdrRecord,
}

/// Scans one log line for a CDR.
///
/// The payload runs from just after the marker to the closing `]` at the end
/// of the line. Missing closer, bad JSON, or a payload without the `call`
/// member all count as malformed.
pub fn scan_line(line: &str) -> LineScan {
    let Some(at) = line.find(CDR_MARKER) else {
        return LineScan::Skip;
    };

    let payload = line[at + CDR_MARKER.len()..].trim_end();
    let Some(payload) = payload.strip_suffix(']') else {
        return LineScan::Malformed;
    };

    match serde_json::from_str::<CdrEnvelope>(payload) {
        Ok(envelope) => LineScan::Record(Box::new(envelope.call)),
        Err(err) => {
            debug!("dropping malformed CDR payload: {err}");
            LineScan::Malformed
        }
    }
}

/// Scans one log line, returning the record if it is a well-formed CDR.
pub fn parse_line(line: &str) -> Option<CdrRecord> {
    match scan_line(line) {
        LineScan::Record(record) => Some(*record),
        _ => None,
    }
}

/// Counters describing one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Files fully scanned
    pub files_processed: usize,
    /// Files skipped because they could not be read
    pub files_skipped: usize,
    /// Records appended to both sinks
    pub records: usize,
    /// Marker lines dropped because the payload did not decode
    pub malformed: usize,
}

/// Scans each staged file in order and appends every recognized CDR to both
/// sinks.
///
/// Per-file read failures (missing file, non-UTF-8 content) are logged and
/// skipped. Sink write failures are fatal and propagate. The sinks are
/// flushed before returning.
pub fn extract_files(files: &[PathBuf], sinks: &mut OutputSinks) -> Result<ExtractReport> {
    let mut report = ExtractReport::default();

    for path in files {
        match extract_file(path, sinks, &mut report) {
            Ok(()) => report.files_processed += 1,
            Err(err) if !err.is_fatal() => {
                warn!("{err}");
                report.files_skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    sinks.flush()?;
    Ok(report)
}

fn extract_file(path: &Path, sinks: &mut OutputSinks, report: &mut ExtractReport) -> Result<()> {
    let file = File::open(path).map_err(|e| CdrSyncError::file_read(path, e))?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.map_err(|e| CdrSyncError::file_read(path, e))?;
        match scan_line(&line) {
            LineScan::Record(record) => {
                sinks.write(&record)?;
                report.records += 1;
            }
            LineScan::Malformed => report.malformed += 1,
            LineScan::Skip => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_LINE: &str = concat!(
        "2014-06-20 17:44:45,123 INFO pool-1 Submitting CDR [text=",
        r#"{"call":{"Caller":"+14155550100","Called":"+14155550111","StatusCode":0}}"#,
        "]"
    );

    #[test]
    fn test_scan_ordinary_line_skips() {
        assert!(matches!(
            scan_line("2014-06-20 17:44:45 DEBUG handling request"),
            LineScan::Skip
        ));
        assert!(matches!(scan_line(""), LineScan::Skip));
    }

    #[test]
    fn test_scan_good_line_yields_record() {
        let LineScan::Record(record) = scan_line(GOOD_LINE) else {
            panic!("expected a record");
        };
        assert_eq!(record.caller.as_deref(), Some("+14155550100"));
        assert_eq!(record.status_code, Some(0));
    }

    #[test]
    fn test_scan_truncated_payload_is_malformed() {
        // closing bracket lost, e.g. log rotation mid-line
        let truncated = r#"x Submitting CDR [text={"call":{"Caller":"+1""#;
        assert!(matches!(scan_line(truncated), LineScan::Malformed));
    }

    #[test]
    fn test_scan_non_json_payload_is_malformed() {
        let junk = "x Submitting CDR [text=not json at all]";
        assert!(matches!(scan_line(junk), LineScan::Malformed));
    }

    #[test]
    fn test_scan_missing_call_member_is_malformed() {
        let no_call = r#"x Submitting CDR [text={"sms":{"Caller":"+1"}}]"#;
        assert!(matches!(scan_line(no_call), LineScan::Malformed));
    }

    #[test]
    fn test_scan_trailing_whitespace_tolerated() {
        let line = format!("{GOOD_LINE}   \r");
        assert!(matches!(scan_line(&line), LineScan::Record(_)));
    }

    #[test]
    fn test_parse_line_filters_non_records() {
        assert!(parse_line(GOOD_LINE).is_some());
        assert!(parse_line("nothing here").is_none());
        assert!(parse_line("x Submitting CDR [text=oops]").is_none());
    }
}
