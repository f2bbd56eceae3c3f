//! Integration tests for the fetch stage, driven through an in-memory
//! [`LogSource`] instead of a live FTP host.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use cdrsync::config::FetchConfig;
use cdrsync::error::{CdrSyncError, Result};
use cdrsync::fetch::{Fetcher, LogSource, RemoteEntry};

// ============================================================================
// Fake source
// ============================================================================

#[derive(Default)]
struct FakeSource {
    entries: Vec<RemoteEntry>,
    contents: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    retrievals: Vec<String>,
}

impl FakeSource {
    fn with_file(mut self, name: &str, modified: DateTime<Utc>, content: &[u8]) -> Self {
        self.entries.push(RemoteEntry {
            name: name.to_string(),
            size: content.len() as u64,
            modified,
        });
        self.contents.insert(name.to_string(), content.to_vec());
        self
    }

    fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl LogSource for FakeSource {
    fn list(&mut self) -> Result<Vec<RemoteEntry>> {
        Ok(self.entries.clone())
    }

    fn retrieve(&mut self, name: &str, dest: &mut dyn Write) -> Result<u64> {
        self.retrievals.push(name.to_string());
        if self.failing.contains(name) {
            // a few bytes make it out before the transfer dies
            dest.write_all(b"part").unwrap();
            return Err(CdrSyncError::download(name, suppaftp::FtpError::BadResponse));
        }
        let content = &self.contents[name];
        dest.write_all(content).unwrap();
        Ok(content.len() as u64)
    }
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn config(staging: &std::path::Path) -> FetchConfig {
    FetchConfig::new("ftp.example.com", "operator", "pw").with_staging_dir(staging)
}

fn gzip(content: &[u8]) -> Vec<u8> {
    use flate2::{write::GzEncoder, Compression};
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap()
}

// ============================================================================
// Window filtering
// ============================================================================

#[test]
fn file_on_window_start_date_is_included_one_day_earlier_is_not() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    // 60 days back from 2014-08-30 is 2014-07-01
    let mut source = FakeSource::default()
        .with_file("boundary.txt", at(2014, 7, 1), b"on the boundary")
        .with_file("stale.txt", at(2014, 6, 30), b"too old");

    let report = Fetcher::new(config(dir.path()))
        .sync_at(&mut source, now)
        .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.staged, vec![dir.path().join("boundary.txt")]);
    assert!(!dir.path().join("stale.txt").exists());
}

#[test]
fn shorter_window_narrows_the_set() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    let mut source = FakeSource::default()
        .with_file("recent.txt", at(2014, 8, 28), b"recent")
        .with_file("older.txt", at(2014, 8, 1), b"older");

    let fetcher = Fetcher::new(config(dir.path()).with_lookback_days(7));
    let report = fetcher.sync_at(&mut source, now).unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.staged, vec![dir.path().join("recent.txt")]);
}

// ============================================================================
// Per-file failure isolation
// ============================================================================

#[test]
fn failed_download_skips_that_file_only() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    let mut source = FakeSource::default()
        .with_file("one.txt", at(2014, 8, 1), b"first")
        .with_file("two.txt", at(2014, 8, 2), b"second")
        .with_file("three.txt", at(2014, 8, 3), b"third")
        .failing_on("two.txt");

    let report = Fetcher::new(config(dir.path()))
        .sync_at(&mut source, now)
        .unwrap();

    assert_eq!(report.downloaded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(
        report.staged,
        vec![dir.path().join("one.txt"), dir.path().join("three.txt")]
    );
}

#[test]
fn failed_download_leaves_no_partial_file() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    let mut source = FakeSource::default()
        .with_file("broken.txt", at(2014, 8, 1), b"will not arrive")
        .failing_on("broken.txt");

    let report = Fetcher::new(config(dir.path()))
        .sync_at(&mut source, now)
        .unwrap();

    assert_eq!(report.failed, 1);
    // otherwise the next run's size check could mistake it for complete
    assert!(!dir.path().join("broken.txt").exists());
}

// ============================================================================
// Size-skip
// ============================================================================

#[test]
fn unchanged_staged_file_is_not_downloaded_again() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    std::fs::write(dir.path().join("same.txt"), b"already here").unwrap();

    let mut source =
        FakeSource::default().with_file("same.txt", at(2014, 8, 1), b"already here");
    let report = Fetcher::new(config(dir.path()))
        .sync_at(&mut source, now)
        .unwrap();

    assert_eq!(report.downloaded, 0);
    assert_eq!(report.skipped_unchanged, 1);
    assert!(source.retrievals.is_empty());
    // the file still reaches the extractor
    assert_eq!(report.staged, vec![dir.path().join("same.txt")]);
}

#[test]
fn changed_size_forces_a_fresh_download() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    std::fs::write(dir.path().join("grown.txt"), b"old").unwrap();

    let mut source =
        FakeSource::default().with_file("grown.txt", at(2014, 8, 1), b"old plus appended lines");
    let report = Fetcher::new(config(dir.path()))
        .sync_at(&mut source, now)
        .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.skipped_unchanged, 0);
    let staged = std::fs::read_to_string(dir.path().join("grown.txt")).unwrap();
    assert_eq!(staged, "old plus appended lines");
}

// ============================================================================
// Archives
// ============================================================================

#[test]
fn gzipped_log_is_staged_decompressed() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    let archived = gzip(b"log line one\nlog line two\n");
    let mut source = FakeSource::default().with_file("20140801.txt.gz", at(2014, 8, 1), &archived);

    let report = Fetcher::new(config(dir.path()))
        .sync_at(&mut source, now)
        .unwrap();

    assert_eq!(report.staged, vec![dir.path().join("20140801.txt")]);
    let staged = std::fs::read_to_string(dir.path().join("20140801.txt")).unwrap();
    assert_eq!(staged, "log line one\nlog line two\n");
    // the archive itself stays for the next run's size check
    assert!(dir.path().join("20140801.txt.gz").exists());
}

#[test]
fn listing_order_is_preserved_in_staged_set() {
    let dir = tempdir().unwrap();
    let now = at(2014, 8, 30);
    let mut source = FakeSource::default()
        .with_file("z_first.txt", at(2014, 8, 1), b"z")
        .with_file("a_second.txt", at(2014, 8, 2), b"a");

    let report = Fetcher::new(config(dir.path()))
        .sync_at(&mut source, now)
        .unwrap();

    let names: Vec<PathBuf> = report.staged;
    assert_eq!(
        names,
        vec![dir.path().join("z_first.txt"), dir.path().join("a_second.txt")]
    );
}
