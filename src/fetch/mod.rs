//! Log file retrieval over FTPS.
//!
//! The fetch stage mirrors the account's remote log files into a local
//! staging directory. Policy lives in [`Fetcher`]; the wire protocol lives
//! behind the [`LogSource`] trait, with [`FtpLogSource`] as the one real
//! implementation. Tests inject an in-memory source instead of a live host.
//!
//! What the sync pass does, in order:
//! 1. list the remote log files (`*.txt` and `*.gz`)
//! 2. keep entries modified within the lookback window — inclusive at the
//!    window start date, exclusive beyond now
//! 3. skip entries already staged locally with the same byte size
//! 4. download the rest, one at a time over the single session; a failed
//!    transfer is logged and skipped, never aborting the remaining files
//! 5. decompress staged `*.gz` archives next to themselves
//!
//! The resulting [`FetchReport::staged`] lists every in-window file that is
//! locally available afterwards, downloaded this run or not, in listing
//! order. That set is what the extractor consumes.

pub mod ftp;

pub use ftp::FtpLogSource;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use flate2::read::GzDecoder;
use log::{info, warn};

use crate::config::FetchConfig;
use crate::error::{CdrSyncError, Result};

/// One remote log file as seen in the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// File name within the remote log directory
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Modification timestamp
    pub modified: DateTime<Utc>,
}

/// Listing and retrieval seam over the FTP session.
///
/// The session is used serially: one listing, then one retrieval at a time.
/// Implementations report per-file retrieval failures as
/// [`CdrSyncError::Download`] so the sync loop can skip and continue.
pub trait LogSource {
    /// Lists the account's log files with size and modification date.
    fn list(&mut self) -> Result<Vec<RemoteEntry>>;

    /// Streams one remote file into `dest`, returning the byte count.
    fn retrieve(&mut self, name: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// Counters and results from one sync pass.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// In-window files locally available after the pass, in listing order.
    /// Archives appear as their decompressed `.txt` path.
    pub staged: Vec<PathBuf>,
    /// Files transferred this pass
    pub downloaded: usize,
    /// Files skipped because the staged copy already has the remote size
    pub skipped_unchanged: usize,
    /// Files that failed to transfer or decompress
    pub failed: usize,
}

/// Mirrors in-window remote log files into the staging directory.
pub struct Fetcher {
    config: FetchConfig,
}

impl Fetcher {
    /// Creates a fetcher for the given configuration.
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Runs one sync pass against the clock's current time.
    ///
    /// Fails only on listing errors (connection-level); per-file transfer
    /// and decompression failures are logged, counted and skipped.
    pub fn sync(&self, source: &mut dyn LogSource) -> Result<FetchReport> {
        self.sync_at(source, Utc::now())
    }

    /// Runs one sync pass treating `now` as the upper window boundary.
    pub fn sync_at(&self, source: &mut dyn LogSource, now: DateTime<Utc>) -> Result<FetchReport> {
        fs::create_dir_all(&self.config.staging_dir)?;

        let entries = source.list()?;
        let mut report = FetchReport::default();

        for entry in entries {
            if !in_window(entry.modified, now, self.config.lookback_days) {
                continue;
            }

            let staged_path = self.config.staging_dir.join(&entry.name);
            if is_unchanged(&staged_path, entry.size) {
                info!("{} unchanged ({} bytes), not downloading", entry.name, entry.size);
                report.skipped_unchanged += 1;
            } else {
                match download_one(source, &entry, &staged_path) {
                    Ok(bytes) => {
                        info!("downloaded {} ({bytes} bytes)", entry.name);
                        report.downloaded += 1;
                    }
                    Err(err) => {
                        warn!("{err}");
                        report.failed += 1;
                        continue;
                    }
                }
            }

            match ready_for_extraction(&staged_path) {
                Ok(path) => report.staged.push(path),
                Err(err) => {
                    warn!("{err}");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

/// Window check: inclusive at the window start date, exclusive beyond `now`.
///
/// The start boundary is compared at day granularity so a file stamped
/// anywhere on the start date is still retrieved.
pub fn in_window(modified: DateTime<Utc>, now: DateTime<Utc>, lookback_days: i64) -> bool {
    let window_start = (now - Duration::days(lookback_days)).date_naive();
    modified.date_naive() >= window_start && modified <= now
}

/// Collects the staged files already on disk, for runs that skip the fetch.
///
/// Decompresses any archives first, then returns the `.txt` logs sorted by
/// name. An archive that fails to decompress is logged and skipped.
pub fn stage_existing(staging_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::new();

    for dir_entry in fs::read_dir(staging_dir)? {
        let path = dir_entry?.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => match decompress_gz(&path) {
                Ok(txt) => staged.push(txt),
                Err(err) => warn!("{err}"),
            },
            Some("txt") => staged.push(path),
            _ => {}
        }
    }

    staged.sort();
    staged.dedup();
    Ok(staged)
}

// The size comparison that decides whether a remote file needs transferring
// again. A missing local file never matches.
fn is_unchanged(staged_path: &Path, remote_size: u64) -> bool {
    fs::metadata(staged_path).is_ok_and(|meta| meta.len() == remote_size)
}

fn download_one(source: &mut dyn LogSource, entry: &RemoteEntry, staged_path: &Path) -> Result<u64> {
    let mut dest = File::create(staged_path)?;
    match source.retrieve(&entry.name, &mut dest) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            // a partial file must not satisfy the size check on the next run
            drop(dest);
            let _ = fs::remove_file(staged_path);
            Err(err)
        }
    }
}

// Returns the path the extractor should read: the file itself for plain
// logs, the decompressed twin for archives.
fn ready_for_extraction(staged_path: &Path) -> Result<PathBuf> {
    if staged_path.extension().and_then(|e| e.to_str()) == Some("gz") {
        decompress_gz(staged_path)
    } else {
        Ok(staged_path.to_path_buf())
    }
}

fn decompress_gz(archive: &Path) -> Result<PathBuf> {
    let target = archive.with_extension("");

    let file = File::open(archive).map_err(|e| CdrSyncError::file_read(archive, e))?;
    let mut decoder = GzDecoder::new(file);
    let mut out = File::create(&target)?;
    io::copy(&mut decoder, &mut out).map_err(|e| CdrSyncError::file_read(archive, e))?;

    Ok(target)
}
