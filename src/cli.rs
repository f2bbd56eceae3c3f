//! Command-line interface definition using clap.
//!
//! The CLI is thin glue: it collects the host, credentials and directories,
//! builds the library configuration types, and hands them to the pipeline.
//! The FTP password is never taken as an argument; it comes from the
//! [`PASSWORD_ENV`] environment variable (a `.env` file is honored).

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_FTP_PORT, DEFAULT_LOOKBACK_DAYS};

/// Environment variable the FTP password is read from.
pub const PASSWORD_ENV: &str = "CDR_FTP_PASSWORD";

/// Fetch account logs over FTPS and extract call detail records
/// to text and CSV.
#[derive(Parser, Debug, Clone)]
#[command(name = "cdrsync")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    CDR_FTP_PASSWORD=... cdrsync --host ftp.example.com --username operator
    cdrsync --host ftp.example.com -u operator --lookback 30 -o reports
    cdrsync --offline --staging-dir workinglogs -o reports

The FTP password is read from the CDR_FTP_PASSWORD environment variable.")]
pub struct Args {
    /// FTP host to retrieve account logs from
    #[arg(long, required_unless_present = "offline")]
    pub host: Option<String>,

    /// FTP account username
    #[arg(short, long, required_unless_present = "offline")]
    pub username: Option<String>,

    /// FTP control port
    #[arg(long, default_value_t = DEFAULT_FTP_PORT)]
    pub port: u16,

    /// Remote directory holding the account's log files
    #[arg(long, default_value = "logs")]
    pub remote_dir: String,

    /// Only retrieve logs modified within this many trailing days
    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_LOOKBACK_DAYS)]
    pub lookback: i64,

    /// Local directory downloaded logs are staged into
    #[arg(long, default_value = "workinglogs")]
    pub staging_dir: PathBuf,

    /// Directory the text and CSV artifacts are written into
    #[arg(short, long, default_value = "parsedlogs")]
    pub output_dir: PathBuf,

    /// Skip the FTP fetch and extract whatever is already staged
    #[arg(long)]
    pub offline: bool,

    /// Increase log verbosity (use -d for info, -dd for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,
}
