//! Configuration types for the fetch and extract stages.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. The binary builds them from
//! parsed arguments; tests build them directly.
//!
//! # Example
//!
//! ```rust
//! use cdrsync::config::FetchConfig;
//!
//! let config = FetchConfig::new("ftp.example.com", "operator", "secret")
//!     .with_lookback_days(30)
//!     .with_staging_dir("workinglogs");
//!
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use crate::error::{CdrSyncError, Result};

/// Default trailing window of log modification dates to retrieve.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 60;

/// Default FTP control port.
pub const DEFAULT_FTP_PORT: u16 = 21;

/// Settings for the FTPS fetch stage.
///
/// Credentials are opaque inputs here; how they are obtained is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// FTP host name
    pub host: String,

    /// FTP control port (default: 21)
    pub port: u16,

    /// Account username
    pub username: String,

    /// Account password
    pub password: String,

    /// Remote directory holding the account's log files (default: "logs")
    pub remote_dir: String,

    /// Trailing window, in days, of modification dates to retrieve
    /// (default: 60). The window start date is inclusive.
    pub lookback_days: i64,

    /// Local directory log files are staged into (default: "workinglogs")
    pub staging_dir: PathBuf,
}

impl FetchConfig {
    /// Creates a configuration with default port, remote directory, window
    /// and staging directory.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_FTP_PORT,
            username: username.into(),
            password: password.into(),
            remote_dir: "logs".to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            staging_dir: PathBuf::from("workinglogs"),
        }
    }

    /// Sets the FTP control port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the remote log directory.
    #[must_use]
    pub fn with_remote_dir(mut self, dir: impl Into<String>) -> Self {
        self.remote_dir = dir.into();
        self
    }

    /// Sets the lookback window in days.
    #[must_use]
    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Sets the local staging directory.
    #[must_use]
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Checks the configuration before any connection is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(CdrSyncError::invalid_config("host must not be empty"));
        }
        if self.username.trim().is_empty() {
            return Err(CdrSyncError::invalid_config("username must not be empty"));
        }
        if self.password.is_empty() {
            return Err(CdrSyncError::invalid_config("password must not be empty"));
        }
        if self.lookback_days < 1 {
            return Err(CdrSyncError::invalid_config(
                "lookback window must be at least one day",
            ));
        }
        Ok(())
    }
}

/// Settings for the extract stage.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Directory the two output artifacts are written into
    /// (default: "parsedlogs")
    pub output_dir: PathBuf,

    /// Name of the plain-text artifact (default: "cdrs.txt")
    pub text_name: String,

    /// Name of the CSV artifact (default: "cdrs.csv")
    pub csv_name: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("parsedlogs"),
            text_name: "cdrs.txt".to_string(),
            csv_name: "cdrs.csv".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Full path of the text artifact.
    pub fn text_path(&self) -> PathBuf {
        self.output_dir.join(&self.text_name)
    }

    /// Full path of the CSV artifact.
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::new("ftp.example.com", "user", "pw");
        assert_eq!(config.port, DEFAULT_FTP_PORT);
        assert_eq!(config.remote_dir, "logs");
        assert_eq!(config.lookback_days, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = FetchConfig::new("h", "u", "p")
            .with_port(2121)
            .with_remote_dir("account/logs")
            .with_lookback_days(7)
            .with_staging_dir("/tmp/stage");
        assert_eq!(config.port, 2121);
        assert_eq!(config.remote_dir, "account/logs");
        assert_eq!(config.lookback_days, 7);
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/stage"));
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let config = FetchConfig::new("  ", "u", "p");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        assert!(FetchConfig::new("h", "", "p").validate().is_err());
        assert!(FetchConfig::new("h", "u", "").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = FetchConfig::new("h", "u", "p").with_lookback_days(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extract_paths() {
        let config = ExtractConfig::new().with_output_dir("/out");
        assert_eq!(config.text_path(), PathBuf::from("/out/cdrs.txt"));
        assert_eq!(config.csv_path(), PathBuf::from("/out/cdrs.csv"));
    }
}
