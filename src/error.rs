//! Unified error types for cdrsync.
//!
//! This module provides a single [`CdrSyncError`] enum that covers all error
//! cases in the library, with a crate-wide [`Result`] alias.
//!
//! # Error Handling Philosophy
//!
//! Only two failures abort a run: a rejected login ([`CdrSyncError::Auth`])
//! and an unreachable host ([`CdrSyncError::Connection`]). Everything scoped
//! to a single file — a failed download, an unreadable staged log — is
//! reported by the fetch/extract loops and skipped, so a run produces
//! partial output rather than none.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for cdrsync operations.
pub type Result<T> = std::result::Result<T, CdrSyncError>;

/// The error type for all cdrsync operations.
///
/// Each variant contains context about what went wrong and, where applicable,
/// the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CdrSyncError {
    /// The FTP server rejected the supplied credentials.
    ///
    /// Fatal: the run is aborted.
    #[error("authentication rejected for user '{username}': {source}")]
    Auth {
        /// The username that was refused
        username: String,
        /// The server's rejection
        #[source]
        source: suppaftp::FtpError,
    },

    /// The FTP host could not be reached or the session broke down.
    ///
    /// Fatal: the run is aborted. The operator retries by re-running.
    #[error("connection to {host} failed: {source}")]
    Connection {
        /// Host we tried to talk to
        host: String,
        /// The underlying FTP/network error
        #[source]
        source: suppaftp::FtpError,
    },

    /// TLS negotiation with the FTP host failed.
    #[error("TLS setup for {host} failed: {source}")]
    Tls {
        /// Host we tried to secure the channel to
        host: String,
        /// The underlying TLS error
        #[source]
        source: suppaftp::native_tls::Error,
    },

    /// A single remote file could not be downloaded.
    ///
    /// Per-file: the fetch loop logs this and continues with the rest.
    #[error("download of '{file}' failed: {source}")]
    Download {
        /// Remote file name
        file: String,
        /// The underlying FTP error
        #[source]
        source: suppaftp::FtpError,
    },

    /// A staged log file could not be read back.
    ///
    /// Per-file: the extract loop logs this and continues with the rest.
    /// Covers both missing files and non-UTF-8 content.
    #[error("cannot read staged log {}: {source}", path.display())]
    FileRead {
        /// Path of the unreadable file
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: io::Error,
    },

    /// An I/O error outside the per-file read path.
    ///
    /// This typically happens when:
    /// - The staging or output directory cannot be created
    /// - Disk is full while writing output
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error while rendering a text-sink record.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The run configuration is unusable (empty host, zero-day window, ...).
    ///
    /// Caught before any connection is attempted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required credential was not supplied.
    #[error("environment variable {name} is not set (FTP password)")]
    MissingCredential {
        /// Name of the missing variable
        name: &'static str,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl CdrSyncError {
    /// Creates an authentication error.
    pub fn auth(username: impl Into<String>, source: suppaftp::FtpError) -> Self {
        CdrSyncError::Auth {
            username: username.into(),
            source,
        }
    }

    /// Creates a connection error.
    pub fn connection(host: impl Into<String>, source: suppaftp::FtpError) -> Self {
        CdrSyncError::Connection {
            host: host.into(),
            source,
        }
    }

    /// Creates a TLS setup error.
    pub fn tls(host: impl Into<String>, source: suppaftp::native_tls::Error) -> Self {
        CdrSyncError::Tls {
            host: host.into(),
            source,
        }
    }

    /// Creates a per-file download error.
    pub fn download(file: impl Into<String>, source: suppaftp::FtpError) -> Self {
        CdrSyncError::Download {
            file: file.into(),
            source,
        }
    }

    /// Creates a per-file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CdrSyncError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CdrSyncError::InvalidConfig(message.into())
    }

    /// Returns `true` if this error aborts the whole run.
    ///
    /// Per-file errors ([`Download`](Self::Download),
    /// [`FileRead`](Self::FileRead)) are not fatal; the loops that produce
    /// them log and continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CdrSyncError::Download { .. } | CdrSyncError::FileRead { .. }
        )
    }

    /// Returns `true` if this is an authentication error.
    pub fn is_auth(&self) -> bool {
        matches!(self, CdrSyncError::Auth { .. })
    }

    /// Returns `true` if this is a connection-level error.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            CdrSyncError::Connection { .. } | CdrSyncError::Tls { .. }
        )
    }

    /// Returns `true` if this is a per-file download error.
    pub fn is_download(&self) -> bool {
        matches!(self, CdrSyncError::Download { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
