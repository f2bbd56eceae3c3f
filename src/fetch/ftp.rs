//! FTPS-backed [`LogSource`] implementation.
//!
//! Mirrors the provider's access model: explicit TLS on the control
//! connection, protected data channel, passive transfers, read-only usage.
//! One session is opened per run and used serially.

use std::io::{self, Write};

use log::{debug, warn};
use suppaftp::native_tls::TlsConnector;
use suppaftp::{FtpError, NativeTlsConnector, NativeTlsFtpStream};

use super::{LogSource, RemoteEntry};
use crate::config::FetchConfig;
use crate::error::{CdrSyncError, Result};

/// A live FTPS session scoped to the account's remote log directory.
pub struct FtpLogSource {
    stream: NativeTlsFtpStream,
    host: String,
}

impl FtpLogSource {
    /// Connects, secures the channel, logs in and changes into the remote
    /// log directory.
    ///
    /// Credential rejection surfaces as [`CdrSyncError::Auth`]; everything
    /// else on the way up is [`CdrSyncError::Connection`] or
    /// [`CdrSyncError::Tls`]. All three are fatal to the run.
    pub fn connect(config: &FetchConfig) -> Result<Self> {
        let host = &config.host;
        let address = format!("{host}:{port}", port = config.port);

        let plain = NativeTlsFtpStream::connect(&address)
            .map_err(|e| CdrSyncError::connection(host, e))?;

        let tls = TlsConnector::new().map_err(|e| CdrSyncError::tls(host, e))?;
        let mut stream = plain
            .into_secure(NativeTlsConnector::from(tls), host)
            .map_err(|e| CdrSyncError::connection(host, e))?;

        stream
            .login(&config.username, &config.password)
            .map_err(|e| match e {
                FtpError::UnexpectedResponse(_) => CdrSyncError::auth(&config.username, e),
                other => CdrSyncError::connection(host, other),
            })?;

        stream
            .cwd(&config.remote_dir)
            .map_err(|e| CdrSyncError::connection(host, e))?;

        debug!("FTPS session established with {host}, in '{}'", config.remote_dir);
        Ok(Self {
            stream,
            host: host.clone(),
        })
    }

    /// Ends the session politely. Errors on the goodbye are ignored.
    pub fn quit(mut self) {
        let _ = self.stream.quit();
    }

    fn host_error(&self, source: FtpError) -> CdrSyncError {
        CdrSyncError::connection(&self.host, source)
    }
}

impl LogSource for FtpLogSource {
    fn list(&mut self) -> Result<Vec<RemoteEntry>> {
        let names = self.stream.nlst(None).map_err(|e| self.host_error(e))?;

        let mut entries = Vec::new();
        for name in names.into_iter().filter(|n| is_log_name(n)) {
            // SIZE/MDTM can fail per file (e.g. the file was rotated away
            // between listing and stat); skip those and keep going.
            let size = match self.stream.size(&name) {
                Ok(size) => size as u64,
                Err(err) => {
                    warn!("cannot stat '{name}', skipping: {err}");
                    continue;
                }
            };
            let modified = match self.stream.mdtm(&name) {
                Ok(naive) => naive.and_utc(),
                Err(err) => {
                    warn!("no modification date for '{name}', skipping: {err}");
                    continue;
                }
            };
            entries.push(RemoteEntry {
                name,
                size,
                modified,
            });
        }
        Ok(entries)
    }

    fn retrieve(&mut self, name: &str, dest: &mut dyn Write) -> Result<u64> {
        let mut reader = self
            .stream
            .retr_as_stream(name)
            .map_err(|e| CdrSyncError::download(name, e))?;

        let bytes = io::copy(&mut reader, dest).map_err(|e| {
            CdrSyncError::download(name, FtpError::ConnectionError(e))
        })?;

        self.stream
            .finalize_retr_stream(reader)
            .map_err(|e| CdrSyncError::download(name, e))?;

        Ok(bytes)
    }
}

// The provider emits plain and gzipped session logs; everything else in the
// directory is ignored.
fn is_log_name(name: &str) -> bool {
    name.ends_with(".txt") || name.ends_with(".gz")
}
