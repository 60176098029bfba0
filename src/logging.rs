//! Debug logging to a file.
//!
//! The terminal belongs to the viewer, so nothing is ever logged to stdout or
//! stderr; a subscriber is installed only when a log path is configured.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

/// Installs a plain-text subscriber appending to `log_path`. Returns false when logging stays off.
pub fn init(log_path: Option<&Path>) -> io::Result<bool> {
    let path = match log_path {
        Some(path) => path,
        None => return Ok(false),
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(true)
}
