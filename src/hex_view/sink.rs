use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Receives exported byte strings, standing in for a system clipboard.
pub trait ExportSink {
    fn deliver(&mut self, text: &str) -> io::Result<()>;

    /// Short description shown after a successful delivery.
    fn describe(&self) -> String;
}

/// Overwrites a file with the most recent export.
pub struct ClipFileSink {
    path: PathBuf,
}

impl ClipFileSink {
    pub fn new(path: impl Into<PathBuf>) -> ClipFileSink {
        ClipFileSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for ClipFileSink {
    fn deliver(&mut self, text: &str) -> io::Result<()> {
        fs::write(&self.path, text)
    }

    fn describe(&self) -> String {
        format!("copied to {}", self.path.display())
    }
}
