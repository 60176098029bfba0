//! Error types shared by the buffer, cursor and command layers.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Opening, stat'ing, mapping or flushing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `len` bytes starting at `offset` do not fit in a buffer of `size` bytes.
    #[error("range {offset:#x}+{len} is outside a buffer of {size} bytes")]
    OutOfRange { offset: usize, len: usize, size: usize },

    /// Write attempted on a buffer mapped read-only.
    #[error("buffer is read-only")]
    ReadOnly,

    /// A non-hexadecimal character arrived while a command was accumulating digits.
    #[error("invalid command input {0:?}")]
    InvalidCommandInput(char),
}

impl Error {
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }
}
