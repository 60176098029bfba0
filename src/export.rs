use std::fmt::Write;

use crate::byte_buffer::ByteBuffer;
use crate::error::{Error, Result};

/// Escapes `count` bytes starting at `start` as `\xHH` tokens, uppercase, no separator.
pub fn export_range(buffer: &ByteBuffer, start: usize, count: usize) -> Result<String> {
    let end = start.checked_add(count).filter(|_| count > 0);
    let bytes = match end {
        Some(end) => buffer.slice(start..end)?,
        None => {
            return Err(Error::OutOfRange {
                offset: start,
                len: count,
                size: buffer.size(),
            })
        }
    };
    Ok(escape_bytes(bytes))
}

pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for byte in bytes {
        // writing into a String cannot fail
        let _ = write!(out, "\\x{:02X}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn buffer_of(bytes: &[u8]) -> (tempfile::NamedTempFile, ByteBuffer) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        let buffer = ByteBuffer::open(file.path()).unwrap();
        (file, buffer)
    }

    #[test]
    fn escapes_in_offset_order() {
        let (_file, buffer) = buffer_of(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(export_range(&buffer, 0, 4).unwrap(), "\\xDE\\xAD\\xBE\\xEF");
        assert_eq!(export_range(&buffer, 3, 1).unwrap(), "\\xEF");
    }

    #[test]
    fn rejects_empty_and_overlong_ranges() {
        let (_file, buffer) = buffer_of(&[1, 2, 3]);
        assert!(export_range(&buffer, 0, 0).unwrap_err().is_out_of_range());
        assert!(export_range(&buffer, 1, 3).unwrap_err().is_out_of_range());
        assert!(export_range(&buffer, usize::MAX, 2).unwrap_err().is_out_of_range());
    }
}
