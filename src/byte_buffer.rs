use std::fs::{File, OpenOptions};
use std::ops::Range;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut, MmapOptions};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

enum Storage {
    ReadWrite(MmapMut),
    ReadOnly(Mmap),
    /// Zero-length files and closed buffers; nothing is mapped.
    Empty,
}

/// Bounds-checked view over a memory-mapped file.
///
/// Writes go straight into a shared mapping, so the file on disk sees them
/// without a separate save step.
pub struct ByteBuffer {
    path: PathBuf,
    storage: Storage,
    read_only: bool,
}

impl ByteBuffer {
    /// Maps `path` read-write when the file can be opened for writing, read-only otherwise.
    pub fn open(path: impl AsRef<Path>) -> Result<ByteBuffer> {
        let path = path.as_ref();
        match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => Self::map(path, file, false),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no write access, retrying read-only");
                Self::open_read_only(path)
            }
        }
    }

    /// Maps `path` read-only regardless of permissions.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<ByteBuffer> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::map(path, file, true)
    }

    fn map(path: &Path, file: File, read_only: bool) -> Result<ByteBuffer> {
        let size = file.metadata()?.len() as usize;
        // Safety: the mapping is only valid while nobody truncates the file
        // underneath us, the same contract every mmap-based viewer lives with.
        let storage = if size == 0 {
            Storage::Empty
        } else if read_only {
            Storage::ReadOnly(unsafe { MmapOptions::new().len(size).map(&file)? })
        } else {
            Storage::ReadWrite(unsafe { MmapOptions::new().len(size).map_mut(&file)? })
        };
        info!(path = %path.display(), size, read_only, "mapped file");
        Ok(ByteBuffer {
            path: path.to_owned(),
            storage,
            read_only,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn size(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The whole mapped region.
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Storage::ReadWrite(map) => &map[..],
            Storage::ReadOnly(map) => &map[..],
            Storage::Empty => &[],
        }
    }

    fn out_of_range(&self, offset: usize, len: usize) -> Error {
        Error::OutOfRange {
            offset,
            len,
            size: self.size(),
        }
    }

    pub fn get(&self, offset: usize) -> Result<u8> {
        self.as_slice()
            .get(offset)
            .copied()
            .ok_or_else(|| self.out_of_range(offset, 1))
    }

    /// Bytes in `range`, which must lie entirely inside the buffer.
    pub fn slice(&self, range: Range<usize>) -> Result<&[u8]> {
        let len = range.end.saturating_sub(range.start);
        if range.start > range.end || range.end > self.size() {
            return Err(self.out_of_range(range.start, len));
        }
        Ok(&self.as_slice()[range])
    }

    pub fn set(&mut self, offset: usize, value: u8) -> Result<()> {
        self.update(offset, |_| value).map(|_| ())
    }

    /// Replaces the byte at `offset` with `f(old)` and returns the new value.
    pub fn update(&mut self, offset: usize, f: impl FnOnce(u8) -> u8) -> Result<u8> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        let size = self.size();
        let slot = match &mut self.storage {
            Storage::ReadWrite(map) => map.get_mut(offset),
            Storage::ReadOnly(_) => return Err(Error::ReadOnly),
            Storage::Empty => None,
        };
        match slot {
            Some(byte) => {
                let value = f(*byte);
                *byte = value;
                Ok(value)
            }
            None => Err(Error::OutOfRange {
                offset,
                len: 1,
                size,
            }),
        }
    }

    /// Flushes pending writes and unmaps the file. Calling it again does nothing.
    pub fn close(&mut self) -> Result<()> {
        let storage = std::mem::replace(&mut self.storage, Storage::Empty);
        if let Storage::ReadWrite(map) = &storage {
            if let Err(e) = map.flush() {
                warn!(path = %self.path.display(), error = %e, "flush before unmap failed");
                return Err(e.into());
            }
            debug!(path = %self.path.display(), "flushed mapping");
        }
        Ok(())
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("path", &self.path)
            .field("size", &self.size())
            .field("read_only", &self.read_only)
            .finish()
    }
}
