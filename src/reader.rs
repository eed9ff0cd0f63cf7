//! Chunked byte source.

use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Default streaming chunk size (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

/// Largest accepted chunk size (1 GiB).
pub const MAX_CHUNK_SIZE: usize = 1 << 30;

/// Yields a reader's bytes as non-empty chunks in order.
///
/// Every chunk except the last is exactly `chunk_size` bytes; the buffer is
/// reused between calls, so memory stays at one chunk whatever the input size.
pub struct ChunkReader<R> {
    inner: R,
    buf: Vec<u8>,
    path: PathBuf,
    done: bool,
}

impl ChunkReader<File> {
    /// Opens `path` read-only.
    pub fn open(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        Ok(Self::with_path(file, chunk_size, path))
    }
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, chunk_size: usize) -> Self {
        Self::with_path(inner, chunk_size, "<reader>")
    }

    fn with_path(inner: R, chunk_size: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            buf: vec![0; chunk_size.max(1)],
            path: path.into(),
            done: false,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.buf.len()
    }

    /// Next chunk, or `None` once the source is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<&[u8]>> {
        if self.done {
            return Ok(None);
        }
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::io(&self.path, e)),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        Ok(Some(&self.buf[..filled]))
    }
}
