//! Drives the sliding window over a whole input and accumulates the table.
//!
//! [`ScanStrategy::Streamed`] is the reference path: bounded memory, one
//! chunk at a time. `Whole` and `Mapped` hand the same [`Counter`] larger
//! slices and must produce an identical table for any chunk size.

use std::{
    fmt,
    fs::{self, File},
    path::Path,
    str::FromStr,
};

use memmap2::Mmap;
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::ngram::{Arity, Window};
use crate::reader::ChunkReader;
use crate::table::FrequencyTable;

/// How the input bytes are brought into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStrategy {
    /// Fixed-size reads through a reused buffer.
    #[default]
    Streamed,
    /// Read the entire file, then count it as a single chunk.
    Whole,
    /// Memory-map the file and walk it in chunk-sized slices.
    Mapped,
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScanStrategy::Streamed => "streamed",
            ScanStrategy::Whole => "whole",
            ScanStrategy::Mapped => "mapped",
        })
    }
}

impl FromStr for ScanStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "streamed" | "stream" => Ok(ScanStrategy::Streamed),
            "whole" => Ok(ScanStrategy::Whole),
            "mapped" | "mmap" => Ok(ScanStrategy::Mapped),
            other => Err(Error::InvalidConfig(format!(
                "unknown scan strategy `{other}` (expected streamed, whole or mapped)"
            ))),
        }
    }
}

/// Totals gathered while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanStats {
    pub bytes: u64,
    pub chunks: u64,
    pub ngrams: u64,
    pub distinct: usize,
    pub peak: u64,
}

impl ScanStats {
    /// Fraction of the `256^n` key space that was observed.
    pub fn coverage(&self, arity: Arity) -> f64 {
        self.distinct as f64 / arity.key_space() as f64
    }
}

/// A finished scan: the table and the numbers describing it.
#[derive(Debug, Clone)]
pub struct Scan {
    pub table: FrequencyTable,
    pub stats: ScanStats,
}

/// Accumulates a [`FrequencyTable`] from chunks fed in file order.
pub struct Counter {
    window: Window,
    table: FrequencyTable,
    bytes: u64,
    chunks: u64,
    ngrams: u64,
}

impl Counter {
    pub fn new(arity: Arity) -> Self {
        Self {
            window: Window::new(arity),
            table: FrequencyTable::new(arity),
            bytes: 0,
            chunks: 0,
            ngrams: 0,
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        let table = &mut self.table;
        let mut emitted = 0u64;
        self.window = self.window.step(chunk, |key| {
            table.increment(key);
            emitted += 1;
        });
        self.bytes += chunk.len() as u64;
        self.chunks += 1;
        self.ngrams += emitted;
        trace!(len = chunk.len(), emitted, "chunk counted");
    }

    pub fn finish(self) -> Scan {
        let stats = ScanStats {
            bytes: self.bytes,
            chunks: self.chunks,
            ngrams: self.ngrams,
            distinct: self.table.distinct(),
            peak: self.table.peak(),
        };
        Scan {
            table: self.table,
            stats,
        }
    }
}

/// Counts every `arity`-gram of the file at `path`.
pub fn scan_file(
    path: impl AsRef<Path>,
    arity: Arity,
    strategy: ScanStrategy,
    chunk_size: usize,
) -> Result<Scan> {
    let path = path.as_ref();
    debug!(path = %path.display(), %arity, %strategy, chunk_size, "scanning");

    let mut counter = Counter::new(arity);
    match strategy {
        ScanStrategy::Streamed => {
            let mut reader = ChunkReader::open(path, chunk_size)?;
            while let Some(chunk) = reader.next_chunk()? {
                counter.feed(chunk);
            }
        }
        ScanStrategy::Whole => {
            let data = fs::read(path).map_err(|e| Error::open(path, e))?;
            if !data.is_empty() {
                counter.feed(&data);
            }
        }
        ScanStrategy::Mapped => {
            let file = File::open(path).map_err(|e| Error::open(path, e))?;
            let len = file.metadata().map_err(|e| Error::io(path, e))?.len();
            // Mapping a zero-length file fails on some platforms.
            if len > 0 {
                // SAFETY: the mapping is read-only and dropped before returning;
                // the input is assumed not to be truncated while it is scanned.
                let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::io(path, e))?;
                for chunk in map.chunks(chunk_size.max(1)) {
                    counter.feed(chunk);
                }
            }
        }
    }

    let scan = counter.finish();
    info!(
        path = %path.display(),
        bytes = scan.stats.bytes,
        ngrams = scan.stats.ngrams,
        distinct = scan.stats.distinct,
        peak = scan.stats.peak,
        "scan complete"
    );
    Ok(scan)
}

/// Counts an in-memory buffer, split into `chunk_size` pieces.
pub fn scan_bytes(data: &[u8], arity: Arity, chunk_size: usize) -> Scan {
    let mut counter = Counter::new(arity);
    for chunk in data.chunks(chunk_size.max(1)) {
        counter.feed(chunk);
    }
    counter.finish()
}
