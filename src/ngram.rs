//! N-gram keys and the sliding window that stitches them across chunks.
//!
//! A file is consumed as a sequence of chunks. Every n-gram is emitted by the
//! step that receives its *last* byte: either it lies entirely inside that
//! chunk (interior), or it starts in the bytes carried over from earlier chunks
//! (boundary). Since the carry never holds more than `n - 1` bytes, an n-gram
//! that starts in the carry always needs at least one new byte, so it cannot be
//! emitted twice.

use std::{fmt, str::FromStr};

use itertools::Itertools;

use crate::error::Error;

/// Number of bytes per n-gram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Pair,
    Triplet,
}

impl Arity {
    pub const fn len(self) -> usize {
        match self {
            Arity::Pair => 2,
            Arity::Triplet => 3,
        }
    }

    /// Size of the flattened key space, `256^n`.
    pub const fn key_space(self) -> usize {
        match self {
            Arity::Pair => 1 << 16,
            Arity::Triplet => 1 << 24,
        }
    }

    /// Expected total n-gram count for a stream of `bytes` bytes.
    pub fn ngrams_in(self, bytes: u64) -> u64 {
        bytes.saturating_sub(self.len() as u64 - 1)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.len())
    }
}

impl FromStr for Arity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" | "pair" | "pairs" => Ok(Arity::Pair),
            "3" | "triplet" | "triplets" => Ok(Arity::Triplet),
            other => Err(Error::InvalidConfig(format!(
                "n-gram length must be 2 or 3, got `{other}`"
            ))),
        }
    }
}

/// An ordered pair or triplet of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ByteTuple {
    Pair([u8; 2]),
    Triplet([u8; 3]),
}

impl ByteTuple {
    pub fn arity(&self) -> Arity {
        match self {
            ByteTuple::Pair(_) => Arity::Pair,
            ByteTuple::Triplet(_) => Arity::Triplet,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ByteTuple::Pair(b) => b,
            ByteTuple::Triplet(b) => b,
        }
    }

    /// Dense index: `x*256 + y` for pairs, `x*65536 + y*256 + z` for triplets.
    pub fn flatten(&self) -> usize {
        self.as_bytes()
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize)
    }

    /// Inverse of [`ByteTuple::flatten`]. `index` must be below `arity.key_space()`.
    pub fn unflatten(arity: Arity, index: usize) -> Self {
        debug_assert!(index < arity.key_space());
        match arity {
            Arity::Pair => ByteTuple::Pair([(index >> 8) as u8, index as u8]),
            Arity::Triplet => {
                ByteTuple::Triplet([(index >> 16) as u8, (index >> 8) as u8, index as u8])
            }
        }
    }
}

impl From<[u8; 2]> for ByteTuple {
    fn from(b: [u8; 2]) -> Self {
        ByteTuple::Pair(b)
    }
}

impl From<[u8; 3]> for ByteTuple {
    fn from(b: [u8; 3]) -> Self {
        ByteTuple::Triplet(b)
    }
}

impl fmt::Display for ByteTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.as_bytes().iter().join(", "))
    }
}

/// The last `n - 1` bytes seen so far, carried from one chunk to the next.
///
/// Threaded explicitly by the caller; [`Window::step`] consumes the previous
/// state and returns the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    arity: Arity,
    carry: [u8; 2],
    filled: u8,
}

impl Window {
    pub fn new(arity: Arity) -> Self {
        Self {
            arity,
            carry: [0; 2],
            filled: 0,
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Carried bytes, oldest first. Empty before the first byte.
    pub fn carried(&self) -> &[u8] {
        &self.carry[..self.filled as usize]
    }

    /// Feeds one chunk, calling `emit` with the flattened key of every n-gram
    /// whose last byte lies in `chunk`.
    pub fn step<F: FnMut(usize)>(self, chunk: &[u8], mut emit: F) -> Self {
        let n = self.arity.len();
        let carried = self.carried();

        // Boundary: n-grams starting at carried[i] need `n - (k - i)` new bytes.
        let k = carried.len();
        for i in 0..k {
            let needed = n - (k - i);
            if needed > chunk.len() {
                break;
            }
            let key = carried[i..]
                .iter()
                .chain(&chunk[..needed])
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);
            emit(key);
        }

        match self.arity {
            Arity::Pair => {
                for (&x, &y) in chunk.iter().tuple_windows::<(_, _)>() {
                    emit((x as usize) << 8 | y as usize);
                }
            }
            Arity::Triplet => {
                for (&x, &y, &z) in chunk.iter().tuple_windows::<(_, _, _)>() {
                    emit((x as usize) << 16 | (y as usize) << 8 | z as usize);
                }
            }
        }

        self.advance(chunk)
    }

    fn advance(self, chunk: &[u8]) -> Self {
        let keep = self.arity.len() - 1;
        let mut carry = [0; 2];
        let filled;
        if chunk.len() >= keep {
            carry[..keep].copy_from_slice(&chunk[chunk.len() - keep..]);
            filled = keep;
        } else {
            // Short chunk: the tail spans the old carry and the new bytes.
            let tail: Vec<u8> = self.carried().iter().chain(chunk).copied().collect();
            let from = tail.len().saturating_sub(keep);
            filled = tail.len() - from;
            carry[..filled].copy_from_slice(&tail[from..]);
        }
        Self {
            arity: self.arity,
            carry,
            filled: filled as u8,
        }
    }
}
