//! Error type shared by every stage of a run.

use std::{io, path::PathBuf};

/// Errors that abort a run.
///
/// None of these are recovered locally: a partially counted table would no
/// longer hold one entry per n-gram in the file, so the run stops and nothing
/// is written.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("scatter renderer unavailable: {0}")]
    RendererUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classifies an error raised while opening `path` for reading.
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound { path }
        } else {
            Error::Io { path, source }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
