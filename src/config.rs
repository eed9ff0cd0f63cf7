//! Run configuration.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::{Error, Result};
use crate::ngram::Arity;
use crate::reader::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::scan::ScanStrategy;
use crate::scatter::DEFAULT_MAX_POINTS;
use crate::tone::{ToneCurve, ToneMap};

/// Gamma applied when none is given; lifts mid-range counts.
pub const DEFAULT_GAMMA: f64 = 0.4;

/// What the run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Byte pairs, one 256×256 raster.
    #[default]
    Pairs,
    /// Byte triplets, 256 raster slices.
    Slices,
    /// Byte triplets, a point cloud for an external renderer.
    Scatter,
}

impl Mode {
    pub fn arity(self) -> Arity {
        match self {
            Mode::Pairs => Arity::Pair,
            Mode::Slices | Mode::Scatter => Arity::Triplet,
        }
    }

    pub fn default_output(self) -> PathBuf {
        match self {
            Mode::Pairs | Mode::Slices => PathBuf::from("output.ppm"),
            Mode::Scatter => PathBuf::from("output.html"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Pairs => "pairs",
            Mode::Slices => "slices",
            Mode::Scatter => "scatter",
        })
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pairs" | "2d" => Ok(Mode::Pairs),
            "slices" | "3d" => Ok(Mode::Slices),
            "scatter" => Ok(Mode::Scatter),
            other => Err(Error::InvalidConfig(format!(
                "unknown mode `{other}` (expected pairs, slices or scatter)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: Mode,
    pub curve: ToneCurve,
    pub gamma: f64,
    pub chunk_size: usize,
    pub strategy: ScanStrategy,
    pub max_points: usize,
}

impl RunConfig {
    /// Defaults for `mode`, reading `input`.
    pub fn new(input: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            input: input.into(),
            output: mode.default_output(),
            mode,
            curve: ToneCurve::default(),
            gamma: DEFAULT_GAMMA,
            chunk_size: DEFAULT_CHUNK_SIZE,
            strategy: ScanStrategy::default(),
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    pub fn tone(&self) -> ToneMap {
        ToneMap::new(self.curve).with_gamma(self.gamma)
    }

    /// Checks option values. Does not touch the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::InvalidConfig(format!(
                "chunk size must be between 1 and {MAX_CHUNK_SIZE} bytes, got {}",
                self.chunk_size
            )));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "gamma must be a positive number, got {}",
                self.gamma
            )));
        }
        if self.max_points == 0 {
            return Err(Error::InvalidConfig(
                "max points must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory, stem and extension used for slice files.
    ///
    /// `out/volume.ppm` becomes `out/volume/volume_slice_NNN.ppm`.
    pub fn slice_layout(&self) -> (PathBuf, String, String) {
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let ext = self
            .output
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ppm".to_string());
        let parent = self.output.parent().unwrap_or(Path::new(""));
        (parent.join(&stem), stem, ext)
    }
}
