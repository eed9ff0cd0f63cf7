//! Count-to-brightness tone mapping.
//!
//! Maps an unbounded count onto `0..=255` relative to the peak count. Zero is
//! reserved for "never observed": any nonzero count maps to at least 1.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Curve applied to `count / peak` before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneCurve {
    Linear,
    Sqrt,
    /// `ln(1 + count) / ln(1 + peak)`; lifts rare n-grams.
    #[default]
    Log,
}

impl ToneCurve {
    pub fn label(self) -> &'static str {
        match self {
            ToneCurve::Linear => "linear",
            ToneCurve::Sqrt => "sqrt",
            ToneCurve::Log => "log",
        }
    }

    /// Unclamped ratio for `count` against `peak`. Both must be nonzero.
    fn ratio(self, count: u64, peak: u64) -> f64 {
        let (c, p) = (count as f64, peak as f64);
        match self {
            ToneCurve::Linear => c / p,
            ToneCurve::Sqrt => (c / p).sqrt(),
            ToneCurve::Log => c.ln_1p() / p.ln_1p(),
        }
    }
}

impl fmt::Display for ToneCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ToneCurve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(ToneCurve::Linear),
            "sqrt" => Ok(ToneCurve::Sqrt),
            "log" => Ok(ToneCurve::Log),
            other => Err(Error::InvalidConfig(format!(
                "unknown tone curve `{other}` (expected linear, sqrt or log)"
            ))),
        }
    }
}

/// A tone curve plus gamma exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneMap {
    pub curve: ToneCurve,
    /// Applied as `ratio^gamma`; 1.0 leaves the curve untouched.
    pub gamma: f64,
}

impl Default for ToneMap {
    fn default() -> Self {
        Self::new(ToneCurve::default())
    }
}

impl ToneMap {
    pub fn new(curve: ToneCurve) -> Self {
        Self { curve, gamma: 1.0 }
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Display value for `count` given the table's `peak`.
    pub fn brightness(&self, count: u64, peak: u64) -> u8 {
        if count == 0 || peak == 0 {
            return 0;
        }
        let base = self.curve.ratio(count, peak).clamp(0.0, 1.0);
        // A gamma that yields no number leaves the curve untouched.
        let ratio = match base.powf(self.gamma) {
            r if r.is_finite() => r.clamp(0.0, 1.0),
            _ => base,
        };
        // Ties go to even: 2.5 becomes 2, 127.5 becomes 128.
        (ratio * 255.0).round_ties_even().clamp(1.0, 255.0) as u8
    }
}

/// Free-function form of [`ToneMap::brightness`].
pub fn brightness(count: u64, peak: u64, curve: ToneCurve, gamma: f64) -> u8 {
    ToneMap { curve, gamma }.brightness(count, peak)
}
