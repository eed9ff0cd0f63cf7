//! Raster output: the 2D pair heatmap and the 256 slices of the triplet volume.
//!
//! Rasters are written as plain-text PPM (`P3`), one `v v v` triple per pixel,
//! rows top to bottom (`y` outer, `x` inner).

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::error::{Error, Result};
use crate::table::FrequencyTable;
use crate::tone::ToneMap;

/// Width and height of every raster.
pub const SIDE: usize = 256;

/// Format tag written on the first header line.
pub const PPM_MAGIC: &str = "P3";

/// A 256×256 grid of display values, stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    pixels: Vec<u8>,
}

impl Raster {
    pub fn from_fn(mut f: impl FnMut(u8, u8) -> u8) -> Self {
        let mut pixels = Vec::with_capacity(SIDE * SIDE);
        for y in 0..=255u8 {
            for x in 0..=255u8 {
                pixels.push(f(x, y));
            }
        }
        Self { pixels }
    }

    /// Pixel `(x, y)` shows the pair `(x, y)`.
    pub fn pairs(table: &FrequencyTable, peak: u64, tone: &ToneMap) -> Self {
        Self::from_fn(|x, y| tone.brightness(table.pair(x, y), peak))
    }

    /// Cross-section with the first triplet byte fixed at `z`: pixel `(x, y)`
    /// shows the triplet `(z, x, y)`.
    pub fn slice(table: &FrequencyTable, z: u8, peak: u64, tone: &ToneMap) -> Self {
        Self::from_fn(|x, y| tone.brightness(table.triplet(z, x, y), peak))
    }

    pub fn get(&self, x: u8, y: u8) -> u8 {
        self.pixels[y as usize * SIDE + x as usize]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_black(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }

    pub fn write_ppm<W: Write>(&self, mut w: W) -> io::Result<()> {
        write!(w, "{PPM_MAGIC}\n{SIDE} {SIDE}\n255\n")?;
        for row in self.pixels.chunks(SIDE) {
            for (x, &v) in row.iter().enumerate() {
                if x > 0 {
                    w.write_all(b" ")?;
                }
                write!(w, "{v} {v} {v}")?;
            }
            w.write_all(b"\n")?;
        }
        w.flush()
    }

    /// Writes the raster to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        self.write_ppm(BufWriter::new(file))
            .map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), "raster written");
        Ok(())
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.pixels.iter().filter(|&&p| p > 0).count();
        f.debug_struct("Raster").field("lit", &lit).finish()
    }
}

/// `<dir>/<stem>_slice_<NNN>.<ext>`.
pub fn slice_path(dir: &Path, stem: &str, ext: &str, z: u8) -> PathBuf {
    dir.join(format!("{stem}_slice_{z:03}.{ext}"))
}

/// Writes all 256 slices of a triplet table into `dir`. Returns the paths in
/// slice order.
pub fn write_slices(
    table: &FrequencyTable,
    peak: u64,
    tone: &ToneMap,
    dir: &Path,
    stem: &str,
    ext: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    (0..=255u8)
        .map(|z| {
            let path = slice_path(dir, stem, ext, z);
            Raster::slice(table, z, peak, tone).save(&path)?;
            Ok(path)
        })
        .collect()
}
