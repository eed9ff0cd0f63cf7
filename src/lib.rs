//! Byte n-gram frequency heatmaps for arbitrary binary files.
//!
//! Every pair (or triplet) of consecutive bytes in the input is treated as a
//! coordinate in a 256² (or 256³) grid and counted. Counts are tone mapped to
//! 0–255 and written out as grayscale PPM rasters, or as a point cloud for a
//! 3D viewer. Compressed or encrypted data fills the grid evenly; text, code and
//! structured formats show up as sharp clusters.
//!
//! # Pipeline
//!
//! 1. [`reader::ChunkReader`] yields the file in fixed-size chunks.
//! 2. [`ngram::Window`] stitches n-grams across chunk boundaries and
//!    [`scan::Counter`] accumulates them into a dense [`table::FrequencyTable`].
//! 3. [`tone::ToneMap`] maps each count against the table's peak.
//! 4. [`grid`] writes the pair raster or the 256 triplet slices;
//!    [`scatter`] builds the point cloud and hands it to a renderer.
//!
//! The resulting table never depends on the chunk size or on the
//! [`scan::ScanStrategy`] used to read the file.
//!
//! # Example
//!
//! ```
//! use ngramdust::ngram::Arity;
//! use ngramdust::scan::scan_bytes;
//! use ngramdust::tone::{ToneCurve, ToneMap};
//!
//! let scan = scan_bytes(&[0, 1, 2, 3, 2], Arity::Pair, 2);
//! assert_eq!(scan.table.pair(2, 3), 1);
//! assert_eq!(scan.stats.ngrams, 4);
//!
//! let tone = ToneMap::new(ToneCurve::Log);
//! assert_eq!(tone.brightness(0, scan.stats.peak), 0);
//! assert_eq!(tone.brightness(1, scan.stats.peak), 255);
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod ngram;
pub mod reader;
pub mod run;
pub mod scan;
pub mod scatter;
pub mod table;
pub mod tone;

pub use config::{Mode, RunConfig};
pub use error::{Error, Result};
pub use ngram::{Arity, ByteTuple, Window};
pub use run::{run, run_with_renderer, RunSummary};
pub use scan::{scan_bytes, scan_file, Scan, ScanStats, ScanStrategy};
pub use table::FrequencyTable;
pub use tone::{brightness, ToneCurve, ToneMap};
