//! `ngramdust`: render the byte-pair or byte-triplet frequencies of a file.
//!
//! **Usage:**
//! ```text
//! ngramdust firmware.bin                          # 256x256 pair heatmap -> output.ppm
//! ngramdust firmware.bin --mode slices -o v.ppm   # 256 slices -> v/v_slice_000.ppm ...
//! ngramdust firmware.bin --mode scatter           # point cloud -> output.html
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ngramdust::config::DEFAULT_GAMMA;
use ngramdust::reader::DEFAULT_CHUNK_SIZE;
use ngramdust::scatter::DEFAULT_MAX_POINTS;
use ngramdust::{Mode, RunConfig, ScanStrategy, ToneCurve};
use tracing_subscriber::EnvFilter;

/// Render byte n-gram frequencies of a binary file as a grayscale heatmap.
#[derive(Parser)]
#[command(name = "ngramdust", version, about)]
struct Args {
    /// File to scan.
    input: PathBuf,

    /// Output file (pairs, scatter) or slice base path (slices).
    /// Defaults to output.ppm, or output.html in scatter mode.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// pairs: 2D pair heatmap; slices: 256 triplet slices; scatter: 3D point cloud.
    #[arg(long, default_value = "pairs")]
    mode: Mode,

    /// Tone curve: linear, sqrt or log.
    #[arg(long, default_value = "log")]
    scale: ToneCurve,

    /// Gamma applied after the tone curve; 1 disables it.
    #[arg(long, default_value_t = DEFAULT_GAMMA)]
    gamma: f64,

    /// Bytes per read.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// How the file is read: streamed, whole or mapped.
    #[arg(long, default_value = "streamed")]
    strategy: ScanStrategy,

    /// Maximum points kept in scatter mode (most frequent first).
    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    max_points: usize,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(self.input, self.mode);
        if let Some(output) = self.output {
            config.output = output;
        }
        config.curve = self.scale;
        config.gamma = self.gamma;
        config.chunk_size = self.chunk_size;
        config.strategy = self.strategy;
        config.max_points = self.max_points;
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.into_config();
    let summary = ngramdust::run(&config)
        .with_context(|| format!("Cannot visualize {}", config.input.display()))?;

    let arity = config.mode.arity();
    println!(
        "Scanned {} bytes ({} {}-grams)",
        summary.stats.bytes, summary.stats.ngrams, arity
    );
    println!(
        "  Distinct: {} ({:.2}% of {})",
        summary.stats.distinct,
        summary.stats.coverage(arity) * 100.0,
        arity.key_space()
    );
    println!("  Peak:     {}", summary.stats.peak);
    if let Some(points) = summary.points {
        println!("  Points:   {points}");
    }
    match summary.written.as_slice() {
        [single] => println!("  Output:   {}", single.display()),
        [first, .., last] => println!(
            "  Output:   {} files, {} .. {}",
            summary.written.len(),
            first.display(),
            last.display()
        ),
        [] => {}
    }

    Ok(())
}
