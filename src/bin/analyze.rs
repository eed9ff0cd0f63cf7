//! `ngramdust-analyze`: how much of the n-gram key space a file covers.
//!
//! **Usage:**
//! ```text
//! ngramdust-analyze archive.zip --arity 3
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use ngramdust::reader::DEFAULT_CHUNK_SIZE;
use ngramdust::{scan_file, Arity, ByteTuple, ScanStrategy};
use tracing_subscriber::EnvFilter;

/// Count distinct byte n-grams in a file.
#[derive(Parser)]
#[command(name = "ngramdust-analyze", version, about)]
struct Args {
    /// File to scan.
    input: PathBuf,

    /// N-gram length (2 or 3).
    #[arg(long, default_value = "3")]
    arity: Arity,

    /// Bytes per read.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Also list the most frequent n-grams.
    #[arg(long, default_value_t = 0)]
    top: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.chunk_size > 0, "--chunk-size must be at least 1");

    let scan = scan_file(
        &args.input,
        args.arity,
        ScanStrategy::Streamed,
        args.chunk_size,
    )
    .with_context(|| format!("Cannot scan {}", args.input.display()))?;
    let stats = scan.stats;

    println!("File: {}", args.input.display());
    println!("Size: {} bytes", stats.bytes);
    println!("N-grams ({}): {}", args.arity, stats.ngrams);
    println!("Unique: {}", stats.distinct);
    println!(
        "Percentage of possible: {:.2}% of {}",
        stats.coverage(args.arity) * 100.0,
        args.arity.key_space()
    );
    println!("Peak: {}", stats.peak);

    if args.top > 0 {
        let top = scan
            .table
            .nonzero()
            .sorted_by_key(|&(index, count)| (std::cmp::Reverse(count), index))
            .take(args.top);
        for (index, count) in top {
            println!("  {} {count}", ByteTuple::unflatten(args.arity, index));
        }
    }

    Ok(())
}
