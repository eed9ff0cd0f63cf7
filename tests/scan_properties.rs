//! Property-based tests for n-gram counting and tone mapping.
//!
//! The whole-buffer, single-chunk scan is the reference every other way of
//! reading the same bytes must agree with.

use std::{collections::BTreeMap, fs};

use ngramdust::{brightness, scan_bytes, scan_file, Arity, ByteTuple, ScanStrategy, ToneCurve};
use proptest::prelude::*;

fn arity() -> impl Strategy<Value = Arity> {
    prop_oneof![Just(Arity::Pair), Just(Arity::Triplet)]
}

fn curve() -> impl Strategy<Value = ToneCurve> {
    prop_oneof![
        Just(ToneCurve::Linear),
        Just(ToneCurve::Sqrt),
        Just(ToneCurve::Log)
    ]
}

/// Naive count over the whole buffer with a hash-free map.
fn reference(data: &[u8], arity: Arity) -> BTreeMap<ByteTuple, u64> {
    let mut map = BTreeMap::new();
    for w in data.windows(arity.len()) {
        let key = match arity {
            Arity::Pair => ByteTuple::Pair([w[0], w[1]]),
            Arity::Triplet => ByteTuple::Triplet([w[0], w[1], w[2]]),
        };
        *map.entry(key).or_insert(0) += 1;
    }
    map
}

// =============================================================================
// Counting
// =============================================================================

proptest! {
    /// Sum of counts is max(0, L - n + 1).
    #[test]
    fn prop_count_conservation(
        data in prop::collection::vec(any::<u8>(), 0..512),
        arity in arity(),
        chunk in 1usize..64,
    ) {
        let scan = scan_bytes(&data, arity, chunk);
        let expected = (data.len() + 1).saturating_sub(arity.len()) as u64;
        prop_assert_eq!(scan.table.total(), expected);
        prop_assert_eq!(scan.stats.ngrams, expected);
    }

    /// Chunk size never changes the table.
    #[test]
    fn prop_chunk_size_invariance(
        data in prop::collection::vec(any::<u8>(), 0..512),
        arity in arity(),
        chunk in 1usize..64,
    ) {
        let whole = scan_bytes(&data, arity, data.len().max(1));
        for size in [1, 7, 4096, chunk] {
            let chunked = scan_bytes(&data, arity, size);
            prop_assert!(chunked.table == whole.table, "chunk size {} diverged", size);
        }
    }

    /// The dense table matches a straightforward windowed count.
    #[test]
    fn prop_matches_reference_count(
        data in prop::collection::vec(0u8..4, 0..256),
        arity in arity(),
        chunk in 1usize..16,
    ) {
        let scan = scan_bytes(&data, arity, chunk);
        prop_assert_eq!(scan.table.to_map(), reference(&data, arity));
    }

    /// Peak equals the largest entry and is zero only for short input.
    #[test]
    fn prop_peak_is_max(
        data in prop::collection::vec(0u8..3, 0..128),
        arity in arity(),
    ) {
        let scan = scan_bytes(&data, arity, 5);
        let max = reference(&data, arity).values().copied().max().unwrap_or(0);
        prop_assert_eq!(scan.stats.peak, max);
        prop_assert_eq!(scan.stats.peak == 0, data.len() < arity.len());
    }
}

// =============================================================================
// Read strategies
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Streamed, whole-file and memory-mapped scans agree.
    #[test]
    fn prop_strategies_agree(
        data in prop::collection::vec(any::<u8>(), 0..2048),
        arity in arity(),
        chunk in 1usize..300,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.bin");
        fs::write(&path, &data).unwrap();

        let reference = scan_bytes(&data, arity, data.len().max(1));
        for strategy in [ScanStrategy::Streamed, ScanStrategy::Whole, ScanStrategy::Mapped] {
            let scan = scan_file(&path, arity, strategy, chunk).unwrap();
            prop_assert!(scan.table == reference.table, "{} {} diverged", strategy, arity);
            prop_assert_eq!(scan.stats.bytes, data.len() as u64);
        }
    }
}

// =============================================================================
// Tone mapping
// =============================================================================

proptest! {
    /// Zero maps to zero; anything observed maps into 1..=255.
    #[test]
    fn prop_brightness_bounds(
        count in 0u64..1_000_000,
        extra in 0u64..1_000_000,
        curve in curve(),
        gamma in 0.05f64..5.0,
    ) {
        let peak = count + extra;
        let b = brightness(count, peak, curve, gamma);
        if count == 0 {
            prop_assert_eq!(b, 0);
        } else {
            prop_assert!(b >= 1);
        }
    }

    /// Brightness never decreases as the count grows.
    #[test]
    fn prop_brightness_monotone(
        a in 0u64..100_000,
        b in 0u64..100_000,
        extra in 0u64..100_000,
        curve in curve(),
        gamma in 0.05f64..5.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let peak = hi + extra;
        prop_assert!(brightness(lo, peak, curve, gamma) <= brightness(hi, peak, curve, gamma));
    }
}
