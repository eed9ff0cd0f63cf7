//! End-to-end runs against files on disk.

use std::{fs, path::Path};

use ngramdust::grid::SIDE;
use ngramdust::{run, Error, Mode, RunConfig, ScanStrategy, ToneCurve};
use tempfile::TempDir;

/// Parses a `P3` raster and returns the red channel, row-major.
fn read_ppm(path: &Path) -> Vec<u8> {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P3"), "{}", path.display());
    assert_eq!(lines.next(), Some("256 256"));
    assert_eq!(lines.next(), Some("255"));
    let values: Vec<u8> = lines
        .flat_map(|l| l.split_whitespace())
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(values.len(), SIDE * SIDE * 3);
    values
        .chunks(3)
        .map(|rgb| {
            assert!(rgb[0] == rgb[1] && rgb[1] == rgb[2]);
            rgb[0]
        })
        .collect()
}

fn setup(bytes: &[u8]) -> (TempDir, RunConfig) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.bin");
    fs::write(&input, bytes).unwrap();
    let cfg = RunConfig::new(input, Mode::Pairs);
    (dir, cfg)
}

#[test]
fn pair_heatmap() {
    let (dir, mut cfg) = setup(&[0, 1, 2, 3, 2]);
    cfg.output = dir.path().join("nested/pairs.ppm");
    cfg.curve = ToneCurve::Linear;
    cfg.gamma = 1.0;

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.stats.ngrams, 4);
    assert_eq!(summary.stats.peak, 1);
    assert_eq!(summary.written, vec![cfg.output.clone()]);

    let pixels = read_ppm(&cfg.output);
    let at = |x: usize, y: usize| pixels[y * SIDE + x];
    assert_eq!(at(0, 1), 255);
    assert_eq!(at(1, 2), 255);
    assert_eq!(at(2, 3), 255);
    assert_eq!(at(3, 2), 255);
    assert_eq!(at(1, 0), 0);
    assert_eq!(pixels.iter().filter(|&&p| p > 0).count(), 4);
}

#[test]
fn empty_and_one_byte_files_render_black() {
    for bytes in [&[][..], &[9u8][..]] {
        for mode in [Mode::Pairs, Mode::Slices] {
            let (dir, mut cfg) = setup(bytes);
            cfg.mode = mode;
            cfg.output = dir.path().join("out.ppm");

            let summary = run(&cfg).unwrap();
            assert_eq!(summary.stats.ngrams, 0);
            assert_eq!(summary.stats.peak, 0);
            let first = &summary.written[0];
            assert!(read_ppm(first).iter().all(|&p| p == 0));
        }
    }
}

#[test]
fn slice_mode_writes_256_rasters() {
    let (dir, mut cfg) = setup(&[0, 1, 2, 3, 2, 1]);
    cfg.mode = Mode::Slices;
    cfg.output = dir.path().join("volume.ppm");
    cfg.strategy = ScanStrategy::Mapped;
    cfg.chunk_size = 1;

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.written.len(), 256);

    let slice_dir = dir.path().join("volume");
    let mut names: Vec<String> = fs::read_dir(&slice_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 256);
    assert_eq!(names[0], "volume_slice_000.ppm");
    assert_eq!(names[255], "volume_slice_255.ppm");

    // (2, 3, 2) lives in slice 2 at pixel (3, 2).
    let slice = read_ppm(&slice_dir.join("volume_slice_002.ppm"));
    assert_eq!(slice[2 * SIDE + 3], 255);
    assert_eq!(slice.iter().filter(|&&p| p > 0).count(), 1);
    assert!(read_ppm(&slice_dir.join("volume_slice_200.ppm"))
        .iter()
        .all(|&p| p == 0));
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = RunConfig::new(dir.path().join("nope.bin"), Mode::Slices);
    cfg.output = dir.path().join("out.ppm");
    assert!(matches!(run(&cfg), Err(Error::FileNotFound { .. })));
    assert!(!dir.path().join("out").exists());
}

#[cfg(feature = "html")]
#[test]
fn scatter_mode_writes_html() {
    let (dir, mut cfg) = setup(b"abcabcabd");
    cfg.mode = Mode::Scatter;
    cfg.output = dir.path().join("cloud.html");
    cfg.max_points = 2;

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.points, Some(2));
    let page = fs::read_to_string(&cfg.output).unwrap();
    assert!(page.contains("scatter3d"));
    assert!(page.contains("log scale, peak 2"));
}
