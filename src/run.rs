//! One complete run: scan the input, then emit the configured output.
//!
//! Nothing is written until the scan has finished without error.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::{Mode, RunConfig};
use crate::error::Result;
use crate::grid::{write_slices, Raster};
use crate::scan::{scan_file, Scan, ScanStats};
use crate::scatter::{default_renderer, ScatterRenderer, ScatterScene};
use crate::tone::ToneMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub mode: Mode,
    pub stats: ScanStats,
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    /// Points handed to the renderer (scatter mode only).
    pub points: Option<usize>,
}

/// Runs `config` using the renderer built into this crate for scatter mode.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    config.validate()?;
    match config.mode {
        Mode::Pairs | Mode::Slices => run_rasters(config),
        Mode::Scatter => {
            // Resolve the renderer before scanning so a missing one fails fast.
            let renderer = default_renderer()?;
            run_scatter(config, renderer.as_ref())
        }
    }
}

/// Runs `config`, drawing scatter output with `renderer`.
pub fn run_with_renderer(
    config: &RunConfig,
    renderer: &dyn ScatterRenderer,
) -> Result<RunSummary> {
    config.validate()?;
    match config.mode {
        Mode::Pairs | Mode::Slices => run_rasters(config),
        Mode::Scatter => run_scatter(config, renderer),
    }
}

fn scan_input(config: &RunConfig) -> Result<(Scan, ToneMap)> {
    let scan = scan_file(
        &config.input,
        config.mode.arity(),
        config.strategy,
        config.chunk_size,
    )?;
    let tone = config.tone();
    debug!(
        mode = %config.mode,
        curve = %tone.curve,
        gamma = tone.gamma,
        peak = scan.stats.peak,
        "emitting"
    );
    Ok((scan, tone))
}

fn run_rasters(config: &RunConfig) -> Result<RunSummary> {
    let (scan, tone) = scan_input(config)?;
    let peak = scan.stats.peak;
    let written = if config.mode == Mode::Slices {
        let (dir, stem, ext) = config.slice_layout();
        let written = write_slices(&scan.table, peak, &tone, &dir, &stem, &ext)?;
        info!(dir = %dir.display(), slices = written.len(), "slices written");
        written
    } else {
        Raster::pairs(&scan.table, peak, &tone).save(&config.output)?;
        vec![config.output.clone()]
    };
    Ok(RunSummary {
        mode: config.mode,
        stats: scan.stats,
        written,
        points: None,
    })
}

fn run_scatter(config: &RunConfig, renderer: &dyn ScatterRenderer) -> Result<RunSummary> {
    let (scan, tone) = scan_input(config)?;
    let scene = ScatterScene::build(&scan.table, &tone, config.max_points);
    renderer.render(&scene, &config.output)?;
    debug!(renderer = renderer.name(), "scatter rendered");
    Ok(RunSummary {
        mode: config.mode,
        stats: scan.stats,
        written: vec![config.output.clone()],
        points: Some(scene.points.len()),
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs, path::Path};

    use super::*;
    use crate::error::Error;

    /// Records the scene instead of drawing it.
    #[derive(Default)]
    struct Capture {
        scene: RefCell<Option<ScatterScene>>,
    }

    impl ScatterRenderer for Capture {
        fn name(&self) -> &str {
            "capture"
        }

        fn render(&self, scene: &ScatterScene, _output: &Path) -> Result<()> {
            *self.scene.borrow_mut() = Some(scene.clone());
            Ok(())
        }
    }

    #[test]
    fn scatter_goes_through_supplied_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        fs::write(&input, [5u8, 6, 7, 8]).unwrap();

        let cfg = RunConfig::new(&input, Mode::Scatter);
        let capture = Capture::default();
        let summary = run_with_renderer(&cfg, &capture).unwrap();

        assert_eq!(summary.points, Some(2));
        assert_eq!(summary.stats.ngrams, 2);
        let scene = capture.scene.borrow().clone().unwrap();
        assert_eq!(scene.peak, 1);
        assert_eq!(scene.points.len(), 2);
    }

    /// Stands in for a renderer whose backend is missing.
    struct Unavailable;

    impl ScatterRenderer for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn render(&self, _scene: &ScatterScene, _output: &Path) -> Result<()> {
            Err(Error::RendererUnavailable("no backend".to_string()))
        }
    }

    #[test]
    fn renderer_failure_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        fs::write(&input, b"abcd").unwrap();

        let mut cfg = RunConfig::new(&input, Mode::Scatter);
        cfg.output = dir.path().join("cloud.html");
        let err = run_with_renderer(&cfg, &Unavailable).unwrap_err();
        assert!(matches!(err, Error::RendererUnavailable(_)));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn raster_modes_ignore_the_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        fs::write(&input, [1u8, 2, 3]).unwrap();

        let mut cfg = RunConfig::new(&input, Mode::Pairs);
        cfg.output = dir.path().join("pairs.ppm");
        let summary = run_with_renderer(&cfg, &Unavailable).unwrap();
        assert_eq!(summary.written, vec![cfg.output.clone()]);
        assert_eq!(summary.points, None);
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = RunConfig::new(dir.path().join("absent.bin"), Mode::Pairs);
        cfg.output = dir.path().join("out.ppm");

        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn invalid_config_is_rejected_before_scanning() {
        let mut cfg = RunConfig::new("never-opened.bin", Mode::Pairs);
        cfg.chunk_size = 0;
        assert!(matches!(run(&cfg), Err(Error::InvalidConfig(_))));
    }
}
