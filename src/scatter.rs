//! Point-cloud output for the triplet volume.
//!
//! The core only builds [`ScatterScene`]: one record per observed triplet with
//! its mapped brightness and opacity. Turning that into something viewable is
//! the job of a [`ScatterRenderer`]; the bundled one writes an HTML page and is
//! only present with the `html` feature.

use std::{cmp::Reverse, path::Path};

use glam::UVec3;
use tracing::{debug, warn};

use crate::error::Result;
use crate::ngram::Arity;
use crate::table::FrequencyTable;
use crate::tone::{ToneCurve, ToneMap};

/// Default cap on emitted points.
pub const DEFAULT_MAX_POINTS: usize = 100_000;

/// Opacity at brightness 0; brightness 255 is fully opaque.
pub const MIN_OPACITY: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub position: UVec3,
    pub brightness: u8,
    pub opacity: f32,
}

impl ScatterPoint {
    pub fn new(position: UVec3, brightness: u8) -> Self {
        Self {
            position,
            brightness,
            opacity: opacity(brightness),
        }
    }
}

/// `0.2 + (brightness / 255) * 0.8`.
pub fn opacity(brightness: u8) -> f32 {
    MIN_OPACITY + (brightness as f32 / 255.0) * (1.0 - MIN_OPACITY)
}

/// `(x, y, z)` for the flat triplet key `(x << 16) | (y << 8) | z`.
fn triplet_position(index: usize) -> UVec3 {
    let byte = |shift: u32| (index >> shift) as u32 & 0xff;
    UVec3::new(byte(16), byte(8), byte(0))
}

/// Everything a renderer receives.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterScene {
    pub points: Vec<ScatterPoint>,
    pub peak: u64,
    pub curve: ToneCurve,
    /// Observed triplets before the cap was applied.
    pub observed: usize,
}

impl ScatterScene {
    /// Builds the scene from a triplet table, keeping at most `max_points`
    /// of the most frequent triplets. Ties keep key order.
    pub fn build(table: &FrequencyTable, tone: &ToneMap, max_points: usize) -> Self {
        debug_assert_eq!(table.arity(), Arity::Triplet);
        let peak = table.peak();
        let mut entries: Vec<(usize, u64)> = table.nonzero().collect();
        let observed = entries.len();
        if observed > max_points {
            entries.sort_by_key(|&(_, count)| Reverse(count));
            entries.truncate(max_points);
            warn!(observed, kept = max_points, "scatter points capped");
        }

        let points = entries
            .into_iter()
            .map(|(index, count)| {
                ScatterPoint::new(triplet_position(index), tone.brightness(count, peak))
            })
            .collect::<Vec<_>>();
        debug!(points = points.len(), peak, "scatter scene built");

        Self {
            points,
            peak,
            curve: tone.curve,
            observed,
        }
    }

    pub fn title(&self) -> String {
        format!(
            "Byte triplet frequencies ({} scale, peak {})",
            self.curve, self.peak
        )
    }
}

/// Something that can turn a scene into a viewable document.
pub trait ScatterRenderer {
    fn name(&self) -> &str;
    fn render(&self, scene: &ScatterScene, output: &Path) -> Result<()>;
}

/// The renderer compiled into this build.
#[cfg(feature = "html")]
pub fn default_renderer() -> Result<Box<dyn ScatterRenderer>> {
    Ok(Box::new(html::HtmlRenderer::default()))
}

/// The renderer compiled into this build.
#[cfg(not(feature = "html"))]
pub fn default_renderer() -> Result<Box<dyn ScatterRenderer>> {
    Err(crate::error::Error::RendererUnavailable(
        "built without the `html` feature".to_string(),
    ))
}

#[cfg(feature = "html")]
pub mod html {
    //! Self-contained HTML page drawing the scene with plotly's `scatter3d`.

    use std::{fs, path::Path};

    use serde::Serialize;
    use tracing::info;

    use super::{ScatterRenderer, ScatterScene};
    use crate::error::{Error, Result};

    pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

    #[derive(Debug, Clone)]
    pub struct HtmlRenderer {
        pub script_src: String,
    }

    impl Default for HtmlRenderer {
        fn default() -> Self {
            Self {
                script_src: PLOTLY_CDN.to_string(),
            }
        }
    }

    /// Column-oriented trace, the shape plotly expects.
    #[derive(Serialize)]
    struct Trace {
        x: Vec<u32>,
        y: Vec<u32>,
        z: Vec<u32>,
        color: Vec<String>,
        text: Vec<String>,
    }

    impl Trace {
        fn from_scene(scene: &ScatterScene) -> Self {
            let n = scene.points.len();
            let mut trace = Trace {
                x: Vec::with_capacity(n),
                y: Vec::with_capacity(n),
                z: Vec::with_capacity(n),
                color: Vec::with_capacity(n),
                text: Vec::with_capacity(n),
            };
            for p in &scene.points {
                trace.x.push(p.position.x);
                trace.y.push(p.position.y);
                trace.z.push(p.position.z);
                let v = p.brightness;
                trace
                    .color
                    .push(format!("rgba({v},{v},{v},{:.3})", p.opacity));
                trace.text.push(format!(
                    "({}, {}, {}) brightness {v}",
                    p.position.x, p.position.y, p.position.z
                ));
            }
            trace
        }
    }

    impl HtmlRenderer {
        pub fn to_html(&self, scene: &ScatterScene) -> Result<String> {
            let trace = serde_json::to_string(&Trace::from_scene(scene))
                .map_err(|e| Error::RendererUnavailable(format!("cannot encode points: {e}")))?;
            let title = serde_json::to_string(&scene.title())
                .map_err(|e| Error::RendererUnavailable(format!("cannot encode title: {e}")))?;
            Ok(format!(
                r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{plain_title}</title>
<script src="{src}"></script>
<style>html, body, #plot {{ margin: 0; width: 100%; height: 100%; background: #000; }}</style>
</head>
<body>
<div id="plot"></div>
<script>
const t = {trace};
Plotly.newPlot("plot", [{{
  type: "scatter3d",
  mode: "markers",
  x: t.x, y: t.y, z: t.z, text: t.text,
  hoverinfo: "text",
  marker: {{ size: 2, color: t.color }}
}}], {{
  title: {{ text: {title}, font: {{ color: "#ddd" }} }},
  paper_bgcolor: "#000",
  scene: {{
    xaxis: {{ title: "first byte", range: [0, 255] }},
    yaxis: {{ title: "second byte", range: [0, 255] }},
    zaxis: {{ title: "third byte", range: [0, 255] }},
    bgcolor: "#000"
  }}
}});
</script>
</body>
</html>
"##,
                plain_title = html_escape(&scene.title()),
                src = self.script_src,
            ))
        }
    }

    fn html_escape(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    impl ScatterRenderer for HtmlRenderer {
        fn name(&self) -> &str {
            "html"
        }

        fn render(&self, scene: &ScatterScene, output: &Path) -> Result<()> {
            let page = self.to_html(scene)?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::write(output, page).map_err(|e| Error::io(output, e))?;
            info!(path = %output.display(), points = scene.points.len(), "scatter page written");
            Ok(())
        }
    }
}
