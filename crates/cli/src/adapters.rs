//! Command-line stand-ins for the host seams: boundary file, spacing prompt,
//! point-cloud file and `tracing` notifications.

use anyhow::{Context, Result};
use gridheight::api::{
    Notifier, PointCloud, PointSink, Polyline, SelectionSource, Severity, SpacingSource,
};
use gridheight::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct SelectionDoc {
    polylines: Vec<PolylineDoc>,
}

#[derive(Deserialize)]
struct PolylineDoc {
    /// Absent: closed iff the first and last vertex coincide.
    #[serde(default)]
    closed: Option<bool>,
    vertices: Vec<[f64; 2]>,
}

/// Selection read from `{"polylines": [{"closed": true, "vertices": [[x, y], ...]}]}`.
#[derive(Clone, Debug)]
pub struct JsonSelection {
    polylines: Vec<Polyline>,
}

impl JsonSelection {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let doc: SelectionDoc = serde_json::from_slice(raw)?;
        let polylines = doc
            .polylines
            .into_iter()
            .map(|p| {
                let vertices: Vec<Vec2<f64>> =
                    p.vertices.iter().map(|&[x, y]| Vec2::new(x, y)).collect();
                let closed = p
                    .closed
                    .unwrap_or_else(|| vertices.len() > 1 && vertices.first() == vertices.last());
                Polyline { vertices, closed }
            })
            .collect();
        Ok(Self { polylines })
    }
}

impl SelectionSource for JsonSelection {
    fn selected_polylines(&self) -> Vec<Polyline> {
        self.polylines.clone()
    }
}

/// Spacing from a flag, or asked for interactively.
///
/// Prompt rules: empty line takes the default, `q` or end of input cancels,
/// anything unparseable or out of range is asked again.
pub struct SpacingPrompt<R, W> {
    preset: Option<f64>,
    default: f64,
    range: (f64, f64),
    input: R,
    out: W,
    chosen: Option<f64>,
}

impl<R: BufRead, W: Write> SpacingPrompt<R, W> {
    pub fn new(preset: Option<f64>, default: f64, range: (f64, f64), input: R, out: W) -> Self {
        Self {
            preset,
            default,
            range,
            input,
            out,
            chosen: None,
        }
    }

    /// Value handed to the run, if any.
    pub fn chosen(&self) -> Option<f64> {
        self.chosen
    }

    fn ask(&mut self) -> Option<f64> {
        let (min, max) = self.range;
        loop {
            write!(
                self.out,
                "Grid spacing [m] ({min}-{max}, default {}): ",
                self.default
            )
            .ok()?;
            self.out.flush().ok()?;
            let mut line = String::new();
            if self.input.read_line(&mut line).ok()? == 0 {
                return None;
            }
            let t = line.trim();
            if t.is_empty() {
                return Some(self.default);
            }
            if t.eq_ignore_ascii_case("q") {
                return None;
            }
            match t.parse::<f64>() {
                Ok(v) if v >= min && v <= max => return Some(v),
                Ok(v) => writeln!(self.out, "{v} is outside {min}-{max}").ok()?,
                Err(_) => writeln!(self.out, "not a number: {t}").ok()?,
            }
        }
    }
}

impl<R: BufRead, W: Write> SpacingSource for SpacingPrompt<R, W> {
    fn grid_spacing(&mut self) -> Option<f64> {
        let v = match self.preset {
            Some(v) => Some(v),
            None => self.ask(),
        };
        self.chosen = v;
        v
    }
}

#[derive(Serialize)]
struct CloudDoc<'a> {
    name: &'a str,
    color: [f32; 3],
    points: Vec<PointDoc>,
}

#[derive(Serialize)]
struct PointDoc {
    x: f64,
    y: f64,
    z: f64,
    fallback: bool,
}

/// Writes the cloud to disk: CSV for `*.csv`, pretty JSON otherwise.
pub struct CloudFile {
    path: PathBuf,
}

impl CloudFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
    }
}

impl PointSink for CloudFile {
    fn publish(&mut self, cloud: &PointCloud) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut w = io::BufWriter::new(fs::File::create(&self.path)?);
        if self.is_csv() {
            writeln!(w, "x,y,z,fallback")?;
            for s in &cloud.samples {
                writeln!(w, "{},{},{},{}", s.x(), s.y(), s.z(), s.fallback)?;
            }
        } else {
            let doc = CloudDoc {
                name: &cloud.name,
                color: cloud.color,
                points: cloud
                    .samples
                    .iter()
                    .map(|s| PointDoc {
                        x: s.x(),
                        y: s.y(),
                        z: s.z(),
                        fallback: s.fallback,
                    })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut w, &doc)?;
            writeln!(w)?;
        }
        w.flush()
    }
}

/// Routes notifications to `tracing`.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, severity: Severity, title: &str, message: &str) {
        match severity {
            Severity::Info => tracing::info!(title, "{message}"),
            Severity::Warning => tracing::warn!(title, "{message}"),
            Severity::Error => tracing::error!(title, "{message}"),
            Severity::Success => tracing::info!(title, outcome = "success", "{message}"),
        }
    }
}
