//! Grid run orchestration.
//!
//! A run moves through three steps, each a separate value so a step cannot be
//! repeated or skipped:
//! - `GridRun::initialize`: validate spacing and selection, derive bounds.
//! - `GridRun::scan` → `Scanned`: walk the grid, classify, resolve, accumulate.
//! - `Scanned::report` → `Outcome`: publish the cloud (if any) and summarize.
//!
//! `run` chains them against the host seams. Only cancellation, a bad spacing
//! or a bad selection abort; lookup failures are absorbed with a fallback
//! height and counted.

use std::fmt;
use std::io;

use nalgebra::{Vector2, Vector3};

use crate::api::cloud_name;
use crate::geom2::{Bounds2, Polygon, PolygonError};
use crate::grid::{GridScan, GridSpacing};
use crate::height::HeightSource;
use crate::host::{
    HeightSample, Notifier, PointCloud, PointSink, Polyline, SelectionSource, Severity,
    SpacingSource,
};

/// Run configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCfg {
    pub spacing_min: f64,
    pub spacing_max: f64,
    /// Value a spacing dialog should preset.
    pub spacing_default: f64,
    /// Height stored for nodes whose lookup failed.
    pub fallback_height: f64,
    /// Emit a progress notification every this many accepted points (0 = never).
    pub progress_every: usize,
    pub color: [f32; 3],
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            spacing_min: 0.1,
            spacing_max: 100.0,
            spacing_default: 2.0,
            fallback_height: 0.0,
            progress_every: 50,
            color: [0.0, 0.6, 1.0],
        }
    }
}

/// Counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Points added to the cloud.
    pub accepted: usize,
    /// Height lookups issued.
    pub lookups: usize,
    /// Lookups that fell back.
    pub failed: usize,
}

impl RunSummary {
    /// Percentage of lookups that returned a height; `None` before any lookup.
    pub fn success_rate(&self) -> Option<f64> {
        if self.lookups == 0 {
            return None;
        }
        Some((self.lookups - self.failed) as f64 / self.lookups as f64 * 100.0)
    }
}

/// Reasons a run stops before scanning, or fails to hand over its result.
#[derive(Debug)]
pub enum RunError {
    UserCancelled,
    InvalidSpacing { value: f64, min: f64, max: f64 },
    /// Exactly one polyline must be selected.
    InvalidSelection { count: usize },
    PolylineNotClosed,
    InvalidPolygon(PolygonError),
    Publish(io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::UserCancelled => write!(f, "operation cancelled by user"),
            RunError::InvalidSpacing { value, min, max } => {
                write!(f, "grid spacing {value} outside [{min}, {max}]")
            }
            RunError::InvalidSelection { count } => {
                write!(f, "expected exactly one selected polyline, got {count}")
            }
            RunError::PolylineNotClosed => write!(f, "selected polyline is not closed"),
            RunError::InvalidPolygon(e) => write!(f, "invalid boundary: {e}"),
            RunError::Publish(e) => write!(f, "could not publish point cloud: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::InvalidPolygon(e) => Some(e),
            RunError::Publish(e) => Some(e),
            _ => None,
        }
    }
}

/// How a completed run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The cloud was handed to the sink.
    Published {
        cloud: PointCloud,
        summary: RunSummary,
    },
    /// No node fell inside the boundary; nothing was published.
    Empty { summary: RunSummary },
}

impl Outcome {
    pub fn summary(&self) -> RunSummary {
        match self {
            Outcome::Published { summary, .. } | Outcome::Empty { summary } => *summary,
        }
    }
}

/// A validated run, ready to scan.
#[derive(Clone, Debug)]
pub struct GridRun {
    polygon: Polygon,
    bounds: Bounds2,
    spacing: GridSpacing,
    cfg: GridCfg,
}

impl GridRun {
    /// Validate inputs received from the host and derive the bounding box.
    ///
    /// Failures are reported to `notifier` as errors before being returned.
    pub fn initialize<N: Notifier + ?Sized>(
        selection: &[Polyline],
        spacing: f64,
        cfg: GridCfg,
        notifier: &mut N,
    ) -> Result<Self, RunError> {
        let Some(spacing) = GridSpacing::new(spacing, cfg.spacing_min, cfg.spacing_max) else {
            let err = RunError::InvalidSpacing {
                value: spacing,
                min: cfg.spacing_min,
                max: cfg.spacing_max,
            };
            notifier.notify(Severity::Error, "Spacing Error", &err.to_string());
            return Err(err);
        };
        let [polyline] = selection else {
            notifier.notify(
                Severity::Error,
                "Selection Error",
                "Please select exactly one polyline",
            );
            return Err(RunError::InvalidSelection {
                count: selection.len(),
            });
        };
        if !polyline.closed {
            notifier.notify(
                Severity::Error,
                "Polyline Error",
                "The selected polyline must be closed",
            );
            return Err(RunError::PolylineNotClosed);
        }
        let polygon = Polygon::new(polyline.vertices.clone()).map_err(|e| {
            notifier.notify(Severity::Error, "Polyline Error", &e.to_string());
            RunError::InvalidPolygon(e)
        })?;
        let bounds = polygon.bounds();

        notifier.notify(
            Severity::Info,
            "Grid",
            &format!("Starting grid generation with {spacing}m spacing"),
        );
        notifier.notify(Severity::Info, "Grid", &format!("Bounding box: {bounds}"));

        Ok(Self {
            polygon,
            bounds,
            spacing,
            cfg,
        })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn bounds(&self) -> Bounds2 {
        self.bounds
    }

    pub fn spacing(&self) -> GridSpacing {
        self.spacing
    }

    /// Grid nodes the boundary accepts, in scan order. No lookups happen.
    pub fn accepted_candidates(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        GridScan::new(self.bounds, self.spacing).filter(|p| self.polygon.contains(*p))
    }

    /// Resolve a height for every accepted node, one blocking lookup at a time.
    pub fn scan<H, N>(self, heights: &mut H, notifier: &mut N) -> Scanned
    where
        H: HeightSource + ?Sized,
        N: Notifier + ?Sized,
    {
        let mut summary = RunSummary::default();
        let mut samples = Vec::new();

        for p in self.accepted_candidates() {
            summary.lookups += 1;
            let (z, fallback) = match heights.resolve_height(p) {
                Ok(z) => (z, false),
                Err(e) => {
                    summary.failed += 1;
                    notifier.notify(
                        Severity::Warning,
                        "Height Lookup",
                        &format!(
                            "Using fallback height {} for point E={:.2}, N={:.2}: {e}",
                            self.cfg.fallback_height, p.x, p.y
                        ),
                    );
                    (self.cfg.fallback_height, true)
                }
            };
            samples.push(HeightSample {
                position: Vector3::new(p.x, p.y, z),
                fallback,
            });
            summary.accepted += 1;

            let every = self.cfg.progress_every;
            if every > 0 && summary.accepted % every == 0 {
                notifier.notify(
                    Severity::Info,
                    "Progress",
                    &format!("{} points processed", summary.accepted),
                );
            }
        }

        Scanned {
            spacing: self.spacing,
            cfg: self.cfg,
            samples,
            summary,
        }
    }
}

/// Scan result awaiting publication.
#[derive(Clone, Debug)]
pub struct Scanned {
    spacing: GridSpacing,
    cfg: GridCfg,
    samples: Vec<HeightSample>,
    summary: RunSummary,
}

impl Scanned {
    pub fn samples(&self) -> &[HeightSample] {
        &self.samples
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Publish the cloud and emit the completion summary.
    ///
    /// With zero accepted points nothing reaches `sink`; a warning is emitted
    /// and the outcome is `Empty`.
    pub fn report<S, N>(self, sink: &mut S, notifier: &mut N) -> Result<Outcome, RunError>
    where
        S: PointSink + ?Sized,
        N: Notifier + ?Sized,
    {
        let summary = self.summary;
        if summary.accepted == 0 {
            notifier.notify(
                Severity::Warning,
                "No Results",
                "No points generated. Check grid spacing and polygon area.",
            );
            return Ok(Outcome::Empty { summary });
        }

        let cloud = PointCloud {
            name: cloud_name(self.spacing.get()),
            color: self.cfg.color,
            samples: self.samples,
        };
        if let Err(e) = sink.publish(&cloud) {
            notifier.notify(
                Severity::Error,
                "Output Error",
                &format!("Could not publish {}: {e}", cloud.name),
            );
            return Err(RunError::Publish(e));
        }

        let rate = summary
            .success_rate()
            .map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}%"));
        notifier.notify(
            Severity::Success,
            "Grid Generation Complete",
            &format!(
                "Successfully created {} height points\n\n\
                 Grid spacing: {}m\n\
                 API queries: {}\n\
                 Failed queries: {}\n\
                 Success rate: {rate}",
                summary.accepted, self.spacing, summary.lookups, summary.failed
            ),
        );
        notifier.notify(
            Severity::Info,
            "Grid",
            &format!("Cloud name: {}, total points: {}", cloud.name, summary.accepted),
        );

        Ok(Outcome::Published { cloud, summary })
    }
}

/// Full run against the host seams: dialog, selection, scan, report.
pub fn run<H, S, N>(
    selection: &dyn SelectionSource,
    dialog: &mut dyn SpacingSource,
    heights: &mut H,
    sink: &mut S,
    notifier: &mut N,
    cfg: GridCfg,
) -> Result<Outcome, RunError>
where
    H: HeightSource + ?Sized,
    S: PointSink + ?Sized,
    N: Notifier + ?Sized,
{
    let Some(spacing) = dialog.grid_spacing() else {
        notifier.notify(Severity::Info, "Cancelled", "Operation cancelled by user");
        return Err(RunError::UserCancelled);
    };
    let polylines = selection.selected_polylines();
    let grid = GridRun::initialize(&polylines, spacing, cfg, notifier)?;
    grid.scan(heights, notifier).report(sink, notifier)
}
