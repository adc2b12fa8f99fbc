//! Curated surface for the CLI and other adapters (UNSTABLE).
//!
//! Prefer these re-exports over reaching into submodules; the module layout
//! behind them may move.

// 2D geometry
pub use crate::geom2::{point_in_polygon, Bounds2, Polygon, PolygonError};
// Grid
pub use crate::grid::{GridScan, GridSpacing};
// Height lookup
pub use crate::height::{
    parse_height, HeightSource, HttpTransport, LookupError, SwisstopoCfg, SwisstopoResolver,
    Transport, DEFAULT_ENDPOINT,
};
// Host seams
pub use crate::host::{
    HeightSample, Notifier, PointCloud, PointSink, Polyline, Recorded, SelectionSource, Severity,
    SpacingSource,
};
// Orchestration
pub use crate::driver::{run, GridCfg, GridRun, Outcome, RunError, RunSummary, Scanned};

/// Name of the output cloud for a given spacing, e.g. `Swisstopo_Grid_Heights_2m`.
pub fn cloud_name(spacing: f64) -> String {
    format!("Swisstopo_Grid_Heights_{spacing}m")
}
