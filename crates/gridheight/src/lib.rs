//! Ground-height grids inside a closed boundary polygon.
//!
//! A run steps a regular grid over the polygon's bounding box, keeps the nodes
//! the even-odd classifier accepts, resolves one elevation per node from the
//! swisstopo height service (LV95 / EPSG:2056) and hands the resulting point
//! cloud to a host sink.
//!
//! Layout
//! - `geom2`: polygon, bounds and the point-in-polygon test.
//! - `grid`: spacing validation and integer-step candidate enumeration.
//! - `height`: the `HeightSource` seam and the blocking HTTP resolver.
//! - `host`: narrow traits for selection, dialog, output and notifications.
//! - `driver`: the run itself (initialize → scan → report).
//!
//! Coordinates are taken as-is; no reprojection happens anywhere.

pub mod api;
pub mod driver;
pub mod geom2;
pub mod grid;
pub mod height;
pub mod host;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::driver::{run, GridCfg, GridRun, Outcome, RunError, RunSummary, Scanned};
    pub use crate::geom2::{point_in_polygon, Bounds2, Polygon};
    pub use crate::grid::{GridScan, GridSpacing};
    pub use crate::height::{HeightSource, LookupError, SwisstopoCfg, SwisstopoResolver};
    pub use crate::host::{
        HeightSample, Notifier, PointCloud, PointSink, Polyline, SelectionSource, Severity,
        SpacingSource,
    };
    pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};
}
