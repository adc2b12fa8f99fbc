//! Planar geometry for boundary polygons.
//!
//! Purpose
//! - Hold the user's boundary as an implicitly closed vertex ring (`Polygon`).
//! - Provide the axis-aligned `Bounds2` the grid is stepped over.
//! - Classify candidate nodes with the even-odd ray-casting rule.
//!
//! Numerics
//! - The classifier adds `CLASSIFY_EPS` to the edge-intercept denominator so
//!   horizontal edges never divide by zero. Points exactly on the boundary get
//!   whatever the arithmetic yields; callers must not rely on them.

mod classify;
mod types;

pub use classify::{point_in_polygon, CLASSIFY_EPS};
pub use types::{Bounds2, Polygon, PolygonError};

#[cfg(test)]
mod tests;
