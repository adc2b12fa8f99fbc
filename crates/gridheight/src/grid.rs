//! Grid spacing and candidate enumeration.
//!
//! Candidates are generated from integer step counts, not by accumulating a
//! floating step: node `(i, k)` sits at `(min_x + i·s, min_y + k·s)` for
//! `i ∈ 0..=nx`, `k ∈ 0..=ny`, with `nx = floor(width / s + STEP_EPS)`. The
//! candidate count therefore depends only on the bounds and the spacing, and a
//! far edge that lies on the grid (up to `STEP_EPS` steps) is included.
//!
//! Order is column-major: outer x, inner y.

use std::fmt;

use nalgebra::Vector2;

use crate::geom2::Bounds2;

/// Fraction of a step forgiven when counting steps across the bounds.
pub const STEP_EPS: f64 = 1e-9;

/// Validated distance between adjacent grid nodes, in metres.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct GridSpacing(f64);

impl GridSpacing {
    /// Accept `value` if finite, positive and within `[min, max]`.
    pub fn new(value: f64, min: f64, max: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0 && value >= min && value <= max).then_some(Self(value))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for GridSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of whole steps of `spacing` that fit in `extent`.
#[inline]
fn step_count(extent: f64, spacing: f64) -> u64 {
    if !(extent > 0.0) {
        return 0;
    }
    (extent / spacing + STEP_EPS).floor() as u64
}

/// Iterator over all grid nodes covering a bounding box.
#[derive(Clone, Debug)]
pub struct GridScan {
    origin: Vector2<f64>,
    spacing: f64,
    nx: u64,
    ny: u64,
    i: u64,
    k: u64,
}

impl GridScan {
    pub fn new(bounds: Bounds2, spacing: GridSpacing) -> Self {
        let s = spacing.get();
        Self {
            origin: Vector2::new(bounds.min_x, bounds.min_y),
            spacing: s,
            nx: step_count(bounds.width(), s),
            ny: step_count(bounds.height(), s),
            i: 0,
            k: 0,
        }
    }

    /// Columns (x positions) in the scan.
    #[inline]
    pub fn columns(&self) -> u64 {
        self.nx + 1
    }

    /// Rows (y positions) in the scan.
    #[inline]
    pub fn rows(&self) -> u64 {
        self.ny + 1
    }

    /// Total candidates the scan yields from the start.
    #[inline]
    pub fn candidate_count(&self) -> u64 {
        self.columns() * self.rows()
    }

    #[inline]
    fn node(&self, i: u64, k: u64) -> Vector2<f64> {
        Vector2::new(
            self.origin.x + i as f64 * self.spacing,
            self.origin.y + k as f64 * self.spacing,
        )
    }
}

impl Iterator for GridScan {
    type Item = Vector2<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i > self.nx {
            return None;
        }
        let p = self.node(self.i, self.k);
        if self.k == self.ny {
            self.k = 0;
            self.i += 1;
        } else {
            self.k += 1;
        }
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.i > self.nx {
            return (0, Some(0));
        }
        let left = (self.nx - self.i) * self.rows() + (self.rows() - self.k);
        match usize::try_from(left) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
