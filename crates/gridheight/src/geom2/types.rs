//! Boundary polygon and its axis-aligned bounds.

use std::fmt;

use nalgebra::Vector2;

use super::classify::point_in_polygon;

/// Why a vertex list cannot be used as a boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonError {
    /// Fewer than three distinct ring vertices.
    TooFewVertices { count: usize },
    /// A coordinate is NaN or infinite.
    NonFinite { index: usize },
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonError::TooFewVertices { count } => {
                write!(f, "polygon needs at least 3 vertices, got {count}")
            }
            PolygonError::NonFinite { index } => {
                write!(f, "vertex {index} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for PolygonError {}

/// Closed boundary ring, stored without a repeated closing vertex.
///
/// Invariants:
/// - at least 3 vertices, all finite;
/// - the last vertex connects back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vector2<f64>>,
}

impl Polygon {
    /// Build from an ordered vertex list. A trailing copy of the first vertex
    /// (common for closed polylines) is dropped.
    pub fn new(mut vertices: Vec<Vector2<f64>>) -> Result<Self, PolygonError> {
        if let Some(index) = vertices
            .iter()
            .position(|v| !(v.x.is_finite() && v.y.is_finite()))
        {
            return Err(PolygonError::NonFinite { index });
        }
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(PolygonError::TooFewVertices {
                count: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Even-odd membership; see [`point_in_polygon`].
    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        point_in_polygon(&self.vertices, p)
    }

    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_points(&self.vertices)
    }
}

/// Axis-aligned rectangle `[min_x, max_x] × [min_y, max_y]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds2 {
    /// Tight bounds of a point set. Empty input gives an inverted (empty) box.
    pub fn from_points(points: &[Vector2<f64>]) -> Self {
        points.iter().fold(
            Self {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

impl fmt::Display for Bounds2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X({:.2} - {:.2}), Y({:.2} - {:.2})",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}
