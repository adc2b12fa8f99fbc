//! Seams to the hosting application.
//!
//! The run never touches host objects directly. It reads a selection and a
//! spacing, writes one point cloud and emits notifications, all through the
//! traits below. Adapters live with the host (see the `gridheight` CLI).

use std::io;

use nalgebra::{Vector2, Vector3};

/// A polyline as the host reports it.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<Vector2<f64>>,
    pub closed: bool,
}

/// Yields the user's current boundary selection.
pub trait SelectionSource {
    fn selected_polylines(&self) -> Vec<Polyline>;
}

/// Yields the grid spacing from a dialog; `None` means the user cancelled.
pub trait SpacingSource {
    fn grid_spacing(&mut self) -> Option<f64>;
}

/// One resolved grid node. `fallback` marks a failed lookup (`z` is then the
/// configured fallback height).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightSample {
    pub position: Vector3<f64>,
    pub fallback: bool,
}

impl HeightSample {
    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }
    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }
    #[inline]
    pub fn z(&self) -> f64 {
        self.position.z
    }
}

/// Named, coloured collection handed to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    pub name: String,
    /// RGB in `[0, 1]`.
    pub color: [f32; 3],
    pub samples: Vec<HeightSample>,
}

/// Makes a point cloud persistent/visible in the host document.
pub trait PointSink {
    fn publish(&mut self, cloud: &PointCloud) -> io::Result<()>;
}

/// Notification severity, mirroring a host message dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

/// Receives user-facing messages. Never consulted for control flow.
pub trait Notifier {
    fn notify(&mut self, severity: Severity, title: &str, message: &str);
}

/// Collects notifications in memory; handy for tests and headless hosts.
#[derive(Clone, Debug, Default)]
pub struct Recorded {
    pub messages: Vec<(Severity, String, String)>,
}

impl Recorded {
    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|(s, _, _)| *s == severity).count()
    }
}

impl Notifier for Recorded {
    fn notify(&mut self, severity: Severity, title: &str, message: &str) {
        self.messages
            .push((severity, title.to_string(), message.to_string()));
    }
}

impl PointSink for Vec<PointCloud> {
    fn publish(&mut self, cloud: &PointCloud) -> io::Result<()> {
        self.push(cloud.clone());
        Ok(())
    }
}
