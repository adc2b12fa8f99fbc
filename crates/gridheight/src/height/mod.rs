//! Elevation lookup for single grid nodes.
//!
//! Contract
//! - `HeightSource::resolve_height(p)` returns the ground height at `p` or a
//!   `LookupError`. The error is the "not found" marker: callers substitute a
//!   fallback and carry on. Nothing in here panics on bad input from the wire.
//! - One blocking request per call. No retry, no cache, no batching.
//!
//! The production source is `SwisstopoResolver`, which talks to the swisstopo
//! height service through a `Transport`. The response body is held in memory
//! for the duration of the call only; there is no scratch file to clean up.

mod swisstopo;

pub use swisstopo::{
    HttpTransport, SwisstopoCfg, SwisstopoResolver, Transport, DEFAULT_ENDPOINT, USER_AGENT,
};

use std::fmt;

use nalgebra::Vector2;
use serde_json::Value;

/// Why a height could not be resolved for one coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Connection, TLS, timeout or body read failure.
    Transport(String),
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The response body was empty or whitespace.
    EmptyBody,
    /// The body is not a JSON object.
    Malformed(String),
    /// The object has no `height` field.
    MissingHeight,
    /// `height` is present but not a finite number.
    NonNumericHeight(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Transport(msg) => write!(f, "request failed: {msg}"),
            LookupError::Status(code) => write!(f, "service returned HTTP {code}"),
            LookupError::EmptyBody => write!(f, "empty response body"),
            LookupError::Malformed(msg) => write!(f, "unparseable response: {msg}"),
            LookupError::MissingHeight => write!(f, "response has no height field"),
            LookupError::NonNumericHeight(raw) => write!(f, "height is not numeric: {raw}"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Anything that can turn a planar coordinate into a ground height.
pub trait HeightSource {
    fn resolve_height(&mut self, p: Vector2<f64>) -> Result<f64, LookupError>;
}

impl<F> HeightSource for F
where
    F: FnMut(Vector2<f64>) -> Result<f64, LookupError>,
{
    #[inline]
    fn resolve_height(&mut self, p: Vector2<f64>) -> Result<f64, LookupError> {
        self(p)
    }
}

/// Extract `height` from a service response body.
///
/// Accepts a JSON number or a numeric string (the live service sends the
/// latter, e.g. `{"height":"1234.5"}`). Every other shape is an error.
pub fn parse_height(body: &[u8]) -> Result<f64, LookupError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(LookupError::EmptyBody);
    }
    let doc: Value =
        serde_json::from_slice(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    let obj = doc
        .as_object()
        .ok_or_else(|| LookupError::Malformed("expected a JSON object".to_string()))?;
    let raw = obj.get("height").ok_or(LookupError::MissingHeight)?;
    let h = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match h {
        Some(h) if h.is_finite() => Ok(h),
        _ => Err(LookupError::NonNumericHeight(raw.to_string())),
    }
}

#[cfg(test)]
mod tests;
