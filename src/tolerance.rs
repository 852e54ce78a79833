//! Epsilon-comparison configuration knob.
//!
//! Every scalar comparison in the engine goes through [`Tolerance`]; nothing
//! else should reach for a raw `==` on an `f64`. See DESIGN.md for why this
//! lives as a tiny standalone module rather than a method bag on `Point`.

/// A single configuration knob controlling how "equal", "less than", and
/// "greater than" are decided for floating point quantities throughout the
/// engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Absolute tolerance for lengths, coordinates, and arc-length positions.
    pub linear: f64,
    /// Absolute tolerance for angles (radians).
    pub angular: f64,
}

impl Tolerance {
    /// A tolerance appropriate for inputs in ordinary (non-geographic)
    /// planar coordinates.
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        angular: 1e-9,
    };

    pub fn eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.linear
    }

    pub fn lt(&self, a: f64, b: f64) -> bool {
        a < b - self.linear
    }

    pub fn gt(&self, a: f64, b: f64) -> bool {
        a > b + self.linear
    }

    pub fn is_zero(&self, a: f64) -> bool {
        a.abs() <= self.linear
    }

    pub fn angle_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An edge's classification relative to the other polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryValue {
    Inside,
    Outside,
    Boundary,
    Undefined,
}

/// A boundary-vs-boundary coincidence flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    Same,
    Opposite,
    None,
}
