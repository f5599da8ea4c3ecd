//! Projected planar coordinates.
//!
//! Network and plan files use a projected CRS (metres), not WGS-84, so a
//! point is a plain `(x, y)` pair in `f64`.  An unresolvable location is
//! represented by [`Coord::UNRESOLVED`] (both components NaN) rather than an
//! `Option`, matching how downstream tables store missing coordinates.

/// A point in the network's projected coordinate system.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    /// Sentinel for "location unknown".
    pub const UNRESOLVED: Coord = Coord { x: f64::NAN, y: f64::NAN };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build from optional components; any missing component yields NaN.
    pub fn from_parts(x: Option<f64>, y: Option<f64>) -> Self {
        Self {
            x: x.unwrap_or(f64::NAN),
            y: y.unwrap_or(f64::NAN),
        }
    }

    /// `true` when both components are finite.
    #[inline]
    pub fn is_resolved(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self::UNRESOLVED
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
