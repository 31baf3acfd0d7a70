//! Pose and planar-geometry value types.
//!
//! Poses arrive from the external messaging layer as a position plus an
//! orientation quaternion.  This module treats them as opaque value types
//! with exactly the operations the route manager needs: planar distance,
//! yaw extraction, normalized yaw difference, and decomposition of a target
//! point into the (longitudinal, lateral) components of a pose's heading
//! frame.
//!
//! All coordinates are `f64` in map units (metres in practice).  Lane
//! geometry is treated as planar; `z` is carried through untouched.

use std::f64::consts::PI;
use std::fmt;

// ── Angles ────────────────────────────────────────────────────────────────────

/// Wrap an angle in radians into `(-π, π]`.
#[inline]
pub fn normalize_angle(mut a: f64) -> f64 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

// ── Point2 ────────────────────────────────────────────────────────────────────

/// A planar map-frame point.  Centerline geometry is stored as `Point2`s.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(self, other: Point2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Quaternion ────────────────────────────────────────────────────────────────

/// An orientation quaternion in `(x, y, z, w)` message order.
///
/// The route manager only ever consumes the heading (yaw) component;
/// roll/pitch pass through untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    /// The identity rotation (yaw 0).
    pub const IDENTITY: Quaternion = Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Construct a pure-yaw quaternion (rotation about +z).
    pub fn from_yaw(yaw: f64) -> Self {
        let half = yaw * 0.5;
        Self { x: 0.0, y: 0.0, z: half.sin(), w: half.cos() }
    }

    /// Extract the heading (rotation about +z) in radians, `(-π, π]`.
    pub fn yaw(self) -> f64 {
        let siny_cosp = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy_cosp = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        siny_cosp.atan2(cosy_cosp)
    }
}

impl Default for Quaternion {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ── Pose ──────────────────────────────────────────────────────────────────────

/// A map-frame pose: position `(x, y, z)` plus orientation quaternion.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub orientation: Quaternion,
}

impl Pose {
    pub fn new(x: f64, y: f64, z: f64, orientation: Quaternion) -> Self {
        Self { x, y, z, orientation }
    }

    /// Convenience constructor for planar poses with a yaw heading.
    pub fn planar(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, z: 0.0, orientation: Quaternion::from_yaw(yaw) }
    }

    /// The planar projection of the position.
    #[inline]
    pub fn point2(&self) -> Point2 {
        Point2 { x: self.x, y: self.y }
    }

    /// Heading in radians, `(-π, π]`.
    #[inline]
    pub fn yaw(&self) -> f64 {
        self.orientation.yaw()
    }

    /// Planar (xy) distance to `other`.  `z` is ignored.
    #[inline]
    pub fn planar_distance(&self, other: &Pose) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Normalized heading difference `other − self`, in `(-π, π]`.
    #[inline]
    pub fn yaw_difference(&self, other: &Pose) -> f64 {
        normalize_angle(other.yaw() - self.yaw())
    }

    /// Decompose `target` into this pose's heading frame.
    ///
    /// Returns `(longitudinal, lateral)`: longitudinal is positive ahead of
    /// the pose along its heading, lateral is positive to the left.
    pub fn heading_frame_offset(&self, target: Point2) -> (f64, f64) {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let (sin, cos) = self.yaw().sin_cos();
        (dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3}) yaw {:.3}", self.x, self.y, self.z, self.yaw())
    }
}
