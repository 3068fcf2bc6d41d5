//! # Plane for BSP Operations
//!
//! Oriented plane with point classification against a distance tolerance.

use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Side of a plane a point or polygon lies on.
///
/// The discriminants are bit flags so that per-vertex sides can be OR-ed
/// into a polygon side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Classification {
    /// Within tolerance of the plane.
    Coplanar = 0,
    /// Positive side.
    Front = 1,
    /// Negative side.
    Back = 2,
    /// Vertices on both sides.
    Spanning = 3,
}

impl Classification {
    /// Combines the sides of two vertices into the side of their polygon.
    pub fn combine(self, other: Classification) -> Classification {
        match self as u8 | other as u8 {
            0 => Classification::Coplanar,
            1 => Classification::Front,
            2 => Classification::Back,
            _ => Classification::Spanning,
        }
    }
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane `normal · p = w` with unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Plane through three counter-clockwise points, `None` if they are
    /// collinear.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let normal = (b - a).cross(c - a).try_normalize()?;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Unit normal.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Same plane, facing the other way.
    pub fn flip(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Positive in front, negative behind.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Side of `point`, treating distances within `epsilon` as on the plane.
    pub fn classify_point(&self, point: DVec3, epsilon: f64) -> Classification {
        let distance = self.signed_distance(point);
        if distance > epsilon {
            Classification::Front
        } else if distance < -epsilon {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
