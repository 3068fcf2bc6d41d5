//! # Profiles
//!
//! Closed 2D outlines that feed the extruders.
//!
//! - [`Polygon2`]: one outer boundary plus holes
//! - [`Region`]: a set of disjoint polygons with 2D booleans
//! - [`shapes`]: rectangles, circles, sectors, ASA triangles, rounded rectangles
//!
//! A polygon must pass [`Polygon2::validate`] before it is extruded: at least
//! three vertices per ring, non-zero area, no self-intersections, holes
//! strictly inside the outer boundary and disjoint from each other.

mod region;
pub mod shapes;
pub(crate) mod triangulate;

#[cfg(test)]
mod tests;

pub use region::Region;

use crate::error::{KernelError, KernelResult};
use config::constants::GeometryConfig;
use glam::DVec2;
use robust::{orient2d, Coord};

/// A 2D polygon with holes.
///
/// After [`Polygon2::normalized`] the outer boundary winds counter-clockwise
/// and every hole winds clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2 {
    /// Outer boundary vertices
    pub outer: Vec<DVec2>,
    /// Inner holes
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon2 {
    /// Creates a polygon without holes.
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    pub fn with_holes(outer: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Self {
        Self { outer, holes }
    }

    /// Returns the number of vertices over all rings.
    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Returns true if the polygon has holes.
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// All ring vertices, outer first, then each hole in order.
    pub fn flat_points(&self) -> Vec<DVec2> {
        let mut points = self.outer.clone();
        for hole in &self.holes {
            points.extend_from_slice(hole);
        }
        points
    }

    /// Enclosed area (outer minus holes), independent of winding.
    pub fn area(&self) -> f64 {
        signed_area(&self.outer).abs()
            - self
                .holes
                .iter()
                .map(|hole| signed_area(hole).abs())
                .sum::<f64>()
    }

    /// Axis-aligned bounds of the outer boundary.
    pub fn bounding_box(&self) -> (DVec2, DVec2) {
        let first = self.outer.first().copied().unwrap_or(DVec2::ZERO);
        self.outer
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)))
    }

    /// Returns a copy with the outer ring counter-clockwise and holes
    /// clockwise.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if signed_area(&self.outer) < 0.0 {
            self.outer.reverse();
        }
        for hole in &mut self.holes {
            if signed_area(hole) > 0.0 {
                hole.reverse();
            }
        }
        self
    }

    /// Removes repeated and collinear vertices closer than `epsilon` to the
    /// line through their neighbours. Rings that collapse are dropped
    /// (an empty outer ring means the whole polygon vanished).
    #[must_use]
    pub fn simplified(&self, epsilon: f64) -> Self {
        let outer = simplify_ring(&self.outer, epsilon);
        let holes = self
            .holes
            .iter()
            .map(|hole| simplify_ring(hole, epsilon))
            .filter(|hole| hole.len() >= 3)
            .collect();
        Self { outer, holes }
    }

    /// Translated copy.
    #[must_use]
    pub fn translated(&self, offset: DVec2) -> Self {
        self.map_points(|p| p + offset)
    }

    /// Copy rotated counter-clockwise about the origin.
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        let rotation = DVec2::from_angle(angle);
        self.map_points(|p| rotation.rotate(p))
    }

    /// Copy mirrored across the Y axis (x -> -x), re-normalized.
    #[must_use]
    pub fn mirrored_x(&self) -> Self {
        self.map_points(|p| DVec2::new(-p.x, p.y)).normalized()
    }

    fn map_points(&self, f: impl Fn(DVec2) -> DVec2) -> Self {
        Self {
            outer: self.outer.iter().map(|p| f(*p)).collect(),
            holes: self
                .holes
                .iter()
                .map(|hole| hole.iter().map(|p| f(*p)).collect())
                .collect(),
        }
    }

    /// Checks the polygon can be extruded.
    ///
    /// # Errors
    ///
    /// [`KernelError::Geometry`] describing the first defect found.
    pub fn validate(&self, config: &GeometryConfig) -> KernelResult<()> {
        let rings: Vec<&[DVec2]> = std::iter::once(self.outer.as_slice())
            .chain(self.holes.iter().map(Vec::as_slice))
            .collect();

        for (index, ring) in rings.iter().enumerate() {
            if ring.len() < 3 {
                return Err(KernelError::geometry(format!(
                    "ring {index} has {} vertices, at least 3 required",
                    ring.len()
                )));
            }
            if ring.iter().any(|p| !p.is_finite()) {
                return Err(KernelError::geometry(format!(
                    "ring {index} has a non-finite vertex"
                )));
            }
            if signed_area(ring).abs() <= config.area_epsilon {
                return Err(KernelError::geometry(format!(
                    "ring {index} encloses no area"
                )));
            }
        }

        check_simple(&rings)?;

        for (index, hole) in self.holes.iter().enumerate() {
            if !point_in_ring(hole[0], &self.outer) {
                return Err(KernelError::geometry(format!(
                    "hole {index} lies outside the outer boundary"
                )));
            }
            for (other_index, other) in self.holes.iter().enumerate() {
                if other_index != index && point_in_ring(hole[0], other) {
                    return Err(KernelError::geometry(format!(
                        "hole {index} lies inside hole {other_index}"
                    )));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// RING HELPERS
// =============================================================================

/// Shoelace signed area; positive for counter-clockwise rings.
pub(crate) fn signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| ring[i].perp_dot(ring[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

/// Exact orientation of `c` relative to the directed line `a -> b`.
pub(crate) fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

/// Even-odd point in ring test.
pub(crate) fn point_in_ring(point: DVec2, ring: &[DVec2]) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn simplify_ring(ring: &[DVec2], epsilon: f64) -> Vec<DVec2> {
    let mut points: Vec<DVec2> = Vec::with_capacity(ring.len());
    for p in ring {
        if points.last().map_or(true, |last| last.distance(*p) > epsilon) {
            points.push(*p);
        }
    }
    while points.len() > 1 && points[0].distance(points[points.len() - 1]) <= epsilon {
        points.pop();
    }

    // Drop collinear vertices until stable.
    let mut changed = true;
    while changed && points.len() >= 3 {
        changed = false;
        let mut i = 0;
        while i < points.len() && points.len() >= 3 {
            let n = points.len();
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            if distance_to_line(points[i], prev, next) <= epsilon {
                points.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }
    if points.len() < 3 {
        points.clear();
    }
    points
}

fn distance_to_line(point: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let length = ab.length();
    if length <= f64::EPSILON {
        return point.distance(a);
    }
    (ab.perp_dot(point - a) / length).abs()
}

/// Rejects any pair of crossing or touching edges across all rings.
fn check_simple(rings: &[&[DVec2]]) -> KernelResult<()> {
    let mut edges: Vec<(usize, usize, DVec2, DVec2)> = Vec::new();
    for (r, ring) in rings.iter().enumerate() {
        let n = ring.len();
        for i in 0..n {
            edges.push((r, i, ring[i], ring[(i + 1) % n]));
        }
    }

    for (a_index, &(ring_a, i, p1, p2)) in edges.iter().enumerate() {
        if p1 == p2 {
            return Err(KernelError::geometry(format!(
                "ring {ring_a} has a zero-length edge at vertex {i}"
            )));
        }
        let (min_a, max_a) = (p1.min(p2), p1.max(p2));
        for &(ring_b, j, q1, q2) in &edges[a_index + 1..] {
            if q1.max(q2).cmplt(min_a).any() || q1.min(q2).cmpgt(max_a).any() {
                continue;
            }
            let len = rings[ring_a].len();
            let adjacent = ring_a == ring_b && (j == (i + 1) % len || i == (j + 1) % len);
            if adjacent {
                // Shared vertex: only a fold back onto the other edge is a defect.
                let (shared, a_far, b_far) = if j == (i + 1) % len { (p2, p1, q2) } else { (p1, p2, q1) };
                if orient(a_far, shared, b_far) == 0.0 && (a_far - shared).dot(b_far - shared) > 0.0 {
                    return Err(KernelError::geometry(format!(
                        "ring {ring_a} folds back on itself at vertex {}",
                        if j == (i + 1) % len { j } else { i }
                    )));
                }
                continue;
            }
            if segments_intersect(p1, p2, q1, q2) {
                return Err(KernelError::geometry(format!(
                    "profile self-intersects: ring {ring_a} edge {i} meets ring {ring_b} edge {j}"
                )));
            }
        }
    }
    Ok(())
}

fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }
    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// For a point known to be collinear with `a -> b`, whether it lies within
/// the segment's extent.
fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.cmpge(a.min(b)).all() && p.cmple(a.max(b)).all()
}
