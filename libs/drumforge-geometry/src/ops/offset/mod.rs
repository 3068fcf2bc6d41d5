//! # Profile Offset
//!
//! Grows or shrinks closed outlines by a signed distance, and strokes open
//! paths into walls.
//!
//! ## Algorithm
//!
//! The offset is computed as a Minkowski sum with a tessellated disk, built
//! from a *band* around the boundary:
//!
//! 1. For each edge, a rectangle extending `|delta|` to both sides
//! 2. For each vertex, a join polygon centered on the vertex
//!    (a disk for [`CornerPolicy::Round`], a miter or bevel for
//!    [`CornerPolicy::Miter`])
//! 3. Positive delta: `region ∪ band`. Negative delta: `region \ band`.
//!    Open paths: the band alone.
//!
//! The pieces are merged with 2D booleans, so overlapping joins and
//! self-intersections of the raw offset curve resolve themselves.
//!
//! Disk joins start their angular subdivision at the two edge normals of the
//! convex side and split that fan into an even number of steps. The
//! bisector of every convex corner is therefore an exact offset vertex,
//! which keeps extents (for example the apex of an offset arc) exact.
//!
//! ## Example
//!
//! ```rust
//! use drumforge_geometry::ops::offset::{offset_polygon, OffsetParams};
//! use drumforge_geometry::profile::shapes::rectangle;
//! use config::constants::GeometryConfig;
//! use glam::DVec2;
//!
//! let config = GeometryConfig::default();
//! let square = rectangle(DVec2::splat(10.0), DVec2::ZERO);
//! let grown = offset_polygon(&square, &OffsetParams::round(1.0), &config)?;
//! assert!(grown.area() > 100.0);
//! # Ok::<(), drumforge_geometry::KernelError>(())
//! ```


use crate::error::{KernelError, KernelResult};
use crate::path::{Path, PathVertex};
use crate::profile::{Polygon2, Region};
use config::constants::{GeometryConfig, MIN_SEGMENTS};
use glam::DVec2;
use rayon::prelude::*;
use std::f64::consts::TAU;

/// Absorbs rounding when a sweep is an exact multiple of the step.
const STEP_SLACK: f64 = 1e-9;

// =============================================================================
// PARAMETERS
// =============================================================================

/// How convex corners of the offset outline are formed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CornerPolicy {
    /// Circular fillet of radius `|delta|`
    #[default]
    Round,
    /// Adjoining edges extended to their intersection, bevelled once the
    /// miter length exceeds `limit * |delta|`
    Miter { limit: f64 },
}

/// Parameters for an offset operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetParams {
    /// Signed distance (positive grows, negative shrinks)
    pub delta: f64,
    /// Corner treatment
    pub corners: CornerPolicy,
}

impl OffsetParams {
    /// Round-cornered offset.
    pub fn round(delta: f64) -> Self {
        Self {
            delta,
            corners: CornerPolicy::Round,
        }
    }

    /// Mitered offset with the given miter limit.
    pub fn miter(delta: f64, limit: f64) -> Self {
        Self {
            delta,
            corners: CornerPolicy::Miter { limit },
        }
    }

    fn validate(&self) -> KernelResult<()> {
        if !self.delta.is_finite() {
            return Err(KernelError::offset_overflow(
                self.delta,
                "is not a finite distance",
            ));
        }
        if let CornerPolicy::Miter { limit } = self.corners {
            if !(limit >= 1.0) {
                return Err(KernelError::geometry(format!(
                    "miter limit must be at least 1, got {limit}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self::round(0.0)
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Offsets several paths and unions their footprints.
///
/// Closed paths contribute the region they enclose, grown or shrunk by
/// `delta`. Open paths are stroked: they contribute every point within
/// `delta` of the path, which requires a positive delta.
///
/// # Errors
///
/// - [`KernelError::OffsetOverflow`] if an open path is stroked with a
///   non-positive delta, or a negative delta collapses or splits a closed
///   region
/// - [`KernelError::Geometry`] if a closed path does not form a valid
///   polygon
pub fn offset_paths(
    paths: &[Path],
    params: &OffsetParams,
    config: &GeometryConfig,
) -> KernelResult<Region> {
    params.validate()?;
    if paths.is_empty() {
        return Err(KernelError::geometry("offset requires at least one path"));
    }

    let (closed, open): (Vec<&Path>, Vec<&Path>) = paths
        .iter()
        .partition(|path| path.is_closed(config.path_epsilon));

    if !open.is_empty() && params.delta <= 0.0 {
        return Err(KernelError::offset_overflow(
            params.delta,
            "cannot stroke an open path; a positive distance is required",
        ));
    }

    let mut footprints = Vec::with_capacity(2);

    if !closed.is_empty() {
        let polygons = closed
            .iter()
            .map(|path| path.to_polygon(config))
            .collect::<KernelResult<Vec<_>>>()?;
        let fill = Region::union_all(polygons.into_iter().map(Region::from).collect());

        let footprint = if closed.len() == 1 && params.delta > 0.0 {
            // Keep the arc resolution of the path for the fillets.
            let ring = Ring {
                vertices: closed_ring(closed[0].vertices(config.path_epsilon)),
                closed: true,
            };
            fill.union(&band(&[ring], params, config))
        } else {
            offset_region(&fill, params, config)?
        };
        footprints.push(footprint);
    }

    if !open.is_empty() {
        let rings: Vec<Ring> = open
            .iter()
            .map(|path| Ring {
                vertices: path.vertices(config.path_epsilon),
                closed: false,
            })
            .collect();
        footprints.push(band(&rings, params, config));
    }

    Ok(Region::union_all(footprints))
}

/// Offsets a single polygon.
///
/// # Errors
///
/// See [`offset_region`].
pub fn offset_polygon(
    polygon: &Polygon2,
    params: &OffsetParams,
    config: &GeometryConfig,
) -> KernelResult<Region> {
    offset_region(&Region::from_polygon(polygon.clone()), params, config)
}

/// Offsets every polygon of a region.
///
/// # Errors
///
/// [`KernelError::OffsetOverflow`] if a negative delta makes a polygon
/// vanish, splits it into several pieces, or closes one of its holes.
pub fn offset_region(
    region: &Region,
    params: &OffsetParams,
    config: &GeometryConfig,
) -> KernelResult<Region> {
    params.validate()?;
    if params.delta == 0.0 || region.is_empty() {
        return Ok(region.clone());
    }

    if params.delta > 0.0 {
        let rings: Vec<Ring> = region.polygons().iter().flat_map(polygon_rings).collect();
        return Ok(region.union(&band(&rings, params, config)));
    }

    let mut shrunk = Vec::with_capacity(region.len());
    for (index, polygon) in region.polygons().iter().enumerate() {
        let rings = polygon_rings(polygon);
        let single = Region::from_polygon(polygon.clone());
        let result = single.difference(&band(&rings, params, config));
        if result.is_empty() {
            return Err(KernelError::offset_overflow(
                params.delta,
                format!("collapses polygon {index} to nothing"),
            ));
        }
        if result.len() > 1 {
            return Err(KernelError::offset_overflow(
                params.delta,
                format!(
                    "splits polygon {index} into {} pieces",
                    result.len()
                ),
            ));
        }
        let holes = result.polygons()[0].holes.len();
        if holes != polygon.holes.len() {
            return Err(KernelError::offset_overflow(
                params.delta,
                format!(
                    "changes polygon {index} from {} to {holes} holes",
                    polygon.holes.len()
                ),
            ));
        }
        shrunk.extend(result.polygons().iter().cloned());
    }
    Ok(Region::new(shrunk))
}

// =============================================================================
// BAND CONSTRUCTION
// =============================================================================

/// A boundary to offset: a closed ring or an open polyline.
struct Ring {
    vertices: Vec<PathVertex>,
    closed: bool,
}

fn polygon_rings(polygon: &Polygon2) -> Vec<Ring> {
    std::iter::once(&polygon.outer)
        .chain(polygon.holes.iter())
        .map(|ring| Ring {
            vertices: ring
                .iter()
                .map(|&point| PathVertex { point, step: None })
                .collect(),
            closed: true,
        })
        .collect()
}

/// Drops the repeated closing vertex of a closed path.
fn closed_ring(mut vertices: Vec<PathVertex>) -> Vec<PathVertex> {
    if vertices.len() > 1 {
        vertices.pop();
    }
    vertices
}

/// Every point within `|delta|` of the given boundaries.
fn band(rings: &[Ring], params: &OffsetParams, config: &GeometryConfig) -> Region {
    let distance = params.delta.abs();
    let default_step = TAU / f64::from(config.default_segments.max(MIN_SEGMENTS));

    let mut pieces: Vec<Polygon2> = Vec::new();
    for ring in rings {
        let vertices = &ring.vertices;
        let n = vertices.len();
        if n < 2 {
            continue;
        }
        let edge_count = if ring.closed { n } else { n - 1 };

        for i in 0..edge_count {
            let a = vertices[i].point;
            let b = vertices[(i + 1) % n].point;
            if let Some(rect) = edge_rectangle(a, b, distance) {
                pieces.push(rect);
            }
        }

        for i in 0..n {
            let vertex = vertices[i];
            let step = vertex.step.unwrap_or(default_step);
            let incoming = if ring.closed || i > 0 {
                Some(vertices[(i + n - 1) % n].point)
            } else {
                None
            };
            let outgoing = if ring.closed || i + 1 < n {
                Some(vertices[(i + 1) % n].point)
            } else {
                None
            };
            let join = match params.corners {
                CornerPolicy::Round => round_join(vertex.point, incoming, outgoing, distance, step)
                    .into_iter()
                    .collect(),
                CornerPolicy::Miter { limit } => {
                    miter_join(vertex.point, incoming, outgoing, distance, limit)
                }
            };
            pieces.extend(join);
        }
    }

    pieces
        .into_par_iter()
        .map(|piece| Region::from_polygon(piece.normalized()))
        .reduce(Region::default, |a, b| a.union(&b))
}

/// Unit left normal of the directed edge `a -> b`.
fn left_normal(a: DVec2, b: DVec2) -> Option<DVec2> {
    (b - a).try_normalize().map(DVec2::perp)
}

fn edge_rectangle(a: DVec2, b: DVec2, distance: f64) -> Option<Polygon2> {
    let offset = left_normal(a, b)? * distance;
    Some(Polygon2::new(vec![
        a - offset,
        b - offset,
        b + offset,
        a + offset,
    ]))
}

/// Normals of the convex side of the corner at a vertex, in sweep order.
///
/// Returns `None` for a straight continuation.
fn convex_normals(incoming: DVec2, vertex: DVec2, outgoing: DVec2) -> Option<(DVec2, DVec2)> {
    let n1 = left_normal(incoming, vertex)?;
    let n2 = left_normal(vertex, outgoing)?;
    let turn = (vertex - incoming).perp_dot(outgoing - vertex);
    if turn > 0.0 {
        Some((-n1, -n2))
    } else if turn < 0.0 {
        Some((n1, n2))
    } else if n1.dot(n2) < 0.0 {
        // Full reversal: both sides are convex, pick one consistently.
        Some((n1, n2))
    } else {
        None
    }
}

/// A full disk around the vertex whose subdivision includes both convex-side
/// normals and the bisector between them.
fn round_join(
    vertex: DVec2,
    incoming: Option<DVec2>,
    outgoing: Option<DVec2>,
    distance: f64,
    step: f64,
) -> Option<Polygon2> {
    let step = step.clamp(1e-6, TAU / f64::from(MIN_SEGMENTS));

    let (start, sweep) = match (incoming, outgoing) {
        (Some(prev), Some(next)) => match convex_normals(prev, vertex, next) {
            Some((u1, u2)) => (u1, u1.perp_dot(u2).atan2(u1.dot(u2))),
            None => (left_normal(prev, vertex)?, 0.0),
        },
        // Path end: split the disk at the edge normal so the cap meets the
        // edge rectangle corners exactly.
        (Some(prev), None) => (left_normal(prev, vertex)?, -std::f64::consts::PI),
        (None, Some(next)) => (left_normal(vertex, next)?, std::f64::consts::PI),
        (None, None) => return None,
    };

    let direction = if sweep < 0.0 { -1.0 } else { 1.0 };
    let convex_steps = if sweep == 0.0 {
        0
    } else {
        2 * ((sweep.abs() / (2.0 * step) - STEP_SLACK).ceil() as usize).max(1)
    };
    // Even on both arcs: the point opposite the bisector is a vertex too, so
    // inward offsets of tessellated arcs meet exactly at the arc center.
    let rest = TAU - sweep.abs();
    let rest_steps = 2 * ((rest / (2.0 * step) - STEP_SLACK).ceil() as usize).max(1);

    let start_angle = start.y.atan2(start.x);
    let mut points = Vec::with_capacity(convex_steps + rest_steps);
    for k in 0..convex_steps {
        let angle = start_angle + direction * sweep.abs() * k as f64 / convex_steps as f64;
        points.push(vertex + distance * DVec2::from_angle(angle));
    }
    let rest_start = start_angle + sweep;
    for k in 0..rest_steps {
        let angle = rest_start + direction * rest * k as f64 / rest_steps as f64;
        points.push(vertex + distance * DVec2::from_angle(angle));
    }
    Some(Polygon2::new(points))
}

/// Miter (or bevel) on the convex side plus a bevel on the other side.
fn miter_join(
    vertex: DVec2,
    incoming: Option<DVec2>,
    outgoing: Option<DVec2>,
    distance: f64,
    limit: f64,
) -> Vec<Polygon2> {
    let (Some(prev), Some(next)) = (incoming, outgoing) else {
        // Butt ends on open paths.
        return Vec::new();
    };
    let Some((u1, u2)) = convex_normals(prev, vertex, next) else {
        return Vec::new();
    };

    let mut joins = Vec::with_capacity(2);
    let cos_turn = u1.dot(u2);
    let ratio = (2.0 / (1.0 + cos_turn)).sqrt();
    if ratio.is_finite() && ratio <= limit {
        let tip = vertex + distance * (u1 + u2) / (1.0 + cos_turn);
        joins.push(Polygon2::new(vec![
            vertex,
            vertex + distance * u1,
            tip,
            vertex + distance * u2,
        ]));
    } else {
        joins.push(Polygon2::new(vec![
            vertex,
            vertex + distance * u1,
            vertex + distance * u2,
        ]));
    }
    // Concave side: where short edges leave the rectangles apart.
    joins.push(Polygon2::new(vec![
        vertex,
        vertex - distance * u1,
        vertex - distance * u2,
    ]));
    joins.retain(|join| crate::profile::signed_area(&join.outer).abs() > 0.0);
    joins
}
