//! # Path Builder
//!
//! Ordered 2D paths made of straight lines and tessellated circular arcs.
//!
//! ## Continuity
//!
//! Every segment must start where the previous one ended, within
//! [`GeometryConfig::path_epsilon`]. [`PathBuilder`] enforces this when a
//! segment is appended and reports [`KernelError::DiscontinuousPath`]
//! otherwise.
//!
//! ## Arcs
//!
//! An [`Arc`] sweeps from `start_angle` to `end_angle` (radians). A positive
//! difference sweeps counter-clockwise, a negative one clockwise, and the
//! magnitude may not exceed a full turn. The arc is tessellated into
//! `segments` equal angular steps, so the chord error is
//! `radius * (1 - cos(step / 2))`.
//!
//! ## Example
//!
//! ```rust
//! use drumforge_geometry::path::{Arc, PathBuilder};
//! use config::constants::GeometryConfig;
//! use glam::DVec2;
//! use std::f64::consts::PI;
//!
//! let config = GeometryConfig::default();
//! let mut builder = PathBuilder::new(&config);
//! builder
//!     .add_arc(Arc::new(DVec2::ZERO, 1.0, 0.0, PI, 8))?
//!     .add_line(DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0))?;
//! let path = builder.finish()?;
//! assert!(path.is_closed(config.path_epsilon));
//! # Ok::<(), drumforge_geometry::KernelError>(())
//! ```

use crate::error::{KernelError, KernelResult};
use crate::profile::Polygon2;
use config::constants::{GeometryConfig, MAX_SEGMENTS};
use glam::DVec2;
use std::f64::consts::TAU;


/// Fraction of one angular step used for tangent lead-in/lead-out points.
const TANGENT_STEP_FRACTION: f64 = 0.01;

// =============================================================================
// SEGMENTS
// =============================================================================

/// A circular arc segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    /// Arc center
    pub center: DVec2,
    /// Arc radius (positive)
    pub radius: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians; the sign of `end - start` is the sweep direction
    pub end_angle: f64,
    /// Number of equal angular steps
    pub segments: u32,
    /// Continue the direction of the preceding segment; the builder turns
    /// the arc about its start point to match
    pub tangent: bool,
}

impl Arc {
    /// Creates an arc without tangent lead-ins.
    pub fn new(center: DVec2, radius: f64, start_angle: f64, end_angle: f64, segments: u32) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            segments,
            tangent: false,
        }
    }

    /// Makes the arc continue the direction of the segment before it, with
    /// short lead-in/lead-out points along the true tangent.
    #[must_use]
    pub fn tangent(mut self) -> Self {
        self.tangent = true;
        self
    }

    /// Signed sweep angle.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Angle covered by one tessellation step.
    pub fn step(&self) -> f64 {
        self.sweep().abs() / self.segments.max(1) as f64
    }

    /// Point on the arc at `angle`.
    pub fn point_at(&self, angle: f64) -> DVec2 {
        self.center + self.radius * DVec2::new(angle.cos(), angle.sin())
    }

    /// First point.
    pub fn start_point(&self) -> DVec2 {
        self.point_at(self.start_angle)
    }

    /// Last point.
    pub fn end_point(&self) -> DVec2 {
        self.point_at(self.end_angle)
    }

    /// Unit direction of travel at `angle`.
    fn direction_at(&self, angle: f64) -> DVec2 {
        let travel = DVec2::new(-angle.sin(), angle.cos());
        if self.sweep() < 0.0 {
            -travel
        } else {
            travel
        }
    }

    /// Unit direction in which the arc leaves its start point.
    pub fn start_direction(&self) -> DVec2 {
        self.direction_at(self.start_angle)
    }

    /// Unit direction in which the arc arrives at its end point.
    pub fn end_direction(&self) -> DVec2 {
        self.direction_at(self.end_angle)
    }

    /// The same arc turned about its start point until it leaves along
    /// `direction`. Radius, sweep and start point are kept.
    #[must_use]
    pub fn tangent_to(&self, direction: DVec2) -> Self {
        let Some(direction) = direction.try_normalize() else {
            return *self;
        };
        let current = self.start_direction();
        let turn = current.perp_dot(direction).atan2(current.dot(direction));
        let pivot = self.start_point();
        Self {
            center: pivot + DVec2::from_angle(turn).rotate(self.center - pivot),
            start_angle: self.start_angle + turn,
            end_angle: self.end_angle + turn,
            ..*self
        }
    }

    fn validate(&self) -> KernelResult<()> {
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(KernelError::geometry(format!(
                "arc radius must be positive, got {}",
                self.radius
            )));
        }
        if self.segments == 0 || self.segments > MAX_SEGMENTS {
            return Err(KernelError::geometry(format!(
                "arc segments must be in 1..={MAX_SEGMENTS}, got {}",
                self.segments
            )));
        }
        let sweep = self.sweep();
        if !sweep.is_finite() || sweep == 0.0 || sweep.abs() > TAU + 1e-12 {
            return Err(KernelError::geometry(format!(
                "arc sweep must be non-zero and at most one turn, got {sweep}"
            )));
        }
        if !self.center.is_finite() {
            return Err(KernelError::geometry("arc center must be finite"));
        }
        Ok(())
    }

    /// Tessellated points from start to end inclusive.
    pub fn points(&self) -> Vec<DVec2> {
        let segments = self.segments.max(1);
        let step = self.sweep() / segments as f64;
        let mut angles: Vec<f64> = (0..=segments)
            .map(|i| self.start_angle + step * i as f64)
            .collect();
        if let Some(last) = angles.last_mut() {
            *last = self.end_angle;
        }
        if self.tangent {
            let lead = step * TANGENT_STEP_FRACTION;
            angles.insert(1, self.start_angle + lead);
            let len = angles.len();
            angles.insert(len - 1, self.end_angle - lead);
        }
        angles.into_iter().map(|angle| self.point_at(angle)).collect()
    }
}

/// One piece of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Straight edge
    Line { from: DVec2, to: DVec2 },
    /// Tessellated circular arc
    Arc(Arc),
}

impl PathSegment {
    /// First point.
    pub fn start(&self) -> DVec2 {
        match self {
            PathSegment::Line { from, .. } => *from,
            PathSegment::Arc(arc) => arc.start_point(),
        }
    }

    /// Last point.
    pub fn end(&self) -> DVec2 {
        match self {
            PathSegment::Line { to, .. } => *to,
            PathSegment::Arc(arc) => arc.end_point(),
        }
    }

    /// Tessellated points, endpoints included.
    pub fn points(&self) -> Vec<DVec2> {
        match self {
            PathSegment::Line { from, to } => vec![*from, *to],
            PathSegment::Arc(arc) => arc.points(),
        }
    }

    /// Unit direction of travel at the last point, if the segment has length.
    pub fn end_direction(&self) -> Option<DVec2> {
        match self {
            PathSegment::Line { from, to } => (*to - *from).try_normalize(),
            PathSegment::Arc(arc) => Some(arc.end_direction()),
        }
    }

    /// Angular step of an arc segment.
    fn angular_step(&self) -> Option<f64> {
        match self {
            PathSegment::Line { .. } => None,
            PathSegment::Arc(arc) => Some(arc.step()),
        }
    }
}

// =============================================================================
// PATH
// =============================================================================

/// A tessellated path vertex with the angular resolution of the arcs it
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PathVertex {
    pub point: DVec2,
    /// Finest angular step of any arc touching this vertex
    pub step: Option<f64>,
}

/// An ordered, continuous sequence of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// A single straight edge.
    pub fn line(from: DVec2, to: DVec2) -> Self {
        Self {
            segments: vec![PathSegment::Line { from, to }],
        }
    }

    /// A single arc.
    pub fn arc(arc: Arc) -> KernelResult<Self> {
        arc.validate()?;
        Ok(Self {
            segments: vec![PathSegment::Arc(arc)],
        })
    }

    /// The segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// First point of the path.
    pub fn start(&self) -> DVec2 {
        self.segments.first().map_or(DVec2::ZERO, PathSegment::start)
    }

    /// Last point of the path.
    pub fn end(&self) -> DVec2 {
        self.segments.last().map_or(DVec2::ZERO, PathSegment::end)
    }

    /// True when the end returns to the start.
    pub fn is_closed(&self, epsilon: f64) -> bool {
        let can_enclose =
            self.segments.len() > 1 || matches!(self.segments.first(), Some(PathSegment::Arc(_)));
        can_enclose && self.start().distance(self.end()) <= epsilon
    }

    /// Tessellated polyline with coincident joints merged.
    ///
    /// For a closed path the last point repeats the first.
    pub fn points(&self, epsilon: f64) -> Vec<DVec2> {
        self.vertices(epsilon).into_iter().map(|v| v.point).collect()
    }

    pub(crate) fn vertices(&self, epsilon: f64) -> Vec<PathVertex> {
        let mut out: Vec<PathVertex> = Vec::new();
        for segment in &self.segments {
            let step = segment.angular_step();
            for (i, point) in segment.points().into_iter().enumerate() {
                match out.last_mut() {
                    Some(last) if last.point.distance(point) <= epsilon => {
                        if i == 0 {
                            last.step = finer(last.step, step);
                        }
                    }
                    _ => out.push(PathVertex { point, step }),
                }
            }
        }
        if self.is_closed(epsilon) && out.len() > 1 {
            let first_step = out[0].step;
            let last_step = out[out.len() - 1].step;
            let joined = finer(first_step, last_step);
            out[0].step = joined;
            let last = out.len() - 1;
            out[last].step = joined;
        }
        out
    }

    /// Closes the path into a polygon.
    ///
    /// # Errors
    ///
    /// [`KernelError::DiscontinuousPath`] if the path is open and
    /// [`KernelError::Geometry`] if the outline self-intersects or encloses
    /// no area.
    pub fn to_polygon(&self, config: &GeometryConfig) -> KernelResult<Polygon2> {
        if !self.is_closed(config.path_epsilon) {
            return Err(KernelError::DiscontinuousPath {
                index: self.segments.len(),
                previous_end: self.end(),
                start: self.start(),
                gap: self.end().distance(self.start()),
            });
        }
        let mut points = self.points(config.path_epsilon);
        points.pop();
        let polygon = Polygon2::new(points).normalized();
        polygon.validate(config)?;
        Ok(polygon)
    }
}

fn finer(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Incrementally assembles a continuous [`Path`].
#[derive(Debug, Clone)]
pub struct PathBuilder {
    segments: Vec<PathSegment>,
    epsilon: f64,
}

impl PathBuilder {
    /// Starts an empty path using the configured continuity tolerance.
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            segments: Vec::new(),
            epsilon: config.path_epsilon,
        }
    }

    /// Appends a straight edge from `from` to `to`.
    pub fn add_line(&mut self, from: DVec2, to: DVec2) -> KernelResult<&mut Self> {
        if !from.is_finite() || !to.is_finite() {
            return Err(KernelError::geometry("line endpoints must be finite"));
        }
        self.push(PathSegment::Line { from, to })
    }

    /// Appends a straight edge from the current end point to `to`.
    pub fn line_to(&mut self, to: DVec2) -> KernelResult<&mut Self> {
        let from = self
            .current_end()
            .ok_or_else(|| KernelError::geometry("line_to on an empty path"))?;
        self.add_line(from, to)
    }

    /// Appends a tessellated arc.
    ///
    /// A [`tangent`](Arc::tangent) arc following another segment is turned
    /// about its start point so that it continues that segment's direction;
    /// its end point moves accordingly.
    pub fn add_arc(&mut self, arc: Arc) -> KernelResult<&mut Self> {
        arc.validate()?;
        let incoming = self.segments.last().and_then(PathSegment::end_direction);
        let arc = match incoming {
            Some(direction) if arc.tangent => arc.tangent_to(direction),
            _ => arc,
        };
        self.push(PathSegment::Arc(arc))
    }

    /// Appends a line back to the first point unless already closed.
    pub fn close(&mut self) -> KernelResult<&mut Self> {
        let (Some(first), Some(end)) = (self.segments.first(), self.current_end()) else {
            return Err(KernelError::geometry("cannot close an empty path"));
        };
        let start = first.start();
        if start.distance(end) > self.epsilon {
            self.segments.push(PathSegment::Line { from: end, to: start });
        }
        Ok(self)
    }

    /// Current end point, if any segment was added.
    pub fn current_end(&self) -> Option<DVec2> {
        self.segments.last().map(PathSegment::end)
    }

    /// Finishes the path.
    pub fn finish(self) -> KernelResult<Path> {
        if self.segments.is_empty() {
            return Err(KernelError::geometry("path has no segments"));
        }
        Ok(Path {
            segments: self.segments,
        })
    }

    fn push(&mut self, segment: PathSegment) -> KernelResult<&mut Self> {
        if let Some(previous_end) = self.current_end() {
            let start = segment.start();
            let gap = previous_end.distance(start);
            if gap > self.epsilon {
                return Err(KernelError::DiscontinuousPath {
                    index: self.segments.len(),
                    previous_end,
                    start,
                    gap,
                });
            }
        }
        self.segments.push(segment);
        Ok(self)
    }
}
