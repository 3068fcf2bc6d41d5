//! # Rotational Extrusion
//!
//! Revolves a profile around the Z axis. The profile lives in the `(x, y)`
//! half-plane `x >= 0` and a profile point `(x, y)` at sweep angle `θ` lands
//! on `(x cos θ, x sin θ, y)`.
//!
//! ## Algorithm
//!
//! 1. Place a copy of every profile vertex at each of the `segments + 1`
//!    sweep angles (`segments` for a full turn, which wraps around)
//! 2. Vertices on the axis are shared by all angles
//! 3. Every profile edge becomes a band of trapezoids; triangles that
//!    collapse onto the axis are dropped
//! 4. A partial sweep is closed by two flat caps at its start and end angles

use super::PreparedProfile;
use crate::error::{KernelError, KernelResult};
use crate::mesh::Mesh;
use crate::profile::Polygon2;
use crate::solid::Solid;
use config::constants::{GeometryConfig, DEFAULT_SEGMENTS, MAX_SEGMENTS};
use glam::DVec3;
use std::f64::consts::TAU;

/// Parameters for rotational extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateExtrudeParams {
    /// Swept angle in radians, `(0, 2π]`
    pub angle: f64,
    /// Angle of the first profile copy, radians
    pub start_angle: f64,
    /// Angular steps across the swept angle
    pub segments: u32,
}

impl RotateExtrudeParams {
    /// Full revolution with the given number of steps.
    pub fn full(segments: u32) -> Self {
        Self {
            angle: TAU,
            start_angle: 0.0,
            segments,
        }
    }

    /// Partial sweep from `start_angle` through `angle`.
    pub fn partial(start_angle: f64, angle: f64, segments: u32) -> Self {
        Self {
            angle,
            start_angle,
            segments,
        }
    }

    fn is_full_turn(&self) -> bool {
        (self.angle - TAU).abs() < 1e-9
    }
}

impl Default for RotateExtrudeParams {
    fn default() -> Self {
        Self::full(DEFAULT_SEGMENTS)
    }
}

/// Revolves `polygon` around the Z axis.
///
/// # Errors
///
/// [`KernelError::Geometry`] if the angle is outside `(0, 2π]`, the step
/// count is zero or too large, the profile crosses to `x < 0`, or the
/// profile itself is invalid.
pub fn rotate_extrude(
    polygon: &Polygon2,
    params: &RotateExtrudeParams,
    config: &GeometryConfig,
) -> KernelResult<Solid> {
    if !(params.angle > 0.0) || params.angle > TAU + 1e-9 || !params.start_angle.is_finite() {
        return Err(KernelError::geometry(format!(
            "revolve angle must lie in (0, 2π], got {}",
            params.angle
        )));
    }
    if params.segments == 0 || params.segments > MAX_SEGMENTS {
        return Err(KernelError::geometry(format!(
            "revolve segments must be in 1..={MAX_SEGMENTS}, got {}",
            params.segments
        )));
    }

    let profile = PreparedProfile::new(polygon, config)?;
    let axis_tolerance = config.path_epsilon;
    if let Some(point) = profile.points.iter().find(|p| p.x < -axis_tolerance) {
        return Err(KernelError::geometry(format!(
            "revolve profile crosses the axis at {point:?}"
        )));
    }

    let full = params.is_full_turn();
    let segments = params.segments as usize;
    if full && segments < 3 {
        return Err(KernelError::geometry(
            "a full revolution needs at least 3 segments",
        ));
    }
    let copies = if full { segments } else { segments + 1 };
    let step = params.angle / segments as f64;

    // Vertex index of profile point `i` at copy `k`.
    let n = profile.points.len();
    let on_axis: Vec<bool> = profile
        .points
        .iter()
        .map(|p| p.x.abs() <= axis_tolerance)
        .collect();
    let mut mesh = Mesh::with_capacity(n * copies, profile.edges.len() * segments * 2);
    let mut indices = vec![0u32; n * copies];
    for i in 0..n {
        let p = profile.points[i];
        if on_axis[i] {
            let shared = mesh.add_vertex(DVec3::new(0.0, 0.0, p.y));
            for k in 0..copies {
                indices[k * n + i] = shared;
            }
        }
    }
    for k in 0..copies {
        let theta = params.start_angle + step * k as f64;
        let (sin, cos) = theta.sin_cos();
        for i in 0..n {
            if !on_axis[i] {
                let p = profile.points[i];
                indices[k * n + i] = mesh.add_vertex(DVec3::new(p.x * cos, p.x * sin, p.y));
            }
        }
    }
    let index = |k: usize, i: usize| indices[(k % copies) * n + i];

    for k in 0..segments {
        for &(i, j) in &profile.edges {
            let a = index(k, i);
            let b = index(k, j);
            let c = index(k + 1, j);
            let d = index(k + 1, i);
            push(&mut mesh, a, d, c);
            push(&mut mesh, a, c, b);
        }
    }

    if !full {
        for &[a, b, c] in &profile.cap {
            push(&mut mesh, index(0, a), index(0, b), index(0, c));
            push(&mut mesh, index(segments, a), index(segments, c), index(segments, b));
        }
    }

    Solid::from_mesh(mesh, config, "rotate_extrude")
}

/// Adds a triangle unless two of its corners collapsed onto the same axis
/// vertex.
fn push(mesh: &mut Mesh, a: u32, b: u32, c: u32) {
    if a != b && b != c && c != a {
        mesh.add_triangle(a, b, c);
    }
}
