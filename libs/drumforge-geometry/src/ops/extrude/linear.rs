//! # Linear Extrusion
//!
//! Sweeps a profile along the Z axis. With a twist the profile is rotated
//! by `twist * t` at height fraction `t`, and with a scale it is shrunk or
//! grown linearly towards the top, so walls are ruled surfaces between
//! `twist_steps` intermediate copies.

use super::PreparedProfile;
use crate::error::{KernelError, KernelResult};
use crate::mesh::Mesh;
use crate::profile::Polygon2;
use crate::solid::Solid;
use config::constants::{GeometryConfig, MAX_SEGMENTS};
use glam::{DVec2, DVec3};

/// Parameters for linear extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearExtrudeParams {
    /// Extrusion height along Z
    pub height: f64,
    /// Total rotation about Z over the height, radians (counter-clockwise)
    pub twist: f64,
    /// Number of slices the twist and scale are spread over
    pub twist_steps: u32,
    /// Center the extrusion around Z = 0
    pub center: bool,
    /// Uniform scale of the top cap relative to the bottom
    pub scale: f64,
}

impl LinearExtrudeParams {
    /// Straight extrusion of the given height.
    pub fn new(height: f64) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Adds a twist spread over `steps` slices.
    #[must_use]
    pub fn twisted(mut self, twist: f64, steps: u32) -> Self {
        self.twist = twist;
        self.twist_steps = steps;
        self
    }

    /// Centers the extrusion on Z = 0.
    #[must_use]
    pub fn centered(mut self) -> Self {
        self.center = true;
        self
    }

    /// Scales the top cap.
    #[must_use]
    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for LinearExtrudeParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            twist: 0.0,
            twist_steps: 1,
            center: false,
            scale: 1.0,
        }
    }
}

/// Extrudes `polygon` along +Z.
///
/// # Errors
///
/// [`KernelError::Geometry`] for a non-positive height or scale, a
/// step count above the configured maximum, or an invalid profile.
///
/// # Example
///
/// ```rust
/// use drumforge_geometry::ops::extrude::{linear_extrude, LinearExtrudeParams};
/// use drumforge_geometry::profile::shapes::rectangle;
/// use config::constants::GeometryConfig;
/// use glam::DVec2;
///
/// let config = GeometryConfig::default();
/// let square = rectangle(DVec2::splat(10.0), DVec2::ZERO);
/// let block = linear_extrude(&square, &LinearExtrudeParams::new(20.0), &config)?;
/// assert!((block.volume() - 2000.0).abs() < 1e-9);
/// # Ok::<(), drumforge_geometry::KernelError>(())
/// ```
pub fn linear_extrude(
    polygon: &Polygon2,
    params: &LinearExtrudeParams,
    config: &GeometryConfig,
) -> KernelResult<Solid> {
    if !(params.height > 0.0) || !params.height.is_finite() {
        return Err(KernelError::geometry(format!(
            "linear extrusion height must be positive, got {}",
            params.height
        )));
    }
    if !(params.scale > 0.0) || !params.scale.is_finite() {
        return Err(KernelError::geometry(format!(
            "linear extrusion scale must be positive, got {}",
            params.scale
        )));
    }
    if !params.twist.is_finite() || params.twist_steps > MAX_SEGMENTS {
        return Err(KernelError::geometry(format!(
            "invalid twist {} over {} steps",
            params.twist, params.twist_steps
        )));
    }

    let profile = PreparedProfile::new(polygon, config)?;

    let sliced = params.twist != 0.0 || params.scale != 1.0;
    let slices = if sliced { params.twist_steps.max(1) } else { 1 } as usize;
    let z0 = if params.center { -params.height / 2.0 } else { 0.0 };

    let n = profile.points.len();
    let mut mesh = Mesh::with_capacity(
        n * (slices + 1),
        profile.edges.len() * slices * 2 + profile.cap.len() * 2,
    );

    for slice in 0..=slices {
        let t = slice as f64 / slices as f64;
        let rotation = DVec2::from_angle(params.twist * t);
        let scale = 1.0 + (params.scale - 1.0) * t;
        let z = z0 + params.height * t;
        for point in &profile.points {
            let p = rotation.rotate(*point * scale);
            mesh.add_vertex(DVec3::new(p.x, p.y, z));
        }
    }

    let index = |slice: usize, i: usize| (slice * n + i) as u32;
    for slice in 0..slices {
        for &(i, j) in &profile.edges {
            let (bi, bj) = (index(slice, i), index(slice, j));
            let (ti, tj) = (index(slice + 1, i), index(slice + 1, j));
            mesh.add_triangle(bi, bj, tj);
            mesh.add_triangle(bi, tj, ti);
        }
    }

    for &[a, b, c] in &profile.cap {
        mesh.add_triangle(index(0, a), index(0, c), index(0, b));
        mesh.add_triangle(index(slices, a), index(slices, b), index(slices, c));
    }

    Solid::from_mesh(mesh, config, "linear_extrude")
}
