//! # Extrusion Operations
//!
//! Lifting closed 2D profiles into solids:
//! - **linear_extrude**: sweep along +Z with optional twist and top scale
//! - **rotate_extrude**: revolve around the Z axis through an angular span
//!
//! Both validate the profile first (self-intersections and degenerate rings
//! are [`KernelError::Geometry`](crate::KernelError::Geometry)) and build
//! meshes that share vertices between caps and walls, so the result is a
//! closed manifold by construction. It is still passed through
//! [`Solid::from_mesh`](crate::Solid::from_mesh).

mod linear;
mod rotate;

#[cfg(test)]
mod tests;

pub use linear::{linear_extrude, LinearExtrudeParams};
pub use rotate::{rotate_extrude, RotateExtrudeParams};

use crate::error::KernelResult;
use crate::profile::triangulate::triangulate;
use crate::profile::Polygon2;
use config::constants::GeometryConfig;
use glam::DVec2;

/// A validated, normalized profile ready to be swept.
struct PreparedProfile {
    /// Ring vertices, outer first, then holes (see [`Polygon2::flat_points`])
    points: Vec<DVec2>,
    /// Directed boundary edges in flat-point indices, following ring order
    edges: Vec<(usize, usize)>,
    /// Counter-clockwise cap triangles in flat-point indices
    cap: Vec<[usize; 3]>,
}

impl PreparedProfile {
    fn new(polygon: &Polygon2, config: &GeometryConfig) -> KernelResult<Self> {
        polygon.validate(config)?;
        let polygon = polygon.clone().normalized();
        let cap = triangulate(&polygon)?;

        let mut edges = Vec::with_capacity(polygon.vertex_count());
        let mut offset = 0;
        for ring in std::iter::once(&polygon.outer).chain(polygon.holes.iter()) {
            let n = ring.len();
            edges.extend((0..n).map(|i| (offset + i, offset + (i + 1) % n)));
            offset += n;
        }

        Ok(Self {
            points: polygon.flat_points(),
            edges,
            cap,
        })
    }
}
