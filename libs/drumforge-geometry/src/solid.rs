//! # Solid
//!
//! A closed, consistently oriented 2-manifold triangle mesh. The only ways to
//! obtain a [`Solid`] are the extruders, the primitives, the boolean
//! compositor and rigid transforms of an existing solid, and each of those
//! either validates the result or preserves validity by construction.

use crate::error::{KernelError, KernelResult};
use crate::mesh::{BoundingBox, Mesh};
use crate::transform::Transform;
use config::constants::GeometryConfig;
use glam::DVec3;

/// Skewed ray direction for parity tests; chosen so that rays from grid-like
/// points do not graze axis-aligned edges.
const PARITY_RAY: DVec3 = DVec3::new(0.306_102_3, 0.591_387_2, 0.746_381_6);

/// A validated manifold solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    mesh: Mesh,
}

impl Solid {
    /// The empty solid (neutral element of union).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates `mesh` and wraps it.
    ///
    /// `operation` names the producing step in the error.
    ///
    /// # Errors
    ///
    /// [`KernelError::NonManifoldResult`] if any edge is not shared by
    /// exactly two faces or a face has zero area, and
    /// [`KernelError::Geometry`] if the mesh is closed but inside out.
    pub fn from_mesh(
        mut mesh: Mesh,
        config: &GeometryConfig,
        operation: &'static str,
    ) -> KernelResult<Self> {
        mesh.compact();
        let report = mesh.manifold_report(config.area_epsilon);
        if !report.is_manifold() {
            return Err(KernelError::NonManifoldResult {
                operation,
                open_edges: report.open_edges,
                overshared_edges: report.overshared_edges,
                degenerate_faces: report.degenerate_faces,
            });
        }
        if mesh.signed_volume() < 0.0 {
            return Err(KernelError::geometry(format!(
                "{operation} produced an inside-out solid"
            )));
        }
        Ok(Self { mesh })
    }

    /// Concatenates solids whose bounding boxes do not overlap.
    ///
    /// Disjoint closed manifolds stay manifold when merged, so no
    /// revalidation is needed.
    pub(crate) fn merge_disjoint(solids: impl IntoIterator<Item = Solid>) -> Solid {
        let mut mesh = Mesh::new();
        for solid in solids {
            mesh.merge(&solid.mesh);
        }
        Solid { mesh }
    }

    /// Underlying triangle mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Consumes the solid, returning its mesh.
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// True for the empty solid.
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// Axis-aligned bounds, `None` when empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.mesh.bounding_box()
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.mesh.signed_volume()
    }

    /// Returns a copy moved by a rigid transform.
    pub fn transformed(&self, transform: &Transform) -> Solid {
        let mut mesh = self.mesh.clone();
        mesh.transform(transform.matrix());
        Solid { mesh }
    }

    /// Returns a translated copy.
    pub fn translated(&self, offset: DVec3) -> Solid {
        let mut mesh = self.mesh.clone();
        mesh.translate(offset);
        Solid { mesh }
    }

    /// Point-in-solid test by ray parity.
    ///
    /// Points on the boundary may report either side.
    pub fn contains_point(&self, point: DVec3) -> bool {
        let inside_box = self
            .bounding_box()
            .is_some_and(|bbox| bbox.contains(point));
        if !inside_box {
            return false;
        }
        let direction = PARITY_RAY.normalize();
        let crossings = self
            .mesh
            .triangles()
            .iter()
            .filter(|tri| ray_hits_triangle(point, direction, self.mesh.triangle_points(**tri)))
            .count();
        crossings % 2 == 1
    }
}

/// Möller–Trumbore ray/triangle intersection for `t > 0`.
fn ray_hits_triangle(origin: DVec3, direction: DVec3, [a, b, c]: [DVec3; 3]) -> bool {
    const EPS: f64 = 1e-12;
    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPS {
        return false;
    }
    let inv = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return false;
    }
    let q = s.cross(edge1);
    let v = direction.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return false;
    }
    edge2.dot(q) * inv > EPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cuboid;

    #[test]
    fn test_rejects_open_mesh() {
        let mesh = Mesh::from_parts(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![[0, 1, 2]],
        );
        let err = Solid::from_mesh(mesh, &GeometryConfig::default(), "test").unwrap_err();
        assert!(matches!(
            err,
            KernelError::NonManifoldResult { open_edges: 3, .. }
        ));
    }

    #[test]
    fn test_rejects_inside_out_mesh() {
        let cube = cuboid(DVec3::ONE, true).unwrap().into_mesh();
        let flipped: Vec<[u32; 3]> = cube.triangles().iter().map(|t| [t[0], t[2], t[1]]).collect();
        let mesh = Mesh::from_parts(cube.vertices().to_vec(), flipped);
        let err = Solid::from_mesh(mesh, &GeometryConfig::default(), "test").unwrap_err();
        assert!(matches!(err, KernelError::Geometry { .. }));
    }

    #[test]
    fn test_contains_point() {
        let cube = cuboid(DVec3::splat(2.0), true).unwrap();
        assert!(cube.contains_point(DVec3::ZERO));
        assert!(cube.contains_point(DVec3::new(0.9, -0.9, 0.5)));
        assert!(!cube.contains_point(DVec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_translated_moves_bounds() {
        let cube = cuboid(DVec3::ONE, false).unwrap().translated(DVec3::new(0.0, 0.0, 5.0));
        let bbox = cube.bounding_box().unwrap();
        assert_eq!(bbox.min.z, 5.0);
        assert_eq!(bbox.max.z, 6.0);
        assert!((cube.volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_solid() {
        let empty = Solid::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.volume(), 0.0);
        assert!(!empty.contains_point(DVec3::ZERO));
    }
}
