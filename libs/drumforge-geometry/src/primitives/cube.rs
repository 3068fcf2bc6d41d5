//! # Cuboid Primitive
//!
//! Axis-aligned rectangular boxes.

use crate::error::{KernelError, KernelResult};
use crate::mesh::Mesh;
use crate::solid::Solid;
use config::constants::GeometryConfig;
use glam::DVec3;

/// Corner loops of the six faces, counter-clockwise seen from outside.
///
/// Corner `i` takes the max coordinate on axis `k` when bit `k` of `i` is set.
const FACES: [[u32; 4]; 6] = [
    [0, 4, 6, 2], // -X
    [1, 3, 7, 5], // +X
    [0, 1, 5, 4], // -Y
    [2, 6, 7, 3], // +Y
    [0, 2, 3, 1], // -Z
    [4, 5, 7, 6], // +Z
];

/// Creates a box of `size`, centered on the origin or with its minimum
/// corner there.
///
/// # Errors
///
/// [`KernelError::Geometry`] unless every extent is positive and finite.
///
/// # Example
///
/// ```rust
/// use drumforge_geometry::primitives::cuboid;
/// use glam::DVec3;
///
/// let block = cuboid(DVec3::new(10.0, 20.0, 5.0), false)?;
/// assert_eq!(block.mesh().vertex_count(), 8);
/// assert_eq!(block.mesh().triangle_count(), 12);
/// # Ok::<(), drumforge_geometry::KernelError>(())
/// ```
pub fn cuboid(size: DVec3, center: bool) -> KernelResult<Solid> {
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(KernelError::geometry(format!(
            "cuboid size must be positive: {size:?}"
        )));
    }
    let min = if center { -size / 2.0 } else { DVec3::ZERO };
    let max = min + size;

    let mut mesh = Mesh::with_capacity(8, 12);
    for i in 0..8 {
        mesh.add_vertex(DVec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        ));
    }
    for [a, b, c, d] in FACES {
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
    }

    Solid::from_mesh(mesh, &GeometryConfig::default(), "cuboid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_not_centered() {
        let block = cuboid(DVec3::new(1.0, 2.0, 3.0), false).unwrap();
        let bbox = block.bounding_box().unwrap();
        assert_eq!(bbox.min, DVec3::ZERO);
        assert_eq!(bbox.max, DVec3::new(1.0, 2.0, 3.0));
        assert!((block.volume() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_cuboid_centered() {
        let block = cuboid(DVec3::splat(10.0), true).unwrap();
        let bbox = block.bounding_box().unwrap();
        assert_eq!(bbox.min, DVec3::splat(-5.0));
        assert_eq!(bbox.max, DVec3::splat(5.0));
    }

    #[test]
    fn test_cuboid_invalid_size() {
        assert!(cuboid(DVec3::new(-1.0, 1.0, 1.0), false).is_err());
        assert!(cuboid(DVec3::new(1.0, 0.0, 1.0), false).is_err());
        assert!(cuboid(DVec3::new(1.0, f64::NAN, 1.0), false).is_err());
    }
}
