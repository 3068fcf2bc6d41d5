//! # Cylinder Primitives
//!
//! Cylinders, cone frustums and cones around the Z axis, plus cylinders
//! whose two rims are rounded over.

use crate::error::{KernelError, KernelResult};
use crate::mesh::Mesh;
use crate::ops::extrude::{rotate_extrude, RotateExtrudeParams};
use crate::path::{Arc, PathBuilder};
use crate::solid::Solid;
use config::constants::{GeometryConfig, MAX_SEGMENTS, MIN_SEGMENTS};
use glam::{DVec2, DVec3};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Creates a cylinder of `radius` and `height` along +Z.
///
/// # Errors
///
/// As [`frustum`].
pub fn cylinder(radius: f64, height: f64, segments: u32, center: bool) -> KernelResult<Solid> {
    frustum(height, radius, radius, segments, center)
}

/// Creates a cone frustum, or a cone when one radius is zero.
///
/// The bottom sits at `z = 0` (or `-height / 2` when centered). The first
/// rim vertex lies on +X.
///
/// # Errors
///
/// [`KernelError::Geometry`] for a non-positive height, negative radii,
/// two zero radii, or a segment count outside `3..=MAX_SEGMENTS`.
///
/// # Example
///
/// ```rust
/// use drumforge_geometry::primitives::frustum;
///
/// let cone = frustum(10.0, 5.0, 0.0, 32, false)?;
/// assert_eq!(cone.mesh().vertex_count(), 33);
/// # Ok::<(), drumforge_geometry::KernelError>(())
/// ```
pub fn frustum(
    height: f64,
    radius_bottom: f64,
    radius_top: f64,
    segments: u32,
    center: bool,
) -> KernelResult<Solid> {
    if !(height > 0.0) || !height.is_finite() {
        return Err(KernelError::geometry(format!(
            "cylinder height must be positive: {height}"
        )));
    }
    if !(radius_bottom >= 0.0 && radius_top >= 0.0)
        || !radius_bottom.is_finite()
        || !radius_top.is_finite()
    {
        return Err(KernelError::geometry(format!(
            "cylinder radii must be non-negative: r1={radius_bottom}, r2={radius_top}"
        )));
    }
    if radius_bottom == 0.0 && radius_top == 0.0 {
        return Err(KernelError::geometry(
            "cylinder must have at least one non-zero radius",
        ));
    }
    if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&segments) {
        return Err(KernelError::geometry(format!(
            "cylinder segments must be in {MIN_SEGMENTS}..={MAX_SEGMENTS}: {segments}"
        )));
    }

    let (z_bottom, z_top) = if center {
        (-height / 2.0, height / 2.0)
    } else {
        (0.0, height)
    };
    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(2 * n, 4 * n);

    // A zero radius collapses its rim to one apex vertex.
    let mut rim = |radius: f64, z: f64| -> Vec<u32> {
        if radius == 0.0 {
            return vec![mesh.add_vertex(DVec3::new(0.0, 0.0, z))];
        }
        (0..n)
            .map(|j| {
                let (sin, cos) = (TAU * j as f64 / n as f64).sin_cos();
                mesh.add_vertex(DVec3::new(radius * cos, radius * sin, z))
            })
            .collect()
    };
    let bottom = rim(radius_bottom, z_bottom);
    let top = rim(radius_top, z_top);
    let at = |ring: &[u32], j: usize| ring[j % ring.len()];

    for j in 0..n {
        let (b0, b1) = (at(&bottom, j), at(&bottom, j + 1));
        let (t0, t1) = (at(&top, j), at(&top, j + 1));
        if b0 != b1 {
            mesh.add_triangle(b0, b1, t1);
        }
        if t0 != t1 {
            mesh.add_triangle(b0, t1, t0);
        }
    }
    for j in 1..n.saturating_sub(1) {
        if bottom.len() > 1 {
            mesh.add_triangle(bottom[0], bottom[j + 1], bottom[j]);
        }
        if top.len() > 1 {
            mesh.add_triangle(top[0], top[j], top[j + 1]);
        }
    }

    Solid::from_mesh(mesh, &GeometryConfig::default(), "frustum")
}

/// Creates a cylinder centered on the origin whose top and bottom rims are
/// rounded with `round_radius`.
///
/// `segments` is used both around the axis and, divided by four, for each
/// rounded rim.
///
/// # Errors
///
/// [`KernelError::Geometry`] if the rounding does not fit the radius or half
/// the height, or as [`frustum`].
pub fn rounded_cylinder(
    radius: f64,
    height: f64,
    round_radius: f64,
    segments: u32,
    config: &GeometryConfig,
) -> KernelResult<Solid> {
    if !(radius > 0.0 && height > 0.0) {
        return Err(KernelError::geometry(format!(
            "rounded cylinder needs positive radius and height: r={radius}, h={height}"
        )));
    }
    if !(round_radius >= 0.0) || round_radius > radius || 2.0 * round_radius > height {
        return Err(KernelError::geometry(format!(
            "round radius {round_radius} does not fit a cylinder of radius {radius} and height {height}"
        )));
    }
    if round_radius == 0.0 {
        return cylinder(radius, height, segments, true);
    }

    let half = height / 2.0;
    let knee = radius - round_radius;
    let quarter = (segments / 4).max(1);
    let bottom_arc = Arc::new(
        DVec2::new(knee, -half + round_radius),
        round_radius,
        -FRAC_PI_2,
        0.0,
        quarter,
    );
    let top_arc = Arc::new(
        DVec2::new(knee, half - round_radius),
        round_radius,
        0.0,
        FRAC_PI_2,
        quarter,
    );

    // Profile in the (r, z) half-plane, starting on the axis.
    let mut builder = PathBuilder::new(config);
    let start = DVec2::new(0.0, -half);
    if knee > config.path_epsilon {
        builder.add_line(start, bottom_arc.start_point())?;
        builder.add_arc(bottom_arc)?;
    } else {
        builder.add_arc(bottom_arc)?;
    }
    if builder
        .current_end()
        .is_some_and(|end| end.distance(top_arc.start_point()) > config.path_epsilon)
    {
        builder.line_to(top_arc.start_point())?;
    }
    builder.add_arc(top_arc)?;
    if knee > config.path_epsilon {
        builder.line_to(DVec2::new(0.0, half))?;
    }
    builder.close()?;
    let profile = builder.finish()?.to_polygon(config)?;

    rotate_extrude(&profile, &RotateExtrudeParams::full(segments), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ngon_area(radius: f64, n: u32) -> f64 {
        0.5 * n as f64 * radius * radius * (TAU / n as f64).sin()
    }

    #[test]
    fn test_cylinder_volume_and_bounds() {
        let solid = cylinder(5.0, 10.0, 32, false).unwrap();
        assert_abs_diff_eq!(solid.volume(), ngon_area(5.0, 32) * 10.0, epsilon = 1e-9);
        let bbox = solid.bounding_box().unwrap();
        assert_eq!(bbox.min.z, 0.0);
        assert_eq!(bbox.max.z, 10.0);
        assert_eq!(bbox.max.x, 5.0);
    }

    #[test]
    fn test_cylinder_centered() {
        let bbox = cylinder(5.0, 10.0, 16, true).unwrap().bounding_box().unwrap();
        assert_eq!(bbox.min.z, -5.0);
        assert_eq!(bbox.max.z, 5.0);
    }

    #[test]
    fn test_cone_and_inverted_cone() {
        let cone = frustum(9.0, 2.0, 0.0, 24, false).unwrap();
        assert_abs_diff_eq!(cone.volume(), ngon_area(2.0, 24) * 3.0, epsilon = 1e-9);
        let inverted = frustum(9.0, 0.0, 2.0, 24, false).unwrap();
        assert_abs_diff_eq!(inverted.volume(), cone.volume(), epsilon = 1e-9);
    }

    #[test]
    fn test_frustum_volume() {
        let (a1, a2) = (ngon_area(4.0, 20), ngon_area(2.0, 20));
        let solid = frustum(6.0, 4.0, 2.0, 20, false).unwrap();
        let expected = 6.0 / 3.0 * (a1 + a2 + (a1 * a2).sqrt());
        assert_abs_diff_eq!(solid.volume(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_frustum_rejects_bad_input() {
        assert!(frustum(0.0, 1.0, 1.0, 16, false).is_err());
        assert!(frustum(1.0, 0.0, 0.0, 16, false).is_err());
        assert!(frustum(1.0, -1.0, 1.0, 16, false).is_err());
        assert!(frustum(1.0, 1.0, 1.0, 2, false).is_err());
    }

    #[test]
    fn test_rounded_cylinder() {
        let config = GeometryConfig::default();
        let solid = rounded_cylinder(10.0, 4.0, 1.0, 32, &config).unwrap();
        let bbox = solid.bounding_box().unwrap();
        assert_abs_diff_eq!(bbox.min.z, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.max.z, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.max.x, 10.0, epsilon = 1e-12);
        let plain = cylinder(10.0, 4.0, 32, true).unwrap();
        assert!(solid.volume() < plain.volume());
        assert!(solid.volume() > plain.volume() * 0.9);
    }

    #[test]
    fn test_rounded_cylinder_full_round_is_capsule_like() {
        let config = GeometryConfig::default();
        let solid = rounded_cylinder(2.0, 4.0, 2.0, 16, &config).unwrap();
        assert!(solid.mesh().manifold_report(1e-12).is_manifold());
        assert!(rounded_cylinder(2.0, 3.0, 2.0, 16, &config).is_err());
    }
}
