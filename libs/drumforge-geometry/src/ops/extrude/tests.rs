//! # Extrusion Tests

use super::*;
use crate::error::KernelError;
use crate::ops::boolean;
use crate::profile::shapes::{circle, rectangle};
use approx::assert_abs_diff_eq;
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

fn config() -> GeometryConfig {
    GeometryConfig::default()
}

/// Volume of a profile revolved into an `n`-step polygonal ring (Pappus
/// over chords).
fn polygonal_revolve_volume(area: f64, centroid_x: f64, steps: f64, step: f64) -> f64 {
    area * centroid_x * steps * step.sin()
}

// =============================================================================
// LINEAR
// =============================================================================

#[test]
fn test_linear_volume_is_area_times_height() {
    let profile = circle(3.0, DVec2::new(1.0, -2.0), 48);
    let solid = linear_extrude(&profile, &LinearExtrudeParams::new(7.5), &config()).unwrap();
    assert_abs_diff_eq!(solid.volume(), profile.area() * 7.5, epsilon = 1e-9);
    assert!(solid.mesh().manifold_report(1e-12).is_manifold());
}

#[test]
fn test_linear_centered() {
    let square = rectangle(DVec2::splat(2.0), DVec2::ZERO);
    let solid =
        linear_extrude(&square, &LinearExtrudeParams::new(10.0).centered(), &config()).unwrap();
    let bbox = solid.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.min.z, -5.0);
    assert_abs_diff_eq!(bbox.max.z, 5.0);
}

#[test]
fn test_linear_with_hole() {
    let outer = rectangle(DVec2::splat(10.0), DVec2::ZERO).outer;
    let hole = circle(2.0, DVec2::new(1.0, 1.0), 24).outer;
    let profile = Polygon2::with_holes(outer, vec![hole]);
    let solid = linear_extrude(&profile, &LinearExtrudeParams::new(3.0), &config()).unwrap();
    assert_abs_diff_eq!(solid.volume(), profile.area() * 3.0, epsilon = 1e-9);
    assert!(!solid.contains_point(glam::DVec3::new(1.0, 1.0, 1.5)));
    assert!(solid.contains_point(glam::DVec3::new(4.0, -4.0, 1.5)));
}

#[test]
fn test_linear_twist_stays_manifold() {
    let profile = circle(2.0, DVec2::new(0.0, 5.0), 16);
    let params = LinearExtrudeParams::new(20.0).twisted(FRAC_PI_2, 24);
    let solid = linear_extrude(&profile, &params, &config()).unwrap();
    assert_eq!(solid.mesh().vertex_count(), 16 * 25);
    let bbox = solid.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.max.z, 20.0);
    // The top copy is rotated a quarter turn, to x = -5.
    assert!(bbox.min.x < -6.9);
}

#[test]
fn test_linear_scale_is_frustum() {
    let square = rectangle(DVec2::splat(4.0), DVec2::ZERO);
    let solid =
        linear_extrude(&square, &LinearExtrudeParams::new(6.0).scaled(0.5), &config()).unwrap();
    let expected = 16.0 * 6.0 * (1.0 + 0.5 + 0.25) / 3.0;
    assert_abs_diff_eq!(solid.volume(), expected, epsilon = 1e-9);
}

#[test]
fn test_linear_rejects_invalid_input() {
    let square = rectangle(DVec2::splat(1.0), DVec2::ZERO);
    assert!(linear_extrude(&square, &LinearExtrudeParams::new(0.0), &config()).is_err());
    assert!(linear_extrude(&square, &LinearExtrudeParams::new(1.0).scaled(0.0), &config()).is_err());

    let bowtie = Polygon2::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(2.0, 2.0),
        DVec2::new(2.0, 0.0),
        DVec2::new(0.0, 2.0),
    ]);
    let err = linear_extrude(&bowtie, &LinearExtrudeParams::new(1.0), &config()).unwrap_err();
    assert!(matches!(err, KernelError::Geometry { .. }));
}

// =============================================================================
// ROTATE
// =============================================================================

#[test]
fn test_revolve_full_ring_volume() {
    let profile = rectangle(DVec2::new(1.0, 2.0), DVec2::new(3.5, 1.0));
    let solid = rotate_extrude(&profile, &RotateExtrudeParams::full(32), &config()).unwrap();
    let expected = polygonal_revolve_volume(2.0, 3.5, 32.0, TAU / 32.0);
    assert_abs_diff_eq!(solid.volume(), expected, epsilon = 1e-9);
    let bbox = solid.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.max.x, 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bbox.max.z, 2.0, epsilon = 1e-12);
}

#[test]
fn test_revolve_partial_has_caps() {
    let profile = rectangle(DVec2::new(1.0, 1.0), DVec2::new(2.5, 0.5));
    let params = RotateExtrudeParams::partial(0.0, FRAC_PI_2, 8);
    let solid = rotate_extrude(&profile, &params, &config()).unwrap();
    let expected = polygonal_revolve_volume(1.0, 2.5, 8.0, FRAC_PI_2 / 8.0);
    assert_abs_diff_eq!(solid.volume(), expected, epsilon = 1e-9);
    let bbox = solid.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.min.y, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bbox.min.x, 0.0, epsilon = 1e-12);
}

#[test]
fn test_revolve_profile_touching_axis() {
    let profile = rectangle(DVec2::new(2.0, 3.0), DVec2::new(1.0, 1.5));
    let solid = rotate_extrude(&profile, &RotateExtrudeParams::full(24), &config()).unwrap();
    // An n-gon prism.
    let base = 0.5 * 24.0 * 4.0 * (TAU / 24.0).sin();
    assert_abs_diff_eq!(solid.volume(), base * 3.0, epsilon = 1e-9);

    let quarter = RotateExtrudeParams::partial(PI, FRAC_PI_2, 6);
    let wedge = rotate_extrude(&profile, &quarter, &config()).unwrap();
    assert_abs_diff_eq!(wedge.volume(), base * 3.0 / 4.0, epsilon = 1e-9);
}

#[test]
fn test_revolve_rejects_negative_x() {
    let profile = rectangle(DVec2::new(2.0, 1.0), DVec2::new(0.5, 0.0));
    let err = rotate_extrude(&profile, &RotateExtrudeParams::full(16), &config()).unwrap_err();
    assert!(matches!(err, KernelError::Geometry { .. }));
    let bad_angle = RotateExtrudeParams::partial(0.0, 7.0, 16);
    let ring = rectangle(DVec2::splat(1.0), DVec2::new(2.0, 0.0));
    assert!(rotate_extrude(&ring, &bad_angle, &config()).is_err());
}

#[test]
fn test_revolution_completeness() {
    let profile = rectangle(DVec2::new(1.0, 1.0), DVec2::new(2.5, 0.5));
    let theta = FRAC_PI_2;
    let first = rotate_extrude(&profile, &RotateExtrudeParams::partial(0.0, theta, 4), &config())
        .unwrap();
    let second = rotate_extrude(
        &profile,
        &RotateExtrudeParams::partial(theta, TAU - theta, 12),
        &config(),
    )
    .unwrap();
    let full = rotate_extrude(&profile, &RotateExtrudeParams::full(16), &config()).unwrap();

    let joined = boolean::union([first, second], &config()).unwrap();
    assert_abs_diff_eq!(joined.volume(), full.volume(), epsilon = 1e-6);
    let (a, b) = (joined.bounding_box().unwrap(), full.bounding_box().unwrap());
    assert_abs_diff_eq!(a.min.distance(b.min), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(a.max.distance(b.max), 0.0, epsilon = 1e-9);
    // No internal walls survive at the seams.
    assert!(joined.mesh().manifold_report(1e-12).is_manifold());
}
