//! # Profile Tests

use super::shapes::{circle, rectangle, rounded_rectangle, sector, triangle_asa};
use super::triangulate::triangulate;
use super::*;
use approx::assert_abs_diff_eq;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

fn config() -> GeometryConfig {
    GeometryConfig::default()
}

/// Sum of the triangle areas returned by the triangulator.
fn triangulated_area(polygon: &Polygon2) -> f64 {
    let points = polygon.flat_points();
    triangulate(polygon)
        .unwrap()
        .iter()
        .map(|[a, b, c]| (points[*b] - points[*a]).perp_dot(points[*c] - points[*a]) * 0.5)
        .sum()
}

// =============================================================================
// VALIDATION
// =============================================================================

#[test]
fn test_valid_square() {
    let square = rectangle(DVec2::splat(2.0), DVec2::ZERO);
    assert!(square.validate(&config()).is_ok());
    assert_abs_diff_eq!(square.area(), 4.0);
}

#[test]
fn test_bowtie_rejected() {
    let bowtie = Polygon2::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(2.0, 2.0),
        DVec2::new(2.0, 0.0),
        DVec2::new(0.0, 2.0),
    ]);
    assert!(matches!(
        bowtie.validate(&config()),
        Err(KernelError::Geometry { .. })
    ));
}

#[test]
fn test_degenerate_rings_rejected() {
    let line = Polygon2::new(vec![DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)]);
    assert!(line.validate(&config()).is_err());
    let two = Polygon2::new(vec![DVec2::ZERO, DVec2::X]);
    assert!(two.validate(&config()).is_err());
}

#[test]
fn test_hole_outside_rejected() {
    let outer = rectangle(DVec2::splat(2.0), DVec2::ZERO).outer;
    let hole = rectangle(DVec2::splat(0.5), DVec2::new(5.0, 0.0)).outer;
    let polygon = Polygon2::with_holes(outer, vec![hole]).normalized();
    assert!(polygon.validate(&config()).is_err());
}

#[test]
fn test_touching_hole_rejected() {
    let outer = rectangle(DVec2::splat(2.0), DVec2::ZERO).outer;
    // Hole shares the outer boundary's right edge.
    let hole = rectangle(DVec2::new(1.0, 0.5), DVec2::new(0.5, 0.0)).outer;
    let polygon = Polygon2::with_holes(outer, vec![hole]).normalized();
    assert!(polygon.validate(&config()).is_err());
}

#[test]
fn test_normalized_orientation() {
    let mut outer = rectangle(DVec2::splat(4.0), DVec2::ZERO).outer;
    outer.reverse();
    let hole = rectangle(DVec2::splat(1.0), DVec2::ZERO).outer;
    let polygon = Polygon2::with_holes(outer, vec![hole]).normalized();
    assert!(signed_area(&polygon.outer) > 0.0);
    assert!(signed_area(&polygon.holes[0]) < 0.0);
    assert!(polygon.validate(&config()).is_ok());
    assert_abs_diff_eq!(polygon.area(), 15.0);
}

#[test]
fn test_simplified_drops_collinear_and_duplicates() {
    let polygon = Polygon2::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(2.0, 0.0),
        DVec2::new(2.0, 2.0),
        DVec2::new(0.0, 2.0),
    ]);
    assert_eq!(polygon.simplified(1e-9).outer.len(), 4);
}

#[test]
fn test_mirrored_keeps_orientation() {
    let triangle = triangle_asa(FRAC_PI_4, 2.0, FRAC_PI_2).unwrap();
    let mirrored = triangle.mirrored_x();
    assert!(signed_area(&mirrored.outer) > 0.0);
    assert_abs_diff_eq!(mirrored.area(), triangle.area(), epsilon = 1e-12);
    assert!(mirrored.bounding_box().1.x <= 1e-12);
}

// =============================================================================
// TRIANGULATION
// =============================================================================

#[test]
fn test_triangulate_convex() {
    let polygon = circle(1.0, DVec2::ZERO, 12).normalized();
    assert_eq!(triangulate(&polygon).unwrap().len(), 10);
    assert_abs_diff_eq!(triangulated_area(&polygon), polygon.area(), epsilon = 1e-12);
}

#[test]
fn test_triangulate_concave() {
    // L shape
    let polygon = Polygon2::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(2.0, 0.0),
        DVec2::new(2.0, 1.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(1.0, 2.0),
        DVec2::new(0.0, 2.0),
    ]);
    let triangles = triangulate(&polygon).unwrap();
    assert_eq!(triangles.len(), 4);
    assert_abs_diff_eq!(triangulated_area(&polygon), 3.0, epsilon = 1e-12);
}

#[test]
fn test_triangulate_with_holes() {
    let outer = rectangle(DVec2::new(10.0, 4.0), DVec2::ZERO).outer;
    let holes = vec![
        rectangle(DVec2::splat(1.0), DVec2::new(-2.5, 0.0)).outer,
        circle(1.0, DVec2::new(2.5, 0.0), 16).outer,
    ];
    let polygon = Polygon2::with_holes(outer, holes).normalized();
    polygon.validate(&config()).unwrap();
    let triangles = triangulate(&polygon).unwrap();
    // n + 2h - 2 triangles for a polygon with h holes.
    assert_eq!(triangles.len(), polygon.vertex_count() + 2 * 2 - 2);
    assert_abs_diff_eq!(triangulated_area(&polygon), polygon.area(), epsilon = 1e-9);
}

// =============================================================================
// SHAPES
// =============================================================================

#[test]
fn test_triangle_asa_law_of_sines() {
    let triangle = triangle_asa(FRAC_PI_2, 3.0, (4.0f64 / 3.0).atan()).unwrap();
    // Right angle at the origin, so C sits straight above it.
    let c = triangle.outer[2];
    assert_abs_diff_eq!(c.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(c.y, 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(triangle.area(), 6.0, epsilon = 1e-12);
    assert!(triangle_asa(PI / 2.0, 1.0, PI / 2.0).is_err());
}

#[test]
fn test_sector_area() {
    let quarter = sector(2.0, DVec2::ZERO, 0.0, FRAC_PI_2, 64).unwrap();
    assert_abs_diff_eq!(quarter.area(), PI, epsilon = 1e-3);
    assert!(sector(2.0, DVec2::ZERO, 0.0, 0.0, 8).is_err());
}

#[test]
fn test_rounded_rectangle() {
    let pill = rounded_rectangle(DVec2::new(10.0, 4.0), 1.0, 64, &config()).unwrap();
    let (min, max) = pill.bounding_box();
    assert_abs_diff_eq!(min.x, -5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(max.y, 2.0, epsilon = 1e-12);
    // Four quarter circles of 16 steps plus straight runs.
    let exact = 40.0 - (4.0 - PI);
    assert_abs_diff_eq!(pill.area(), exact, epsilon = 1e-2);
    assert!(rounded_rectangle(DVec2::new(10.0, 4.0), 3.0, 64, &config()).is_err());
}

#[test]
fn test_rounded_rectangle_full_round_ends() {
    let stadium = rounded_rectangle(DVec2::new(6.0, 2.0), 1.0, 32, &config()).unwrap();
    assert!(stadium.validate(&config()).is_ok());
    assert_abs_diff_eq!(stadium.bounding_box().1.y, 1.0, epsilon = 1e-12);
}
