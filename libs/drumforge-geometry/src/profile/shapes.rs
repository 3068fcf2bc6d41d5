//! # 2D Shapes
//!
//! Closed outlines used as extrusion profiles and 2D boolean operands. All
//! shapes are returned normalized (outer ring counter-clockwise).

use super::Polygon2;
use crate::error::{KernelError, KernelResult};
use crate::path::{Arc, PathBuilder};
use config::constants::{GeometryConfig, MIN_SEGMENTS};
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Axis-aligned rectangle of `size` centered on `center`.
pub fn rectangle(size: DVec2, center: DVec2) -> Polygon2 {
    let half = size.abs() * 0.5;
    Polygon2::new(vec![
        center + DVec2::new(-half.x, -half.y),
        center + DVec2::new(half.x, -half.y),
        center + DVec2::new(half.x, half.y),
        center + DVec2::new(-half.x, half.y),
    ])
}

/// Regular `segments`-gon inscribed in the circle of `radius` around
/// `center`, with the first vertex at angle zero.
pub fn circle(radius: f64, center: DVec2, segments: u32) -> Polygon2 {
    let n = segments.max(MIN_SEGMENTS);
    let step = TAU / n as f64;
    Polygon2::new(
        (0..n)
            .map(|i| center + radius * DVec2::from_angle(step * i as f64))
            .collect(),
    )
}

/// Pie sector between `start_angle` and `end_angle` (counter-clockwise),
/// tessellated into `segments` steps along the arc.
///
/// # Errors
///
/// [`KernelError::Geometry`] if the radius is not positive or the sweep is
/// empty or a full turn (use [`circle`] for that).
pub fn sector(
    radius: f64,
    center: DVec2,
    start_angle: f64,
    end_angle: f64,
    segments: u32,
) -> KernelResult<Polygon2> {
    let sweep = end_angle - start_angle;
    if !(radius > 0.0) {
        return Err(KernelError::geometry(format!(
            "sector radius must be positive, got {radius}"
        )));
    }
    if !(sweep > 0.0) || sweep >= TAU {
        return Err(KernelError::geometry(format!(
            "sector sweep must lie in (0, 2π), got {sweep}"
        )));
    }
    let arc = Arc::new(center, radius, start_angle, end_angle, segments.max(1));
    let mut outer = vec![center];
    outer.extend(arc.points());
    Ok(Polygon2::new(outer).normalized())
}

/// Triangle from two angles and the side between them.
///
/// Vertex A sits at the origin, vertex B at `(side, 0)`, and C above the
/// x axis; `angle_a` and `angle_b` are the interior angles at A and B.
///
/// # Errors
///
/// [`KernelError::Geometry`] if the side is not positive or the two angles
/// do not leave room for a third.
pub fn triangle_asa(angle_a: f64, side: f64, angle_b: f64) -> KernelResult<Polygon2> {
    let angle_c = PI - angle_a - angle_b;
    if !(side > 0.0) || !(angle_a > 0.0) || !(angle_b > 0.0) || !(angle_c > 0.0) {
        return Err(KernelError::geometry(format!(
            "no triangle with angles {angle_a}, {angle_b} on side {side}"
        )));
    }
    // Law of sines: the side opposite A runs from B to C.
    let a = side / angle_c.sin() * angle_a.sin();
    let b = DVec2::new(side, 0.0);
    let c = b + a * DVec2::from_angle(PI - angle_b);
    Ok(Polygon2::new(vec![DVec2::ZERO, b, c]))
}

/// Rectangle of `size` centered on the origin whose corners are rounded
/// with `radius`, i.e. the inner rectangle offset outward by `radius`.
///
/// `segments` is the tessellation of a full circle; each corner gets a
/// quarter of it.
///
/// # Errors
///
/// [`KernelError::Geometry`] if the radius is negative or larger than half
/// the shorter side.
pub fn rounded_rectangle(
    size: DVec2,
    radius: f64,
    segments: u32,
    config: &GeometryConfig,
) -> KernelResult<Polygon2> {
    if !(size.x > 0.0 && size.y > 0.0) {
        return Err(KernelError::geometry(format!(
            "rounded rectangle size must be positive, got {size:?}"
        )));
    }
    if !(radius >= 0.0) || radius * 2.0 > size.min_element() {
        return Err(KernelError::geometry(format!(
            "corner radius {radius} does not fit a {} x {} rectangle",
            size.x, size.y
        )));
    }
    if radius == 0.0 {
        return Ok(rectangle(size, DVec2::ZERO));
    }

    let inner = size * 0.5 - DVec2::splat(radius);
    let quarter = (segments.max(MIN_SEGMENTS) / 4).max(1);
    let corners = [
        DVec2::new(inner.x, inner.y),
        DVec2::new(-inner.x, inner.y),
        DVec2::new(-inner.x, -inner.y),
        DVec2::new(inner.x, -inner.y),
    ];

    let mut builder = PathBuilder::new(config);
    for (i, corner) in corners.iter().enumerate() {
        let start = FRAC_PI_2 * i as f64;
        let arc = Arc::new(*corner, radius, start, start + FRAC_PI_2, quarter);
        if let Some(end) = builder.current_end() {
            builder.add_line(end, arc.start_point())?;
        }
        builder.add_arc(arc)?;
    }
    builder.close()?;
    builder.finish()?.to_polygon(config)
}
