//! # Ear Clipping
//!
//! Triangulates a normalized [`Polygon2`] for extrusion caps. Holes are
//! bridged into the outer boundary first (rightmost hole vertex to a visible
//! outer vertex), then ears are clipped from a circular linked list.
//!
//! Triangle indices refer to [`Polygon2::flat_points`]. Clipping ears in
//! sequence always yields a topologically valid disk, so every ring edge is
//! used by exactly one triangle and the side walls of an extrusion close up
//! against the caps.

use super::{orient, Polygon2};
use crate::error::{KernelError, KernelResult};
use glam::DVec2;

/// Triangulates `polygon`, which must be normalized (outer counter-clockwise,
/// holes clockwise). Triangles wind counter-clockwise.
pub(crate) fn triangulate(polygon: &Polygon2) -> KernelResult<Vec<[usize; 3]>> {
    let points = polygon.flat_points();
    let mut ring: Vec<usize> = (0..polygon.outer.len()).collect();

    let mut holes: Vec<Vec<usize>> = Vec::with_capacity(polygon.holes.len());
    let mut offset = polygon.outer.len();
    for hole in &polygon.holes {
        holes.push((offset..offset + hole.len()).collect());
        offset += hole.len();
    }
    holes.sort_by(|a, b| {
        let ax = rightmost(a, &points).1;
        let bx = rightmost(b, &points).1;
        bx.total_cmp(&ax)
    });

    for hole in &holes {
        bridge_hole(&mut ring, hole, &points)?;
    }

    Ok(clip_ears(&ring, &points))
}

/// Position within `hole` of its rightmost vertex, and that vertex's x.
fn rightmost(hole: &[usize], points: &[DVec2]) -> (usize, f64) {
    hole.iter()
        .enumerate()
        .map(|(pos, &index)| (pos, points[index]))
        .fold((0, f64::NEG_INFINITY), |best, (pos, p)| {
            if p.x > best.1 {
                (pos, p.x)
            } else {
                best
            }
        })
}

/// Splices `hole` into `ring` through a bridge from the hole's rightmost
/// vertex to a mutually visible ring vertex.
fn bridge_hole(ring: &mut Vec<usize>, hole: &[usize], points: &[DVec2]) -> KernelResult<()> {
    let (m_pos, _) = rightmost(hole, points);
    let m = points[hole[m_pos]];

    // Closest edge hit by the ray from M towards +x.
    let n = ring.len();
    let mut best: Option<(f64, usize)> = None;
    for i in 0..n {
        let a = points[ring[i]];
        let b = points[ring[(i + 1) % n]];
        if (a.y > m.y) == (b.y > m.y) && a.y != m.y && b.y != m.y {
            continue;
        }
        if a.y == b.y {
            continue;
        }
        let x = if a.y == m.y {
            a.x
        } else if b.y == m.y {
            b.x
        } else {
            a.x + (m.y - a.y) * (b.x - a.x) / (b.y - a.y)
        };
        if x < m.x {
            continue;
        }
        if best.map_or(true, |(best_x, _)| x < best_x) {
            best = Some((x, i));
        }
    }
    let Some((hit_x, edge)) = best else {
        return Err(KernelError::geometry("hole is not enclosed by the outer boundary"));
    };

    let a_pos = edge;
    let b_pos = (edge + 1) % n;
    let hit = DVec2::new(hit_x, m.y);
    let mut bridge_pos = if points[ring[a_pos]] == hit {
        a_pos
    } else if points[ring[b_pos]] == hit || points[ring[b_pos]].x > points[ring[a_pos]].x {
        b_pos
    } else {
        a_pos
    };
    let candidate = points[ring[bridge_pos]];

    // A reflex vertex inside triangle (M, hit, candidate) would block the
    // bridge; take the one with the smallest angle to the ray instead.
    if candidate != hit {
        let mut best_angle = f64::INFINITY;
        let mut best_distance = f64::INFINITY;
        for pos in 0..n {
            let p = points[ring[pos]];
            if pos == bridge_pos || p == m {
                continue;
            }
            let prev = points[ring[(pos + n - 1) % n]];
            let next = points[ring[(pos + 1) % n]];
            let reflex = orient(prev, p, next) <= 0.0;
            if !reflex || !in_triangle(m, hit, candidate, p) {
                continue;
            }
            let d = p - m;
            let angle = d.y.abs().atan2(d.x);
            let distance = d.length_squared();
            if angle < best_angle || (angle == best_angle && distance < best_distance) {
                best_angle = angle;
                best_distance = distance;
                bridge_pos = pos;
            }
        }
    }

    let mut spliced = Vec::with_capacity(ring.len() + hole.len() + 2);
    spliced.extend_from_slice(&ring[..=bridge_pos]);
    for k in 0..=hole.len() {
        spliced.push(hole[(m_pos + k) % hole.len()]);
    }
    spliced.push(ring[bridge_pos]);
    spliced.extend_from_slice(&ring[bridge_pos + 1..]);
    *ring = spliced;
    Ok(())
}

/// Inclusive point-in-triangle test independent of the triangle's winding.
fn in_triangle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let d1 = orient(a, b, p);
    let d2 = orient(b, c, p);
    let d3 = orient(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Strictness {
    /// Convex and no other vertex inside or on the ear
    Strict,
    /// Convex and no other vertex strictly inside
    Relaxed,
    /// Clip the current vertex whatever it looks like
    Forced,
}

fn clip_ears(ring: &[usize], points: &[DVec2]) -> Vec<[usize; 3]> {
    let n = ring.len();
    let mut triangles = Vec::with_capacity(n.saturating_sub(2));
    if n < 3 {
        return triangles;
    }

    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut alive = n;
    let mut ear = 0;
    let mut stop = ear;
    let mut strictness = Strictness::Strict;

    while alive > 3 {
        let p = prev[ear];
        let q = next[ear];
        if is_ear(p, ear, q, ring, points, &next, strictness) {
            triangles.push([ring[p], ring[ear], ring[q]]);
            next[p] = q;
            prev[q] = p;
            alive -= 1;
            ear = q;
            stop = q;
            strictness = Strictness::Strict;
            continue;
        }
        ear = q;
        if ear == stop {
            strictness = match strictness {
                Strictness::Strict => Strictness::Relaxed,
                Strictness::Relaxed | Strictness::Forced => Strictness::Forced,
            };
        }
    }
    triangles.push([ring[prev[ear]], ring[ear], ring[next[ear]]]);
    triangles
}

fn is_ear(
    p: usize,
    e: usize,
    q: usize,
    ring: &[usize],
    points: &[DVec2],
    next: &[usize],
    strictness: Strictness,
) -> bool {
    if strictness == Strictness::Forced {
        return true;
    }
    let (a, b, c) = (points[ring[p]], points[ring[e]], points[ring[q]]);
    if orient(a, b, c) <= 0.0 {
        return false;
    }
    let min = a.min(b).min(c);
    let max = a.max(b).max(c);

    let mut pos = next[q];
    while pos != p {
        let v = points[ring[pos]];
        pos = next[pos];
        if v == a || v == b || v == c {
            continue;
        }
        if v.cmplt(min).any() || v.cmpgt(max).any() {
            continue;
        }
        let d1 = orient(a, b, v);
        let d2 = orient(b, c, v);
        let d3 = orient(c, a, v);
        let blocked = match strictness {
            Strictness::Strict => d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0,
            _ => d1 > 0.0 && d2 > 0.0 && d3 > 0.0,
        };
        if blocked {
            return false;
        }
    }
    true
}
