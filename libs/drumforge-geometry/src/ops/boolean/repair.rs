//! # Result Repair
//!
//! Turns the polygon soup left by BSP clipping back into a closed triangle
//! mesh. The BSP algorithm is exact about which pieces survive but not about
//! how they connect: splitting produces nearly coincident vertices, slivers,
//! and vertices that lie on the edges of neighbouring polygons.
//!
//! ## Passes
//!
//! 1. **Weld** vertices closer than `weld_epsilon` (spatial hash)
//! 2. **Drop** polygons that collapsed to fewer than three vertices or to a
//!    sliver thinner than `weld_epsilon`
//! 3. **Cancel** pairs of identical polygons with opposite winding
//! 4. **Split** unmatched edges at vertices lying on them (T-junctions)
//! 5. **Triangulate** the convex polygons
//!
//! The result still goes through [`Solid::from_mesh`], so a repair that
//! falls short surfaces as [`KernelError::NonManifoldResult`].

use super::polygon::Polygon;
use crate::error::{KernelError, KernelResult};
use crate::mesh::Mesh;
use crate::solid::Solid;
use config::constants::{GeometryConfig, MAX_TRIANGLES};
use glam::DVec3;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Upper bound on T-junction passes; each pass only splits edges that are
/// still unmatched.
const MAX_TJUNCTION_PASSES: usize = 16;

/// Counters reported in the debug log.
#[derive(Debug, Default, Clone, Copy)]
struct RepairStats {
    input_polygons: usize,
    welded_vertices: usize,
    dropped_polygons: usize,
    cancelled_pairs: usize,
    split_edges: usize,
}

/// Repairs and validates the surviving polygons of a boolean operation.
pub(super) fn polygons_to_solid(
    polygons: Vec<Polygon>,
    config: &GeometryConfig,
    operation: &'static str,
) -> KernelResult<Solid> {
    let mut stats = RepairStats {
        input_polygons: polygons.len(),
        ..RepairStats::default()
    };

    let mut welder = Welder::new(config.weld_epsilon);
    let mut faces: Vec<Vec<u32>> = polygons
        .into_iter()
        .map(|polygon| welder.weld_face(polygon.vertices()))
        .collect();
    stats.welded_vertices = welder.merged;
    let points = welder.points;

    let before = faces.len();
    faces.retain(|face| !is_degenerate(face, &points, config.weld_epsilon));
    stats.dropped_polygons = before - faces.len();

    stats.cancelled_pairs = cancel_opposite_pairs(&mut faces);
    stats.split_edges = split_t_junctions(&mut faces, &points, config.weld_epsilon);

    let mesh = triangulate_faces(&faces, points, config.weld_epsilon);
    if mesh.triangle_count() > MAX_TRIANGLES {
        return Err(KernelError::TooManyTriangles {
            count: mesh.triangle_count(),
            max: MAX_TRIANGLES,
        });
    }
    debug!(
        operation,
        input_polygons = stats.input_polygons,
        welded_vertices = stats.welded_vertices,
        dropped_polygons = stats.dropped_polygons,
        cancelled_pairs = stats.cancelled_pairs,
        split_edges = stats.split_edges,
        triangles = mesh.triangle_count(),
        "boolean result repaired"
    );

    Solid::from_mesh(mesh, config, operation)
}

// =============================================================================
// WELDING
// =============================================================================

/// Deduplicates points within a tolerance using a uniform grid whose cells
/// are one tolerance wide, so only the 27 neighbouring cells need checking.
struct Welder {
    epsilon: f64,
    grid: HashMap<(i64, i64, i64), Vec<u32>>,
    points: Vec<DVec3>,
    merged: usize,
}

impl Welder {
    fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            grid: HashMap::new(),
            points: Vec::new(),
            merged: 0,
        }
    }

    fn cell(&self, point: DVec3) -> (i64, i64, i64) {
        let scaled = (point / self.epsilon).floor();
        (scaled.x as i64, scaled.y as i64, scaled.z as i64)
    }

    fn index(&mut self, point: DVec3) -> u32 {
        let (cx, cy, cz) = self.cell(point);
        let limit = self.epsilon * self.epsilon;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    if let Some(&found) = bucket
                        .iter()
                        .find(|&&i| self.points[i as usize].distance_squared(point) <= limit)
                    {
                        self.merged += 1;
                        return found;
                    }
                }
            }
        }
        let index = self.points.len() as u32;
        self.points.push(point);
        self.grid.entry((cx, cy, cz)).or_default().push(index);
        index
    }

    /// Welded index loop of a polygon with repeated neighbours removed.
    fn weld_face(&mut self, vertices: &[DVec3]) -> Vec<u32> {
        let mut face: Vec<u32> = vertices.iter().map(|v| self.index(*v)).collect();
        face.dedup();
        while face.len() > 1 && face.first() == face.last() {
            face.pop();
        }
        face
    }
}

// =============================================================================
// CLEANUP
// =============================================================================

/// True for faces that no longer enclose area: fewer than three distinct
/// vertices, or narrower than `epsilon` across their longest edge.
fn is_degenerate(face: &[u32], points: &[DVec3], epsilon: f64) -> bool {
    let distinct: HashSet<u32> = face.iter().copied().collect();
    if distinct.len() < 3 {
        return true;
    }
    let mut normal = DVec3::ZERO;
    let mut longest = 0.0_f64;
    for (i, &a) in face.iter().enumerate() {
        let p = points[a as usize];
        let q = points[face[(i + 1) % face.len()] as usize];
        normal += p.cross(q);
        longest = longest.max(p.distance(q));
    }
    // |normal| is twice the area; twice the area over the base is the height.
    normal.length() / longest < epsilon
}

/// Rotation of `face` starting at its smallest index.
fn canonical(face: &[u32]) -> Vec<u32> {
    let start = face
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| *v)
        .map_or(0, |(i, _)| i);
    face[start..].iter().chain(&face[..start]).copied().collect()
}

/// Removes pairs of faces with the same vertex loop in opposite order and
/// returns the number of pairs removed.
fn cancel_opposite_pairs(faces: &mut Vec<Vec<u32>>) -> usize {
    let mut open: HashMap<Vec<u32>, Vec<usize>> = HashMap::new();
    let mut removed = vec![false; faces.len()];
    let mut pairs = 0;

    for (i, face) in faces.iter().enumerate() {
        let reversed: Vec<u32> = face.iter().rev().copied().collect();
        let partner = open
            .get_mut(&canonical(&reversed))
            .and_then(|candidates| candidates.pop());
        match partner {
            Some(j) => {
                removed[i] = true;
                removed[j] = true;
                pairs += 1;
            }
            None => open.entry(canonical(face)).or_default().push(i),
        }
    }

    if pairs > 0 {
        let mut index = 0;
        faces.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });
    }
    pairs
}

// =============================================================================
// T-JUNCTIONS
// =============================================================================

/// Inserts vertices that lie on unmatched edges into those edges, so that
/// both sides of every seam share the same vertices. Returns the number of
/// vertices inserted.
fn split_t_junctions(faces: &mut [Vec<u32>], points: &[DVec3], epsilon: f64) -> usize {
    let mut used: Vec<u32> = faces.iter().flatten().copied().collect();
    used.sort_unstable();
    used.dedup();
    used.sort_by(|&a, &b| points[a as usize].x.total_cmp(&points[b as usize].x));

    let mut inserted = 0;
    for _ in 0..MAX_TJUNCTION_PASSES {
        let edges: HashSet<(u32, u32)> = faces
            .iter()
            .flat_map(|face| (0..face.len()).map(move |i| (face[i], face[(i + 1) % face.len()])))
            .collect();

        let mut changed = false;
        for face in faces.iter_mut() {
            let mut rebuilt = Vec::with_capacity(face.len());
            for i in 0..face.len() {
                let (u, v) = (face[i], face[(i + 1) % face.len()]);
                rebuilt.push(u);
                if edges.contains(&(v, u)) {
                    continue;
                }
                let on_edge = vertices_on_segment(u, v, points, &used, epsilon);
                if !on_edge.is_empty() {
                    inserted += on_edge.len();
                    changed = true;
                    rebuilt.extend(on_edge);
                }
            }
            *face = rebuilt;
        }
        if !changed {
            break;
        }
    }
    inserted
}

/// Vertices strictly inside segment `u → v` within `epsilon` of it, ordered
/// from `u` to `v`.
fn vertices_on_segment(
    u: u32,
    v: u32,
    points: &[DVec3],
    by_x: &[u32],
    epsilon: f64,
) -> Vec<u32> {
    let (a, b) = (points[u as usize], points[v as usize]);
    let direction = b - a;
    let length_sq = direction.length_squared();
    if length_sq <= epsilon * epsilon {
        return Vec::new();
    }
    let low = a.x.min(b.x) - epsilon;
    let high = a.x.max(b.x) + epsilon;
    let start = by_x.partition_point(|&i| points[i as usize].x < low);

    let mut found: Vec<(f64, u32)> = by_x[start..]
        .iter()
        .take_while(|&&i| points[i as usize].x <= high)
        .filter(|&&w| w != u && w != v)
        .filter_map(|&w| {
            let p = points[w as usize];
            let t = (p - a).dot(direction) / length_sq;
            let along = t * length_sq.sqrt();
            let inside = along > epsilon && (1.0 - t) * length_sq.sqrt() > epsilon;
            (inside && (a + direction * t).distance(p) <= epsilon).then_some((t, w))
        })
        .collect();
    found.sort_by(|x, y| x.0.total_cmp(&y.0));
    found.into_iter().map(|(_, w)| w).collect()
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// Fans each convex face into triangles. Faces with a vertex lying on the
/// line through its neighbours (left behind by T-junction splits) are fanned
/// from an added centroid instead, so no zero-area triangles appear.
fn triangulate_faces(faces: &[Vec<u32>], mut points: Vec<DVec3>, epsilon: f64) -> Mesh {
    let mut triangles = Vec::with_capacity(faces.iter().map(|f| f.len() - 2).sum());
    for face in faces {
        let n = face.len();
        if n == 3 || !has_straight_vertex(face, &points, epsilon) {
            triangles.extend((1..n - 1).map(|i| [face[0], face[i], face[i + 1]]));
            continue;
        }
        let centroid =
            face.iter().map(|&i| points[i as usize]).sum::<DVec3>() / n as f64;
        let center = points.len() as u32;
        points.push(centroid);
        triangles.extend((0..n).map(|i| [center, face[i], face[(i + 1) % n]]));
    }
    Mesh::from_parts(points, triangles)
}

fn has_straight_vertex(face: &[u32], points: &[DVec3], epsilon: f64) -> bool {
    let n = face.len();
    (0..n).any(|i| {
        let prev = points[face[(i + n - 1) % n] as usize];
        let here = points[face[i] as usize];
        let next = points[face[(i + 1) % n] as usize];
        let base = next - prev;
        let length = base.length();
        length > 0.0 && base.cross(here - prev).length() / length < epsilon
    })
}

// =============================================================================
// TESTS
// =============================================================================
