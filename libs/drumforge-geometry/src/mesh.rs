//! # Mesh Data Structure
//!
//! Raw triangle soup used while solids are being assembled. A [`Mesh`] makes
//! no topological promises; [`crate::Solid`] wraps one that has passed the
//! manifold check.

use glam::{DMat4, DVec3};
use std::collections::HashMap;

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64. Triangles wind counter-clockwise when
/// viewed from outside the solid.
///
/// # Example
///
/// ```rust
/// use drumforge_geometry::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Creates a mesh from raw parts.
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the three corner positions of a triangle.
    #[inline]
    pub fn triangle_points(&self, triangle: [u32; 3]) -> [DVec3; 3] {
        [
            self.vertices[triangle[0] as usize],
            self.vertices[triangle[1] as usize],
            self.vertices[triangle[2] as usize],
        ]
    }

    /// Computes the axis-aligned bounding box, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.vertices.first()?;
        let (min, max) = self.vertices[1..]
            .iter()
            .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v)));
        Some(BoundingBox::new(min, max))
    }

    /// Transforms all vertices by a 4x4 matrix.
    ///
    /// Winding is preserved, so the matrix must not mirror.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|tri| [tri[0] + offset, tri[1] + offset, tri[2] + offset]),
        );
    }

    /// Signed enclosed volume via the divergence theorem.
    ///
    /// Positive for closed meshes with outward-facing triangles.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = self.triangle_points(*tri);
                a.dot(b.cross(c))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = self.triangle_points(*tri);
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }

    /// Counts the topological defects that would keep this mesh from being
    /// a closed 2-manifold.
    ///
    /// Each directed edge must occur exactly once and be matched by exactly
    /// one reverse edge; no triangle may repeat an index or have an area
    /// below `area_epsilon`.
    pub fn manifold_report(&self, area_epsilon: f64) -> ManifoldReport {
        let mut directed: HashMap<(u32, u32), usize> = HashMap::with_capacity(self.triangles.len() * 3);
        let mut degenerate_faces = 0;

        for tri in &self.triangles {
            let repeated = tri[0] == tri[1] || tri[1] == tri[2] || tri[2] == tri[0];
            let [a, b, c] = self.triangle_points(*tri);
            if repeated || (b - a).cross(c - a).length() * 0.5 < area_epsilon {
                degenerate_faces += 1;
            }
            for k in 0..3 {
                *directed.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
            }
        }

        let mut open_edges = 0;
        let mut overshared_edges = 0;
        for (&(from, to), &count) in &directed {
            if count > 1 {
                overshared_edges += 1;
            }
            match directed.get(&(to, from)) {
                None => open_edges += 1,
                Some(&reverse) if reverse != count => overshared_edges += 1,
                Some(_) => {}
            }
        }

        ManifoldReport {
            open_edges,
            overshared_edges,
            degenerate_faces,
        }
    }

    /// Drops vertices that no triangle references and renumbers the rest.
    pub fn compact(&mut self) {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for tri in &mut self.triangles {
            for index in tri.iter_mut() {
                let slot = &mut remap[*index as usize];
                if *slot == u32::MAX {
                    *slot = vertices.len() as u32;
                    vertices.push(self.vertices[*index as usize]);
                }
                *index = *slot;
            }
        }
        self.vertices = vertices;
    }
}

/// Defect counts returned by [`Mesh::manifold_report`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifoldReport {
    /// Directed edges with no matching reverse edge.
    pub open_edges: usize,
    /// Directed edges used more than once or unevenly matched.
    pub overshared_edges: usize,
    /// Triangles with repeated indices or (near) zero area.
    pub degenerate_faces: usize,
}

impl ManifoldReport {
    /// True when no defect was found.
    pub fn is_manifold(&self) -> bool {
        self.open_edges == 0 && self.overshared_edges == 0 && self.degenerate_faces == 0
    }
}

/// Axis-aligned bounding box used for early rejection tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: DVec3,
    /// Maximum corner (x, y, z)
    pub max: DVec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min/max corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// True if the boxes share any volume, treating boxes within
    /// `tolerance` of touching as overlapping.
    pub fn overlaps(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.min.x <= other.max.x + tolerance
            && self.max.x >= other.min.x - tolerance
            && self.min.y <= other.max.y + tolerance
            && self.max.y >= other.min.y - tolerance
            && self.min.z <= other.max.z + tolerance
            && self.max.z >= other.min.z - tolerance
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// True if the point lies inside or on the box.
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit tetrahedron with outward winding.
    fn tetrahedron() -> Mesh {
        Mesh::from_parts(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        )
    }

    #[test]
    fn test_tetrahedron_volume_and_manifold() {
        let mesh = tetrahedron();
        assert!((mesh.signed_volume() - 1.0 / 6.0).abs() < 1e-12);
        assert!(mesh.manifold_report(1e-12).is_manifold());
    }

    #[test]
    fn test_missing_face_reports_open_edges() {
        let mut mesh = tetrahedron();
        mesh.triangles.pop();
        let report = mesh.manifold_report(1e-12);
        assert_eq!(report.open_edges, 3);
        assert!(!report.is_manifold());
    }

    #[test]
    fn test_duplicate_face_reports_overshared_edges() {
        let mut mesh = tetrahedron();
        mesh.add_triangle(0, 2, 1);
        assert!(mesh.manifold_report(1e-12).overshared_edges > 0);
    }

    #[test]
    fn test_degenerate_face_reported() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let c = mesh.add_vertex(DVec3::new(2.0, 0.0, 0.0));
        mesh.add_triangle(a, b, c);
        assert_eq!(mesh.manifold_report(1e-12).degenerate_faces, 1);
    }

    #[test]
    fn test_bounding_box() {
        let mut mesh = tetrahedron();
        mesh.translate(DVec3::new(10.0, 0.0, 0.0));
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.min, DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(bbox.max, DVec3::new(11.0, 1.0, 1.0));
        assert!(Mesh::new().bounding_box().is_none());
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut mesh = tetrahedron();
        mesh.merge(&tetrahedron());
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangles()[4], [4, 6, 5]);
    }

    #[test]
    fn test_compact_drops_unused_vertices() {
        let mut mesh = tetrahedron();
        mesh.add_vertex(DVec3::splat(5.0));
        mesh.compact();
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn test_bounding_box_overlap() {
        let a = BoundingBox::new(DVec3::ZERO, DVec3::ONE);
        let b = BoundingBox::new(DVec3::splat(1.5), DVec3::splat(2.0));
        assert!(!a.overlaps(&b, 0.0));
        assert!(a.overlaps(&b, 0.6));
    }
}
