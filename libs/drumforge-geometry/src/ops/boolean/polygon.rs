//! # Polygon for BSP Operations
//!
//! Convex planar polygon with splitting support.

use super::plane::{Classification, Plane};
use glam::DVec3;

// =============================================================================
// POLYGON
// =============================================================================

/// A convex polygon with its supporting plane.
///
/// Fragments produced by [`Polygon::split`] keep the plane of the polygon
/// they were cut from, so repeated splitting does not drift the normal.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<DVec3>,
    plane: Plane,
}

impl Polygon {
    /// Polygon from counter-clockwise vertices, `None` if the first three
    /// are collinear or there are fewer than three.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    /// Vertices in counter-clockwise order seen from the front.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Consumes the polygon, returning its vertices.
    pub fn into_vertices(self) -> Vec<DVec3> {
        self.vertices
    }

    /// Supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Reverses winding and plane in place.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flip();
    }

    /// Side of `plane` the polygon lies on.
    pub fn classify(&self, plane: &Plane, epsilon: f64) -> Classification {
        self.vertices
            .iter()
            .fold(Classification::Coplanar, |side, v| {
                side.combine(plane.classify_point(*v, epsilon))
            })
    }

    /// Splits the polygon by `plane` into the four output lists.
    ///
    /// Coplanar polygons go to `coplanar_front` when they face the same way
    /// as the plane and to `coplanar_back` otherwise.
    pub fn split(
        self,
        plane: &Plane,
        epsilon: f64,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let sides: Vec<Classification> = self
            .vertices
            .iter()
            .map(|v| plane.classify_point(*v, epsilon))
            .collect();
        let side = sides
            .iter()
            .fold(Classification::Coplanar, |acc, s| acc.combine(*s));

        match side {
            Classification::Coplanar => {
                if self.plane.normal().dot(plane.normal()) > 0.0 {
                    coplanar_front.push(self);
                } else {
                    coplanar_back.push(self);
                }
            }
            Classification::Front => front.push(self),
            Classification::Back => back.push(self),
            Classification::Spanning => {
                let n = self.vertices.len();
                let mut front_vertices = Vec::with_capacity(n + 1);
                let mut back_vertices = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);
                    let (si, sj) = (sides[i], sides[j]);

                    if si != Classification::Back {
                        front_vertices.push(vi);
                    }
                    if si != Classification::Front {
                        back_vertices.push(vi);
                    }
                    if si.combine(sj) == Classification::Spanning {
                        let t = (-plane.signed_distance(vi)) / plane.normal().dot(vj - vi);
                        let crossing = vi.lerp(vj, t);
                        front_vertices.push(crossing);
                        back_vertices.push(crossing);
                    }
                }

                if front_vertices.len() >= 3 {
                    front.push(Polygon {
                        vertices: front_vertices,
                        plane: self.plane,
                    });
                }
                if back_vertices.len() >= 3 {
                    back.push(Polygon {
                        vertices: back_vertices,
                        plane: self.plane,
                    });
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(z: [f64; 3]) -> Polygon {
        Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, z[0]),
            DVec3::new(1.0, 0.0, z[1]),
            DVec3::new(0.5, 1.0, z[2]),
        ])
        .unwrap()
    }

    fn ground() -> Plane {
        Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap()
    }

    #[test]
    fn test_polygon_flip() {
        let mut poly = triangle([0.0; 3]);
        let first = poly.vertices()[0];
        poly.flip();
        assert_eq!(poly.vertices()[2], first);
        assert_eq!(poly.plane().normal(), -DVec3::Z);
    }

    #[test]
    fn test_polygon_classify() {
        assert_eq!(triangle([1.0; 3]).classify(&ground(), 1e-5), Classification::Front);
        assert_eq!(triangle([-1.0; 3]).classify(&ground(), 1e-5), Classification::Back);
        assert_eq!(
            triangle([-1.0, 1.0, 0.0]).classify(&ground(), 1e-5),
            Classification::Spanning
        );
    }

    #[test]
    fn test_polygon_split_spanning() {
        // Vertical triangle in the y = 0 plane.
        let poly = Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(0.5, 0.0, 1.0),
        ])
        .unwrap();
        let (mut cf, mut cb, mut f, mut b) = (vec![], vec![], vec![], vec![]);
        poly.split(&ground(), 1e-5, &mut cf, &mut cb, &mut f, &mut b);
        assert_eq!(f.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(f[0].vertices().len(), 3);
        assert_eq!(b[0].vertices().len(), 4);
        assert!(f[0].vertices().iter().all(|v| v.z >= -1e-12));
        assert!(b[0].vertices().iter().all(|v| v.z <= 1e-12));
    }

    #[test]
    fn test_polygon_split_coplanar_sorts_by_facing() {
        let (mut cf, mut cb, mut f, mut b) = (vec![], vec![], vec![], vec![]);
        triangle([0.0; 3]).split(&ground(), 1e-5, &mut cf, &mut cb, &mut f, &mut b);
        let mut flipped = triangle([0.0; 3]);
        flipped.flip();
        flipped.split(&ground(), 1e-5, &mut cf, &mut cb, &mut f, &mut b);
        assert_eq!((cf.len(), cb.len(), f.len(), b.len()), (1, 1, 0, 0));
    }
}
