//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations, after the
//! csg.js algorithm by Evan Wallace.
//!
//! Each node holds a dividing plane, the polygons coplanar with it, and
//! front and back subtrees. A solid's tree classifies space: anything that
//! ends up behind a leaf plane with no back subtree is inside the solid.
//!
//! ## Stack Safety
//!
//! Trees built from real meshes can be deep. Traversals recurse inside
//! [`stacker::maybe_grow`], which moves onto a fresh heap-allocated stack
//! segment when the remaining stack runs low, and [`Drop`] is iterative.

use super::plane::Plane;
use super::polygon::Polygon;
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};

/// A node in the BSP tree.
#[derive(Debug, Default)]
pub struct BspNode {
    /// Dividing plane, taken from the first polygon the node received
    plane: Option<Plane>,
    /// Polygons coplanar with `plane`
    polygons: Vec<Polygon>,
    /// Subtree in front of `plane`
    front: Option<Box<BspNode>>,
    /// Subtree behind `plane`
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Builds a tree from `polygons`.
    pub fn new(polygons: Vec<Polygon>, epsilon: f64) -> Self {
        let mut root = Self::default();
        root.build(polygons, epsilon);
        root
    }

    /// Inserts `polygons` into the tree, splitting them along node planes.
    pub fn build(&mut self, polygons: Vec<Polygon>, epsilon: f64) {
        if polygons.is_empty() {
            return;
        }
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            let plane = *self.plane.get_or_insert(*polygons[0].plane());
            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for polygon in polygons {
                polygon.split(
                    &plane,
                    epsilon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            self.polygons.append(&mut coplanar_front);
            self.polygons.append(&mut coplanar_back);

            if !front.is_empty() {
                self.front
                    .get_or_insert_with(Box::default)
                    .build(front, epsilon);
            }
            if !back.is_empty() {
                self.back.get_or_insert_with(Box::default).build(back, epsilon);
            }
        });
    }

    /// Turns the solid inside out: flips every polygon and plane and swaps
    /// the subtrees.
    pub fn invert(&mut self) {
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            for polygon in &mut self.polygons {
                polygon.flip();
            }
            self.plane = self.plane.map(|plane| plane.flip());
            if let Some(front) = self.front.as_mut() {
                front.invert();
            }
            if let Some(back) = self.back.as_mut() {
                back.invert();
            }
            std::mem::swap(&mut self.front, &mut self.back);
        });
    }

    /// Removes the parts of `polygons` that lie inside this tree's solid.
    ///
    /// Coplanar polygons facing away from a node plane are treated as
    /// inside, which is what cancels the shared faces of touching solids.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>, epsilon: f64) -> Vec<Polygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for polygon in polygons {
                polygon.split(
                    &plane,
                    epsilon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);

            let mut kept = match &self.front {
                Some(node) => node.clip_polygons(front, epsilon),
                None => front,
            };
            if let Some(node) = &self.back {
                kept.extend(node.clip_polygons(back, epsilon));
            }
            kept
        })
    }

    /// Clips every polygon of this tree against `other`.
    pub fn clip_to(&mut self, other: &BspNode, epsilon: f64) {
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons), epsilon);
            if let Some(front) = self.front.as_mut() {
                front.clip_to(other, epsilon);
            }
            if let Some(back) = self.back.as_mut() {
                back.clip_to(other, epsilon);
            }
        });
    }

    /// Moves every polygon out of the tree, leaving it empty.
    pub fn take_polygons(&mut self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&mut BspNode> = vec![self];
        while let Some(node) = stack.pop() {
            result.append(&mut node.polygons);
            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
        result
    }

    /// Number of polygons in the tree.
    pub fn polygon_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&BspNode> = vec![self];
        while let Some(node) = stack.pop() {
            count += node.polygons.len();
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        count
    }
}

impl Drop for BspNode {
    fn drop(&mut self) {
        // Detach children first so each box is dropped without recursing.
        let mut stack: Vec<Box<BspNode>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    const EPS: f64 = 1e-5;

    fn triangle(z: f64) -> Polygon {
        Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    /// Faces of the axis-aligned box `[min, max]`, outward facing.
    fn box_polygons(min: DVec3, max: DVec3) -> Vec<Polygon> {
        let corner = |i: usize| {
            DVec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        };
        [
            [0, 4, 6, 2],
            [1, 3, 7, 5],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 2, 3, 1],
            [4, 5, 7, 6],
        ]
        .iter()
        .map(|face| Polygon::from_vertices(face.iter().map(|&i| corner(i)).collect()).unwrap())
        .collect()
    }

    #[test]
    fn test_bsp_new_empty() {
        let tree = BspNode::new(vec![], EPS);
        assert_eq!(tree.polygon_count(), 0);
        assert!(tree.plane.is_none());
    }

    #[test]
    fn test_bsp_stacked_triangles() {
        let tree = BspNode::new((0..5).map(|i| triangle(i as f64)).collect(), EPS);
        assert_eq!(tree.polygon_count(), 5);
    }

    #[test]
    fn test_bsp_box_faces_all_coplanar_or_behind() {
        let tree = BspNode::new(box_polygons(DVec3::ZERO, DVec3::ONE), EPS);
        // A convex solid never needs splitting.
        assert_eq!(tree.polygon_count(), 6);
    }

    #[test]
    fn test_clip_removes_inside_polygons() {
        let tree = BspNode::new(box_polygons(DVec3::ZERO, DVec3::splat(2.0)), EPS);
        let inside = Polygon::from_vertices(vec![
            DVec3::new(0.5, 0.5, 1.0),
            DVec3::new(1.5, 0.5, 1.0),
            DVec3::new(0.5, 1.5, 1.0),
        ])
        .unwrap();
        let outside = triangle(5.0);
        let kept = tree.clip_polygons(vec![inside, outside], EPS);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].vertices()[0].z, 5.0);
    }

    #[test]
    fn test_invert_swaps_inside() {
        let mut tree = BspNode::new(box_polygons(DVec3::ZERO, DVec3::splat(2.0)), EPS);
        tree.invert();
        let inside = Polygon::from_vertices(vec![
            DVec3::new(0.5, 0.5, 1.0),
            DVec3::new(1.5, 0.5, 1.0),
            DVec3::new(0.5, 1.5, 1.0),
        ])
        .unwrap();
        assert_eq!(tree.clip_polygons(vec![inside, triangle(5.0)], EPS).len(), 1);
        assert_eq!(tree.take_polygons().len(), 6);
        assert_eq!(tree.polygon_count(), 0);
    }

    #[test]
    fn test_deep_tree_drops_without_overflow() {
        // Parallel planes produce a degenerate chain of nodes.
        let tree = BspNode::new((0..3_000).map(|i| triangle(i as f64)).collect(), EPS);
        assert_eq!(tree.polygon_count(), 3_000);
    }
}
