//! # CSG Tree - Lazy Evaluation
//!
//! Represents a boolean expression over solids as a tree that is only
//! realized when asked for. Part builders describe *what* to combine; the
//! tree decides when and in which order.
//!
//! ## Key Optimizations
//!
//! 1. **Lazy Evaluation**: nothing is computed until [`Csg::realize`]
//! 2. **Bounding Box Pruning**: conservative bounds are known before any
//!    mesh work, so intersections of disjoint subtrees and cutters that miss
//!    their base are never realized
//! 3. **Transform Folding**: nested transforms collapse into one matrix
//! 4. **Parallel Children**: independent subtrees are realized on the rayon
//!    pool
//!
//! ## Example
//!
//! ```rust
//! use drumforge_geometry::ops::boolean::Csg;
//! use drumforge_geometry::primitives::cuboid;
//! use drumforge_geometry::Transform;
//! use config::constants::GeometryConfig;
//! use glam::DVec3;
//!
//! let block = Csg::leaf(cuboid(DVec3::splat(4.0), true)?);
//! let bore = Csg::leaf(cuboid(DVec3::new(1.0, 1.0, 8.0), true)?);
//! let tree = Csg::subtract(block, [bore])
//!     .transform(Transform::translation(DVec3::new(0.0, 0.0, 2.0)));
//! let solid = tree.realize(&GeometryConfig::default())?;
//! assert!((solid.volume() - 60.0).abs() < 1e-6);
//! # Ok::<(), drumforge_geometry::KernelError>(())
//! ```

use crate::error::KernelResult;
use crate::mesh::BoundingBox;
use crate::solid::Solid;
use crate::transform::Transform;
use config::constants::{GeometryConfig, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use glam::DVec3;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::trace;

/// A lazily realized boolean expression.
#[derive(Debug, Clone)]
pub enum Csg {
    /// A concrete solid
    Leaf(Arc<Solid>),
    /// Union of all children
    Union(Vec<Csg>),
    /// `base` minus the union of `cutters`
    Subtract {
        /// Solid being cut
        base: Box<Csg>,
        /// Removed volumes
        cutters: Vec<Csg>,
    },
    /// Intersection of all children
    Intersect(Vec<Csg>),
    /// A rigid motion of a subtree
    Transform {
        /// Applied to the realized child
        transform: Transform,
        /// Moved subtree
        child: Box<Csg>,
    },
}

impl Csg {
    /// Wraps a concrete solid.
    pub fn leaf(solid: Solid) -> Self {
        Csg::Leaf(Arc::new(solid))
    }

    /// Union node.
    pub fn union(children: impl IntoIterator<Item = Csg>) -> Self {
        Csg::Union(children.into_iter().collect())
    }

    /// Difference node.
    pub fn subtract(base: Csg, cutters: impl IntoIterator<Item = Csg>) -> Self {
        Csg::Subtract {
            base: Box::new(base),
            cutters: cutters.into_iter().collect(),
        }
    }

    /// Intersection node.
    pub fn intersect(children: impl IntoIterator<Item = Csg>) -> Self {
        Csg::Intersect(children.into_iter().collect())
    }

    /// Moves this tree by `transform`, applied after any transform already
    /// on it.
    #[must_use]
    pub fn transform(self, transform: Transform) -> Self {
        match self {
            Csg::Transform {
                transform: inner,
                child,
            } => Csg::Transform {
                transform: inner.then(transform),
                child,
            },
            other => Csg::Transform {
                transform,
                child: Box::new(other),
            },
        }
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        match self {
            Csg::Leaf(_) => 1,
            Csg::Union(children) | Csg::Intersect(children) => {
                children.iter().map(Csg::leaf_count).sum()
            }
            Csg::Subtract { base, cutters } => {
                base.leaf_count() + cutters.iter().map(Csg::leaf_count).sum::<usize>()
            }
            Csg::Transform { child, .. } => child.leaf_count(),
        }
    }

    /// Conservative bounds of the realized solid, `None` when it is known
    /// to be empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match self {
            Csg::Leaf(solid) => solid.bounding_box(),
            Csg::Union(children) => children
                .iter()
                .filter_map(Csg::bounds)
                .reduce(|a, b| a.union(&b)),
            Csg::Subtract { base, .. } => base.bounds(),
            Csg::Intersect(children) => {
                let mut bounds = children.iter().map(Csg::bounds);
                let first = bounds.next()??;
                bounds.try_fold(first, |acc, next| intersection(&acc, &next?))
            }
            Csg::Transform { transform, child } => {
                child.bounds().map(|b| transformed_bounds(&b, transform))
            }
        })
    }

    /// Evaluates the tree into a solid.
    ///
    /// # Errors
    ///
    /// The first error of any boolean step in the tree.
    pub fn realize(&self, config: &GeometryConfig) -> KernelResult<Solid> {
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match self {
            Csg::Leaf(solid) => Ok(Solid::clone(solid)),
            Csg::Union(children) => super::union(realize_all(children, config)?, config),
            Csg::Subtract { base, cutters } => {
                let Some(base_bounds) = base.bounds() else {
                    return Ok(Solid::empty());
                };
                let live: Vec<&Csg> = cutters
                    .iter()
                    .filter(|cutter| {
                        cutter
                            .bounds()
                            .is_some_and(|b| b.overlaps(&base_bounds, config.plane_epsilon))
                    })
                    .collect();
                trace!(
                    pruned = cutters.len() - live.len(),
                    "csg: cutters outside the base bounds"
                );
                let (base, cutters) = rayon::join(
                    || base.realize(config),
                    || {
                        live.par_iter()
                            .map(|cutter| cutter.realize(config))
                            .collect::<KernelResult<Vec<_>>>()
                    },
                );
                super::subtract(base?, cutters?, config)
            }
            Csg::Intersect(children) => {
                if self.bounds().is_none() {
                    trace!("csg: intersection of disjoint subtrees");
                    return Ok(Solid::empty());
                }
                super::intersect(realize_all(children, config)?, config)
            }
            Csg::Transform { transform, child } => {
                Ok(child.realize(config)?.transformed(transform))
            }
        })
    }
}

impl From<Solid> for Csg {
    fn from(solid: Solid) -> Self {
        Csg::leaf(solid)
    }
}

fn realize_all(children: &[Csg], config: &GeometryConfig) -> KernelResult<Vec<Solid>> {
    children
        .par_iter()
        .map(|child| child.realize(config))
        .collect()
}

/// Overlap of two boxes, `None` if they are apart.
fn intersection(a: &BoundingBox, b: &BoundingBox) -> Option<BoundingBox> {
    let min = a.min.max(b.min);
    let max = a.max.min(b.max);
    (min.cmple(max).all()).then(|| BoundingBox::new(min, max))
}

/// Axis-aligned box around the eight moved corners of `bounds`.
fn transformed_bounds(bounds: &BoundingBox, transform: &Transform) -> BoundingBox {
    let corners = (0..8).map(|i| {
        transform.apply_point(DVec3::new(
            if i & 1 == 0 { bounds.min.x } else { bounds.max.x },
            if i & 2 == 0 { bounds.min.y } else { bounds.max.y },
            if i & 4 == 0 { bounds.min.z } else { bounds.max.z },
        ))
    });
    let (min, max) = corners.fold(
        (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
        |(min, max), p| (min.min(p), max.max(p)),
    );
    BoundingBox::new(min, max)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cuboid;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn cube(size: f64, at: DVec3) -> Csg {
        Csg::leaf(cuboid(DVec3::splat(size), true).unwrap().translated(at))
    }

    #[test]
    fn test_leaf_count() {
        let tree = Csg::subtract(
            Csg::union([cube(1.0, DVec3::ZERO), cube(1.0, DVec3::X)]),
            [cube(0.5, DVec3::ZERO)],
        );
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_nested_transforms_fold() {
        let tree = cube(1.0, DVec3::ZERO)
            .transform(Transform::rotation_z(FRAC_PI_2))
            .transform(Transform::translation(DVec3::new(5.0, 0.0, 0.0)));
        let Csg::Transform { child, .. } = &tree else {
            panic!("expected a transform node");
        };
        assert!(matches!(**child, Csg::Leaf(_)));
        let bounds = tree.bounds().unwrap();
        assert_abs_diff_eq!(bounds.center().x, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_disjoint_intersection_prunes() {
        let tree = Csg::intersect([
            cube(1.0, DVec3::new(-5.0, 0.0, 0.0)),
            cube(1.0, DVec3::new(5.0, 0.0, 0.0)),
        ]);
        assert!(tree.bounds().is_none());
        assert!(tree.realize(&GeometryConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_realize_matches_direct_calls() {
        let config = GeometryConfig::default();
        let tree = Csg::subtract(
            Csg::union([cube(2.0, DVec3::ZERO), cube(2.0, DVec3::new(1.0, 0.0, 0.0))]),
            [cube(1.0, DVec3::new(0.5, 0.0, 0.0)), cube(1.0, DVec3::splat(50.0))],
        );
        let solid = tree.realize(&config).unwrap();
        assert_abs_diff_eq!(solid.volume(), 11.0, epsilon = 1e-6);
        assert!(solid.mesh().manifold_report(1e-12).is_manifold());
    }

    #[test]
    fn test_union_bounds() {
        let tree = Csg::union([cube(2.0, DVec3::ZERO), cube(2.0, DVec3::splat(3.0))]);
        let bounds = tree.bounds().unwrap();
        assert_eq!(bounds.min, DVec3::splat(-1.0));
        assert_eq!(bounds.max, DVec3::splat(4.0));
        assert!(Csg::union([]).bounds().is_none());
    }
}
