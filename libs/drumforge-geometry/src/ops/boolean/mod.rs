//! # Boolean Operations (CSG)
//!
//! Constructive Solid Geometry over [`Solid`]s using BSP trees.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine
//! - Difference: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine; result.invert()
//! - Intersection: A.invert(); B.clipTo(A); B.invert(); A.clipTo(B); B.clipTo(A); combine; result.invert()
//!
//! Points within `plane_epsilon` of a splitting plane count as on it, so
//! touching and coplanar faces classify consistently. The surviving
//! polygons are repaired (welded, T-junctions split) and validated: every
//! function here returns a closed manifold or
//! [`KernelError::NonManifoldResult`](crate::KernelError::NonManifoldResult).
//!
//! ## N-ary Operations
//!
//! Operands are reduced as a balanced binary tree whose halves run in
//! parallel on the rayon pool. Operands whose bounding boxes do not overlap
//! skip the BSP entirely.
//!
//! ## Example
//!
//! ```rust
//! use drumforge_geometry::ops::boolean::{subtract, union};
//! use drumforge_geometry::primitives::cuboid;
//! use config::constants::GeometryConfig;
//! use glam::DVec3;
//!
//! let config = GeometryConfig::default();
//! let block = cuboid(DVec3::splat(10.0), true)?;
//! let notch = cuboid(DVec3::splat(4.0), false)?.translated(DVec3::splat(2.0));
//! let cut = subtract(block.clone(), [notch.clone()], &config)?;
//! assert!((cut.volume() - (1000.0 - 27.0)).abs() < 1e-6);
//!
//! let joined = union([block, notch], &config)?;
//! assert!((joined.volume() - (1000.0 + 64.0 - 27.0)).abs() < 1e-6);
//! # Ok::<(), drumforge_geometry::KernelError>(())
//! ```

mod bsp;
pub mod csg_tree;
mod plane;
mod polygon;
mod repair;


use crate::error::KernelResult;
use crate::solid::Solid;
use bsp::BspNode;
use config::constants::GeometryConfig;
use polygon::Polygon;
use tracing::{debug, trace};

pub use csg_tree::Csg;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Set union of all `solids`. The union of nothing is the empty solid.
///
/// # Errors
///
/// [`KernelError::NonManifoldResult`](crate::KernelError::NonManifoldResult)
/// or [`KernelError::TooManyTriangles`](crate::KernelError::TooManyTriangles)
/// if any pairwise step cannot produce a valid solid.
pub fn union(
    solids: impl IntoIterator<Item = Solid>,
    config: &GeometryConfig,
) -> KernelResult<Solid> {
    let solids: Vec<Solid> = solids.into_iter().filter(|s| !s.is_empty()).collect();
    reduce_balanced(solids, config, union_pair)
}

/// `base` minus the union of all `cutters`.
///
/// Cutters whose bounds miss `base` are skipped before any work is done.
///
/// # Errors
///
/// As [`union`].
pub fn subtract(
    base: Solid,
    cutters: impl IntoIterator<Item = Solid>,
    config: &GeometryConfig,
) -> KernelResult<Solid> {
    let Some(bounds) = base.bounding_box() else {
        return Ok(base);
    };
    let cutters: Vec<Solid> = cutters
        .into_iter()
        .filter(|cutter| {
            let hits = cutter
                .bounding_box()
                .is_some_and(|b| b.overlaps(&bounds, config.plane_epsilon));
            if !hits {
                trace!("subtract: skipping cutter outside the base bounds");
            }
            hits
        })
        .collect();
    if cutters.is_empty() {
        return Ok(base);
    }
    let cutter = reduce_balanced(cutters, config, union_pair)?;
    subtract_pair(base, cutter, config)
}

/// Set intersection of all `solids`. The intersection of nothing is the
/// empty solid.
///
/// # Errors
///
/// As [`union`].
pub fn intersect(
    solids: impl IntoIterator<Item = Solid>,
    config: &GeometryConfig,
) -> KernelResult<Solid> {
    let solids: Vec<Solid> = solids.into_iter().collect();
    if solids.iter().any(Solid::is_empty) {
        return Ok(Solid::empty());
    }
    reduce_balanced(solids, config, intersect_pair)
}

// =============================================================================
// REDUCTION
// =============================================================================

type PairOp = fn(Solid, Solid, &GeometryConfig) -> KernelResult<Solid>;

/// Folds `solids` with `op` as a balanced tree, forking halves with
/// [`rayon::join`].
fn reduce_balanced(
    mut solids: Vec<Solid>,
    config: &GeometryConfig,
    op: PairOp,
) -> KernelResult<Solid> {
    match solids.len() {
        0 => Ok(Solid::empty()),
        1 => Ok(solids.swap_remove(0)),
        n => {
            let right = solids.split_off(n / 2);
            let (left, right) = rayon::join(
                || reduce_balanced(solids, config, op),
                || reduce_balanced(right, config, op),
            );
            op(left?, right?, config)
        }
    }
}

// =============================================================================
// PAIRWISE OPERATIONS
// =============================================================================

/// Relation between two operands' bounds.
enum Overlap {
    /// One side is empty.
    Empty,
    /// Bounding boxes are apart by more than the plane tolerance.
    Disjoint,
    /// The BSP has to decide.
    Overlapping,
}

fn overlap(a: &Solid, b: &Solid, config: &GeometryConfig) -> Overlap {
    match (a.bounding_box(), b.bounding_box()) {
        (Some(a), Some(b)) if a.overlaps(&b, config.plane_epsilon) => Overlap::Overlapping,
        (Some(_), Some(_)) => Overlap::Disjoint,
        _ => Overlap::Empty,
    }
}

fn union_pair(a: Solid, b: Solid, config: &GeometryConfig) -> KernelResult<Solid> {
    match overlap(&a, &b, config) {
        Overlap::Empty => Ok(if a.is_empty() { b } else { a }),
        Overlap::Disjoint => {
            trace!("union: operands are disjoint, merging meshes");
            Ok(Solid::merge_disjoint([a, b]))
        }
        Overlap::Overlapping => {
            let mut bsp_a = to_bsp(&a, config);
            let mut bsp_b = to_bsp(&b, config);
            let eps = config.plane_epsilon;

            bsp_a.clip_to(&bsp_b, eps);
            bsp_b.clip_to(&bsp_a, eps);
            bsp_b.invert();
            bsp_b.clip_to(&bsp_a, eps);
            bsp_b.invert();

            finish(bsp_a, bsp_b, false, config, "union")
        }
    }
}

fn subtract_pair(a: Solid, b: Solid, config: &GeometryConfig) -> KernelResult<Solid> {
    match overlap(&a, &b, config) {
        Overlap::Empty | Overlap::Disjoint => Ok(a),
        Overlap::Overlapping => {
            let mut bsp_a = to_bsp(&a, config);
            let mut bsp_b = to_bsp(&b, config);
            let eps = config.plane_epsilon;

            bsp_a.invert();
            bsp_a.clip_to(&bsp_b, eps);
            bsp_b.clip_to(&bsp_a, eps);
            bsp_b.invert();
            bsp_b.clip_to(&bsp_a, eps);
            bsp_b.invert();

            finish(bsp_a, bsp_b, true, config, "subtract")
        }
    }
}

fn intersect_pair(a: Solid, b: Solid, config: &GeometryConfig) -> KernelResult<Solid> {
    match overlap(&a, &b, config) {
        Overlap::Empty | Overlap::Disjoint => {
            trace!("intersect: operands are disjoint");
            Ok(Solid::empty())
        }
        Overlap::Overlapping => {
            let mut bsp_a = to_bsp(&a, config);
            let mut bsp_b = to_bsp(&b, config);
            let eps = config.plane_epsilon;

            bsp_a.invert();
            bsp_b.clip_to(&bsp_a, eps);
            bsp_b.invert();
            bsp_a.clip_to(&bsp_b, eps);
            bsp_b.clip_to(&bsp_a, eps);

            finish(bsp_a, bsp_b, true, config, "intersect")
        }
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

fn to_bsp(solid: &Solid, config: &GeometryConfig) -> BspNode {
    let mesh = solid.mesh();
    let polygons: Vec<Polygon> = mesh
        .triangles()
        .iter()
        .filter_map(|tri| Polygon::from_vertices(mesh.triangle_points(*tri).to_vec()))
        .collect();
    BspNode::new(polygons, config.plane_epsilon)
}

/// Collects the polygons of both trees, flipping them when the operation
/// ended with the combined tree inverted, and rebuilds a solid.
fn finish(
    mut a: BspNode,
    mut b: BspNode,
    invert: bool,
    config: &GeometryConfig,
    operation: &'static str,
) -> KernelResult<Solid> {
    let mut polygons = a.take_polygons();
    polygons.append(&mut b.take_polygons());
    if invert {
        for polygon in &mut polygons {
            polygon.flip();
        }
    }
    debug!(operation, polygons = polygons.len(), "boolean clipping done");
    repair::polygons_to_solid(polygons, config, operation)
}
