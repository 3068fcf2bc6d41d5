//! # Drumforge Geometry
//!
//! Solid geometry kernel for parametric drum hardware. Part scripts describe
//! outlines, and this crate turns them into manifold solids.
//!
//! ## Architecture
//!
//! ```text
//! PathBuilder → Path → offset → Polygon2/Region → extrude → Solid
//!                                                   ↓
//!                                   Transform → boolean (union/subtract/intersect)
//! ```
//!
//! ## Algorithms
//!
//! All algorithms are pure Rust:
//! - **Paths**: lines and tessellated arcs with an enforced continuity tolerance
//! - **Offsetting**: per-edge Minkowski sum with round or mitered corners,
//!   merged through robust 2D booleans
//! - **Triangulation**: Ear clipping with hole bridging
//! - **Boolean Operations**: BSP trees (csg.js algorithm) followed by repair
//!   and a manifold check
//!
//! Every tolerance comes from an explicit [`GeometryConfig`] value; nothing
//! in the kernel reads global state, so independent solids can be built on
//! different threads.
//!
//! ## Usage
//!
//! ```rust
//! use drumforge_geometry::ops::extrude::{linear_extrude, LinearExtrudeParams};
//! use drumforge_geometry::profile::shapes;
//! use drumforge_geometry::{GeometryConfig, KernelResult};
//! use glam::DVec2;
//!
//! fn plate() -> KernelResult<f64> {
//!     let config = GeometryConfig::default();
//!     let outline = shapes::rectangle(DVec2::new(20.0, 10.0), DVec2::ZERO);
//!     let solid = linear_extrude(&outline, &LinearExtrudeParams::new(2.0), &config)?;
//!     Ok(solid.volume())
//! }
//! assert!((plate().unwrap() - 400.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod mesh;
pub mod ops;
pub mod path;
pub mod primitives;
pub mod profile;
pub mod solid;
pub mod transform;

pub use config::constants::GeometryConfig;
pub use error::{KernelError, KernelResult};
pub use mesh::{BoundingBox, ManifoldReport, Mesh};
pub use ops::boolean::{intersect, subtract, union, Csg};
pub use path::{Arc, Path, PathBuilder, PathSegment};
pub use profile::{Polygon2, Region};
pub use solid::Solid;
pub use transform::Transform;
