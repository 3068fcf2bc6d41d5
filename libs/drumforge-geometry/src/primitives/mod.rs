//! # Primitives
//!
//! Closed solids built directly from their dimensions: boxes, cylinders,
//! cone frustums and cylinders with rounded rims.

pub mod cube;
pub mod cylinder;

pub use cube::cuboid;
pub use cylinder::{cylinder, frustum, rounded_cylinder};
