//! # Solid Operations
//!
//! Profile offsetting, extrusion of profiles into solids, and boolean
//! composition of solids.

pub mod boolean;
pub mod extrude;
pub mod offset;

pub use boolean::{intersect, subtract, union, Csg};
