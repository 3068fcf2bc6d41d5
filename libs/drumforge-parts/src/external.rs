//! # External Geometry Providers
//!
//! Thread profiles and honeycomb infill are generated outside the part
//! library. Parts receive them as finished solids and only use them as
//! boolean operands.

use drumforge_geometry::{KernelError, KernelResult, Solid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A kind of externally supplied geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalFeature {
    /// Helical thread solids
    Thread,
    /// Hexagonal infill lattices
    Honeycomb,
}

impl fmt::Display for ExternalFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thread => f.write_str("thread"),
            Self::Honeycomb => f.write_str("honeycomb"),
        }
    }
}

/// Request for a thread solid.
///
/// The solid runs along +Z starting at `z = 0`, centered on the Z axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSpec {
    /// Thread designation, e.g. `UNC-3/8-ext`
    pub designation: String,
    /// Number of full turns
    pub turns: u32,
    /// Tessellation of one turn
    pub segments: u32,
}

/// Request for a honeycomb lattice.
///
/// Cells are hexagonal prisms along +Z from `z = 0` to `height`, laid out
/// from the origin towards +X and +Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoneycombSpec {
    /// Cell rows
    pub rows: u32,
    /// Cell columns
    pub columns: u32,
    /// Circumradius of one cell
    pub radius: f64,
    /// Wall gap between neighbouring cells
    pub gap: f64,
    /// Prism height
    pub height: f64,
}

/// Supplies geometry the part library does not generate itself.
pub trait ExternalGeometry: Send + Sync + fmt::Debug {
    /// True if this provider can produce `feature`.
    fn supports(&self, feature: ExternalFeature) -> bool;

    /// Builds a thread solid.
    ///
    /// # Errors
    ///
    /// Provider specific; a provider that does not support threads fails.
    fn thread(&self, spec: &ThreadSpec) -> KernelResult<Solid>;

    /// Builds a honeycomb lattice.
    ///
    /// # Errors
    ///
    /// Provider specific; a provider that does not support honeycombs fails.
    fn honeycomb(&self, spec: &HoneycombSpec) -> KernelResult<Solid>;
}

/// Provider that supplies nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalGeometry;

impl ExternalGeometry for NoExternalGeometry {
    fn supports(&self, _feature: ExternalFeature) -> bool {
        false
    }

    fn thread(&self, spec: &ThreadSpec) -> KernelResult<Solid> {
        Err(KernelError::geometry(format!(
            "no thread provider for {}",
            spec.designation
        )))
    }

    fn honeycomb(&self, _spec: &HoneycombSpec) -> KernelResult<Solid> {
        Err(KernelError::geometry("no honeycomb provider"))
    }
}
