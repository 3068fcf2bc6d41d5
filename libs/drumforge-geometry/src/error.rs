//! # Kernel Errors
//!
//! Error types for path construction, offsetting, extrusion and boolean
//! composition. Every variant is deterministic: a failure means the inputs
//! describe impossible geometry, never a transient condition.

use glam::DVec2;
use thiserror::Error;

/// Errors that can occur inside the geometry kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// Consecutive path segments do not meet.
    #[error("Discontinuous path: segment {index} starts at {start:?} but the previous segment ends at {previous_end:?} (gap {gap:.3e})")]
    DiscontinuousPath {
        index: usize,
        previous_end: DVec2,
        start: DVec2,
        gap: f64,
    },

    /// An offset collapsed or inverted a feature.
    #[error("Offset overflow: delta {delta} {message}")]
    OffsetOverflow { delta: f64, message: String },

    /// A profile or parameter describes self-intersecting or degenerate geometry.
    #[error("Geometry error: {message}")]
    Geometry { message: String },

    /// A boolean composition produced a mesh that is not watertight.
    #[error("Non-manifold result from {operation}: {open_edges} open edges, {overshared_edges} over-shared edges, {degenerate_faces} degenerate faces")]
    NonManifoldResult {
        operation: &'static str,
        open_edges: usize,
        overshared_edges: usize,
        degenerate_faces: usize,
    },

    /// A repaired boolean result has more triangles than the budget
    /// (`MAX_TRIANGLES` in the config crate); `count` is the result size.
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles { count: usize, max: usize },
}

impl KernelError {
    /// Creates a geometry error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
        }
    }

    /// Creates an offset overflow error.
    pub fn offset_overflow(delta: f64, message: impl Into<String>) -> Self {
        Self::OffsetOverflow {
            delta,
            message: message.into(),
        }
    }
}

/// Result alias used throughout the kernel.
pub type KernelResult<T> = Result<T, KernelError>;
