//! # Part Generators
//!
//! One module per part kind. Each holds a serde parameter record, the pure
//! functions deriving secondary dimensions from it, and a [`PartGeometry`]
//! implementation that validates the record and drives the kernel.

pub mod clip;
pub mod head;
pub mod kick_riser;
pub mod pill;
pub mod rim_dampener;
pub mod ring;
pub mod subkick;
pub mod tom_leg;

use crate::error::{PartError, PartResult};
use crate::external::{ExternalFeature, ExternalGeometry};
use config::constants::{GeometryConfig, MAX_SEGMENTS, MIN_SEGMENTS};
use drumforge_geometry::primitives::cylinder;
use drumforge_geometry::{KernelResult, Solid, Transform};
use glam::DVec3;

/// Distance cutters reach past the faces they open, so a cut never leaves a
/// face coplanar with a face of the part.
pub(crate) const CUT_OVERSHOOT: f64 = 1.0;

/// Everything a generator reads besides its own parameters.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Tolerances and tessellation defaults
    pub config: &'a GeometryConfig,
    /// Thread and honeycomb provider
    pub external: &'a dyn ExternalGeometry,
}

/// A part kind that can be generated from its parameter record.
pub trait PartGeometry {
    /// Tag of the part kind.
    const KIND: &'static str;

    /// Checks the record before any geometry is built.
    ///
    /// # Errors
    ///
    /// [`PartError::ParameterRange`] naming the first offending parameter.
    fn validate(&self, external: &dyn ExternalGeometry) -> PartResult<()>;

    /// Builds the solid. Only called on validated records.
    ///
    /// # Errors
    ///
    /// The first kernel failure.
    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid>;
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Range checks that report the part they belong to.
pub(crate) struct Validator {
    part: &'static str,
}

impl Validator {
    pub(crate) fn new(part: &'static str) -> Self {
        Self { part }
    }

    pub(crate) fn positive(&self, parameter: &'static str, value: f64) -> PartResult<()> {
        self.require(
            value > 0.0 && value.is_finite(),
            parameter,
            format!("must be positive, got {value}"),
        )
    }

    pub(crate) fn non_negative(&self, parameter: &'static str, value: f64) -> PartResult<()> {
        self.require(
            value >= 0.0 && value.is_finite(),
            parameter,
            format!("must not be negative, got {value}"),
        )
    }

    pub(crate) fn segments(&self, parameter: &'static str, value: u32) -> PartResult<()> {
        self.require(
            (MIN_SEGMENTS..=MAX_SEGMENTS).contains(&value),
            parameter,
            format!("must be in {MIN_SEGMENTS}..={MAX_SEGMENTS}, got {value}"),
        )
    }

    pub(crate) fn provider(
        &self,
        parameter: &'static str,
        external: &dyn ExternalGeometry,
        feature: ExternalFeature,
    ) -> PartResult<()> {
        self.require(
            external.supports(feature),
            parameter,
            format!("needs an external {feature} provider"),
        )
    }

    pub(crate) fn require(
        &self,
        condition: bool,
        parameter: &'static str,
        message: impl Into<String>,
    ) -> PartResult<()> {
        if condition {
            Ok(())
        } else {
            Err(PartError::parameter(self.part, parameter, message))
        }
    }
}

// =============================================================================
// SHARED CUTTERS
// =============================================================================

/// Cylindrical hole cutter centered at the origin along +Z, lengthened by
/// [`CUT_OVERSHOOT`] at both ends, then moved by `placement`.
pub(crate) fn hole(
    diameter: f64,
    length: f64,
    segments: u32,
    placement: Transform,
) -> KernelResult<Solid> {
    let cutter = cylinder(diameter / 2.0, length + 2.0 * CUT_OVERSHOOT, segments, true)?;
    Ok(cutter.transformed(&placement))
}

/// `count` copies of a hole parallel to Z at distance `radius` from the
/// axis, evenly spaced starting on +X, centered at height `z`.
pub(crate) fn hole_circle(
    count: u32,
    radius: f64,
    z: f64,
    diameter: f64,
    length: f64,
    segments: u32,
) -> KernelResult<Vec<Solid>> {
    (0..count)
        .map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(count);
            let placement = Transform::translation(DVec3::new(radius, 0.0, z))
                .then(Transform::rotation_z(angle));
            hole(diameter, length, segments, placement)
        })
        .collect()
}
