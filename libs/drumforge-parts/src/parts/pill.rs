//! # Pill
//!
//! A rounded rectangle extruded along Z. Used on its own as a spacer and as
//! a building block for pads.

use super::{BuildContext, PartGeometry, Validator};
use crate::error::PartResult;
use crate::external::ExternalGeometry;
use drumforge_geometry::ops::extrude::{linear_extrude, LinearExtrudeParams};
use drumforge_geometry::profile::shapes::rounded_rectangle;
use drumforge_geometry::{KernelResult, Solid};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Parameters of a pill (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PillParams {
    /// Footprint in X and Y, height in Z
    pub size: DVec3,
    /// Corner radius of the footprint
    pub round_radius: f64,
    /// Tessellation of a full circle; each corner gets a quarter
    pub segments: u32,
}

impl Default for PillParams {
    fn default() -> Self {
        Self {
            size: DVec3::new(25.4, 12.7, 6.35),
            round_radius: 3.175,
            segments: 32,
        }
    }
}

impl PartGeometry for PillParams {
    const KIND: &'static str = "pill";

    fn validate(&self, _external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("size.x", self.size.x)?;
        check.positive("size.y", self.size.y)?;
        check.positive("size.z", self.size.z)?;
        check.non_negative("round_radius", self.round_radius)?;
        check.require(
            2.0 * self.round_radius <= self.size.x.min(self.size.y),
            "round_radius",
            format!(
                "{} does not fit a {} x {} footprint",
                self.round_radius, self.size.x, self.size.y
            ),
        )?;
        check.segments("segments", self.segments)
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let footprint =
            rounded_rectangle(self.size.truncate(), self.round_radius, self.segments, ctx.config)?;
        linear_extrude(&footprint, &LinearExtrudeParams::new(self.size.z), ctx.config)
    }
}
