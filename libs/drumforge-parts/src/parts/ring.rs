//! # Template Ring
//!
//! A flat annulus used as a drilling template for drum heads, revolved from
//! the rectangle `[inner_radius, inner_radius + width] × [0, thickness]`.

use super::{BuildContext, PartGeometry, Validator};
use crate::error::PartResult;
use crate::external::ExternalGeometry;
use drumforge_geometry::ops::extrude::{rotate_extrude, RotateExtrudeParams};
use drumforge_geometry::profile::shapes::rectangle;
use drumforge_geometry::{KernelResult, Solid};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Parameters of a template ring (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingParams {
    /// Radius of the opening
    pub inner_radius: f64,
    /// Radial width of the band
    pub width: f64,
    /// Height along Z
    pub thickness: f64,
    /// Angular steps around the axis
    pub segments: u32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            inner_radius: 63.5,
            width: 12.7,
            thickness: 3.175,
            segments: 50,
        }
    }
}

impl RingParams {
    /// Radius of the outer edge.
    pub fn outer_radius(&self) -> f64 {
        self.inner_radius + self.width
    }
}

impl PartGeometry for RingParams {
    const KIND: &'static str = "ring";

    fn validate(&self, _external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("inner_radius", self.inner_radius)?;
        check.positive("width", self.width)?;
        check.positive("thickness", self.thickness)?;
        check.segments("segments", self.segments)
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let center = DVec2::new(
            self.inner_radius + self.width / 2.0,
            self.thickness / 2.0,
        );
        let band = rectangle(DVec2::new(self.width, self.thickness), center);
        rotate_extrude(&band, &RotateExtrudeParams::full(self.segments), ctx.config)
    }
}
