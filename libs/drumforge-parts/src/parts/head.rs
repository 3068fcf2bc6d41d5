//! # Hook Dampener Head
//!
//! The felt-carrying head of the hook dampener: a base disc with a cone on
//! top, revolved as one stepped profile. A carriage bolt enters from below:
//! its head sits in a counterbore, its square neck in a square pocket, and
//! the shank leaves through a screw hole along the axis.

use super::{hole, BuildContext, PartGeometry, Validator, CUT_OVERSHOOT};
use crate::error::PartResult;
use crate::external::ExternalGeometry;
use drumforge_geometry::ops::extrude::{rotate_extrude, RotateExtrudeParams};
use drumforge_geometry::primitives::cuboid;
use drumforge_geometry::{subtract, KernelResult, Polygon2, Solid, Transform};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{SQRT_2, TAU};

/// Carriage bolt dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadBolt {
    /// Side of the square neck
    pub width: f64,
    /// Diameter of the shank hole through the cone
    pub screw_diameter: f64,
    /// Diameter of the counterbore for the bolt head
    pub head_diameter: f64,
    /// Depth of the counterbore
    pub head_height: f64,
}

impl Default for HeadBolt {
    fn default() -> Self {
        Self {
            width: 6.35,
            screw_diameter: 6.35,
            head_diameter: 12.7,
            head_height: 3.175,
        }
    }
}

/// Cone frustum on top of the base disc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadCone {
    /// Height above the base
    pub height: f64,
    /// Diameter at the tip
    pub top_diameter: f64,
    /// Diameter where it meets the base
    pub bottom_diameter: f64,
}

impl Default for HeadCone {
    fn default() -> Self {
        Self {
            height: 6.35,
            top_diameter: 25.4,
            bottom_diameter: 38.1,
        }
    }
}

/// Parameters of a hook dampener head (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadParams {
    /// Base disc diameter
    pub diameter: f64,
    /// Base disc thickness
    pub thickness: f64,
    /// Bolt seat
    pub bolt: HeadBolt,
    /// Cone
    pub cone: HeadCone,
    /// Angular steps around the axis
    pub segments: u32,
}

impl Default for HeadParams {
    fn default() -> Self {
        Self {
            diameter: 38.1,
            thickness: 6.35,
            bolt: HeadBolt::default(),
            cone: HeadCone::default(),
            segments: 30,
        }
    }
}

impl HeadParams {
    /// Half-open `(r, z)` profile of base plus cone, centered so the base
    /// spans `z ∈ [-thickness/2, thickness/2]`.
    pub fn profile(&self) -> Polygon2 {
        let half = self.thickness / 2.0;
        let top = half + self.cone.height;
        let points = vec![
            DVec2::new(0.0, -half),
            DVec2::new(self.diameter / 2.0, -half),
            DVec2::new(self.diameter / 2.0, half),
            DVec2::new(self.cone.bottom_diameter / 2.0, half),
            DVec2::new(self.cone.top_diameter / 2.0, top),
            DVec2::new(0.0, top),
        ];
        Polygon2::new(points).simplified(1e-9).normalized()
    }

    /// Total height of base plus cone.
    pub fn height(&self) -> f64 {
        self.thickness + self.cone.height
    }
}

impl PartGeometry for HeadParams {
    const KIND: &'static str = "head";

    fn validate(&self, _external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("diameter", self.diameter)?;
        check.positive("thickness", self.thickness)?;
        check.positive("bolt.width", self.bolt.width)?;
        check.positive("bolt.screw_diameter", self.bolt.screw_diameter)?;
        check.positive("bolt.head_diameter", self.bolt.head_diameter)?;
        check.positive("bolt.head_height", self.bolt.head_height)?;
        check.positive("cone.height", self.cone.height)?;
        check.non_negative("cone.top_diameter", self.cone.top_diameter)?;
        check.positive("cone.bottom_diameter", self.cone.bottom_diameter)?;
        check.segments("segments", self.segments)?;

        check.require(
            self.bolt.width * SQRT_2 < self.diameter.min(self.cone.bottom_diameter),
            "bolt.width",
            "square neck pocket must fit inside the base and the cone foot",
        )?;
        check.require(
            self.bolt.head_diameter < self.diameter,
            "bolt.head_diameter",
            "counterbore must be narrower than the base",
        )?;
        check.require(
            self.bolt.head_height < self.thickness,
            "bolt.head_height",
            "counterbore must be shallower than the base",
        )?;
        check.require(
            self.bolt.screw_diameter < self.cone.top_diameter,
            "bolt.screw_diameter",
            "screw hole must leave material at the cone tip",
        )
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let half = self.thickness / 2.0;
        let body = rotate_extrude(
            &self.profile(),
            &RotateExtrudeParams::full(self.segments),
            ctx.config,
        )?;

        let neck_height = self.thickness + CUT_OVERSHOOT;
        let neck = cuboid(
            DVec3::new(self.bolt.width, self.bolt.width, neck_height),
            true,
        )?
        .translated(DVec3::new(0.0, 0.0, half - neck_height / 2.0));

        let counterbore = hole(
            self.bolt.head_diameter,
            self.bolt.head_height,
            self.segments,
            Transform::translation(DVec3::new(
                0.0,
                0.0,
                -half + self.bolt.head_height / 2.0 - CUT_OVERSHOOT,
            )),
        )?;

        // A quarter-step turn keeps the shank's vertices off the sides of the
        // square pocket it is inscribed in.
        let quarter_step = TAU / f64::from(self.segments) / 4.0;
        let screw = hole(
            self.bolt.screw_diameter,
            self.height(),
            self.segments,
            Transform::rotation_z(quarter_step).then(Transform::translation(DVec3::new(
                0.0,
                0.0,
                -half + self.height() / 2.0,
            ))),
        )?;

        subtract(body, [neck, counterbore, screw], ctx.config)
    }
}
