//! # Floor Tom Leg
//!
//! A pillar standing on two helically twisted legs. The legs start a
//! quarter of a turn apart around the pillar and twist up into its foot.
//! The leg rod runs through the pillar: it is subtracted to leave its bore,
//! or unioned in for a preview of the assembled leg.

use super::{BuildContext, PartGeometry, Validator};
use crate::error::PartResult;
use crate::external::{ExternalFeature, ExternalGeometry, ThreadSpec};
use drumforge_geometry::ops::extrude::{linear_extrude, LinearExtrudeParams};
use drumforge_geometry::primitives::cylinder;
use drumforge_geometry::profile::shapes::circle;
use drumforge_geometry::{subtract, union, KernelResult, Solid, Transform};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Ratio of a threaded rod's core diameter to its nominal diameter.
const THREAD_CORE_RATIO: f64 = 0.82;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pillar {
    pub height: f64,
    pub diameter: f64,
}

impl Default for Pillar {
    fn default() -> Self {
        Self {
            height: 50.8,
            diameter: 25.4,
        }
    }
}

/// The leg rod held by the pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rod {
    pub diameter: f64,
    pub height: f64,
    /// Thread designation used when the rod is threaded
    pub thread: String,
    /// Thread turns over the rod length
    pub turns: u32,
}

impl Default for Rod {
    fn default() -> Self {
        Self {
            diameter: 9.525,
            height: 457.2,
            thread: "UNC-3/8-ext".to_string(),
            turns: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Leg {
    /// Twist of each leg and the angle between them
    pub angle: f64,
    pub height: f64,
    /// Leg diameter
    pub width: f64,
    /// Distance of a leg's axis from the twist axis
    pub spread: f64,
}

impl Default for Leg {
    fn default() -> Self {
        Self {
            angle: PI / 2.0,
            height: 101.6,
            width: 25.4,
            spread: 31.75,
        }
    }
}

/// Parameters of a floor tom leg (millimeters, radians).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomLegParams {
    pub pillar: Pillar,
    pub rod: Rod,
    pub leg: Leg,
    /// Union the rod in instead of boring it out
    pub show_rod: bool,
    /// Use an external thread solid on a core-diameter rod
    pub threaded: bool,
    /// Tessellation of every circle and of each leg's twist
    pub segments: u32,
}

impl Default for TomLegParams {
    fn default() -> Self {
        Self {
            pillar: Pillar::default(),
            rod: Rod::default(),
            leg: Leg::default(),
            show_rod: false,
            threaded: false,
            segments: 50,
        }
    }
}

impl TomLegParams {
    /// Center of the pillar and rod in the XY plane.
    pub fn axis(&self) -> DVec2 {
        DVec2::new(0.0, -self.leg.spread)
    }

    fn twisted_leg(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let section = circle(
            self.leg.width / 2.0,
            DVec2::new(0.0, self.leg.spread),
            self.segments,
        );
        linear_extrude(
            &section,
            &LinearExtrudeParams::new(self.leg.height).twisted(self.leg.angle, self.segments),
            ctx.config,
        )
    }

    fn rod(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let axis = self.axis().extend(0.0);
        let core = if self.threaded {
            self.rod.diameter * THREAD_CORE_RATIO
        } else {
            self.rod.diameter
        };
        let shaft = cylinder(core / 2.0, self.rod.height, self.segments, false)?.translated(axis);
        if !self.threaded {
            return Ok(shaft);
        }
        let thread = ctx.external.thread(&ThreadSpec {
            designation: self.rod.thread.clone(),
            turns: self.rod.turns,
            segments: self.segments,
        })?;
        union([shaft, thread.translated(axis)], ctx.config)
    }
}

impl PartGeometry for TomLegParams {
    const KIND: &'static str = "tom_leg";

    fn validate(&self, external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("pillar.height", self.pillar.height)?;
        check.positive("pillar.diameter", self.pillar.diameter)?;
        check.positive("rod.diameter", self.rod.diameter)?;
        check.positive("rod.height", self.rod.height)?;
        check.positive("leg.height", self.leg.height)?;
        check.positive("leg.width", self.leg.width)?;
        check.positive("leg.spread", self.leg.spread)?;
        check.segments("segments", self.segments)?;
        check.require(
            self.leg.angle > 0.0 && self.leg.angle < PI,
            "leg.angle",
            format!("must lie in (0, π), got {}", self.leg.angle),
        )?;
        check.require(
            self.rod.diameter < self.pillar.diameter,
            "rod.diameter",
            "rod must fit inside the pillar",
        )?;
        if self.threaded {
            check.require(self.rod.turns > 0, "rod.turns", "must be positive")?;
            check.provider("threaded", external, ExternalFeature::Thread)?;
        }
        Ok(())
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let leg = self.twisted_leg(ctx)?;
        let first = leg.transformed(&Transform::rotation_z(PI - self.leg.angle));
        let second = leg.transformed(
            &Transform::rotation_z(PI + self.leg.angle)
                .then(Transform::translation(DVec3::new(0.0, -2.0 * self.leg.spread, 0.0))),
        );
        let pillar = cylinder(
            self.pillar.diameter / 2.0,
            self.pillar.height,
            self.segments,
            true,
        )?
        .translated(
            self.axis()
                .extend(self.leg.height / 2.0 + self.pillar.height / 2.0),
        );

        let body = union([first, second, pillar], ctx.config)?;
        let rod = self.rod(ctx)?;
        debug!(show_rod = self.show_rod, threaded = self.threaded, "tom leg: composing rod");
        if self.show_rod {
            union([body, rod], ctx.config)
        } else {
            subtract(body, [rod], ctx.config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::NoExternalGeometry;
    use approx::assert_abs_diff_eq;
    use config::constants::GeometryConfig;

    fn small() -> TomLegParams {
        TomLegParams {
            segments: 12,
            ..TomLegParams::default()
        }
    }

    #[test]
    fn test_threaded_needs_provider() {
        let params = TomLegParams {
            threaded: true,
            ..TomLegParams::default()
        };
        let err = params.validate(&NoExternalGeometry).unwrap_err();
        assert!(err.to_string().contains("threaded"));
        assert!(TomLegParams::default().validate(&NoExternalGeometry).is_ok());
    }

    #[test]
    fn test_legs_meet_under_pillar() {
        let config = GeometryConfig::default();
        let ctx = BuildContext {
            config: &config,
            external: &NoExternalGeometry,
        };
        let params = small();
        let solid = params.generate(&ctx).unwrap();
        let bbox = solid.bounding_box().unwrap();
        assert_abs_diff_eq!(bbox.min.z, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.max.z, 101.6, epsilon = 1e-9);

        // Leg feet a quarter turn apart around the pillar axis.
        assert!(solid.contains_point(DVec3::new(-31.75, 0.3, 1.0)));
        assert!(solid.contains_point(DVec3::new(31.75, -63.5 + 0.3, 1.0)));
        // Bore along the rod axis, wall next to it.
        assert!(!solid.contains_point(DVec3::new(0.1, -31.75 + 0.2, 80.0)));
        assert!(solid.contains_point(DVec3::new(8.0, -31.75 + 0.2, 80.0)));
    }

    #[test]
    fn test_preview_includes_rod() {
        let config = GeometryConfig::default();
        let ctx = BuildContext {
            config: &config,
            external: &NoExternalGeometry,
        };
        let params = TomLegParams {
            show_rod: true,
            ..small()
        };
        let bbox = params.generate(&ctx).unwrap().bounding_box().unwrap();
        assert_abs_diff_eq!(bbox.max.z, 457.2, epsilon = 1e-9);
    }
}
