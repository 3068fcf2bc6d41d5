//! # Rim Dampener
//!
//! An arc-shaped strip that sits on the bearing edge under the drum head.
//! Its cross-section is a square rim on a thin flange with a round channel
//! through the rim for a damping cord, revolved through a partial turn.

use super::{BuildContext, PartGeometry, Validator};
use crate::error::PartResult;
use crate::external::ExternalGeometry;
use drumforge_geometry::ops::extrude::{rotate_extrude, RotateExtrudeParams};
use drumforge_geometry::profile::shapes::{circle, rectangle};
use drumforge_geometry::{KernelResult, Polygon2, Region, Solid};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Square rim on top of the flange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampenerRim {
    pub width: f64,
    pub height: f64,
}

impl Default for DampenerRim {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 4.0,
        }
    }
}

/// Flat flange resting on the bearing edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampenerFlange {
    pub width: f64,
    pub height: f64,
}

impl Default for DampenerFlange {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 1.0,
        }
    }
}

/// Parameters of a rim dampener (millimeters, radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RimDampenerParams {
    /// Drum diameter the flange is centered on
    pub diameter: f64,
    pub rim: DampenerRim,
    pub flange: DampenerFlange,
    /// Diameter of the cord channel through the rim
    pub channel_diameter: f64,
    /// Swept angle of the strip
    pub angle: f64,
    /// Angular steps across the swept angle
    pub segments: u32,
    /// Tessellation of the channel circle
    pub channel_segments: u32,
}

impl Default for RimDampenerParams {
    fn default() -> Self {
        Self {
            diameter: 304.8,
            rim: DampenerRim::default(),
            flange: DampenerFlange::default(),
            channel_diameter: 2.0,
            angle: TAU / 5.0,
            segments: 100,
            channel_segments: 32,
        }
    }
}

impl RimDampenerParams {
    /// Cross-section in the `(r, z)` half-plane: rim on flange, both
    /// starting at the inner edge, minus the channel centered in the rim.
    pub fn profile(&self) -> KernelResult<Polygon2> {
        let (rim, flange) = (self.rim, self.flange);
        let flange_rect = rectangle(
            DVec2::new(flange.width, flange.height),
            DVec2::new(flange.width / 2.0, flange.height / 2.0),
        );
        let rim_center = DVec2::new(rim.width / 2.0, flange.height + rim.height / 2.0);
        let rim_rect = rectangle(DVec2::new(rim.width, rim.height), rim_center);
        let channel = circle(self.channel_diameter / 2.0, rim_center, self.channel_segments);

        let section = Region::from(flange_rect)
            .union(&Region::from(rim_rect))
            .difference(&Region::from(channel))
            .into_single()?;
        let inner_edge = self.diameter / 2.0 - flange.width / 2.0;
        Ok(section.translated(DVec2::new(inner_edge, 0.0)))
    }
}

impl PartGeometry for RimDampenerParams {
    const KIND: &'static str = "rim_dampener";

    fn validate(&self, _external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("diameter", self.diameter)?;
        check.positive("rim.width", self.rim.width)?;
        check.positive("rim.height", self.rim.height)?;
        check.positive("flange.width", self.flange.width)?;
        check.positive("flange.height", self.flange.height)?;
        check.positive("channel_diameter", self.channel_diameter)?;
        check.segments("segments", self.segments)?;
        check.segments("channel_segments", self.channel_segments)?;
        check.require(
            self.angle > 0.0 && self.angle <= TAU,
            "angle",
            format!("must lie in (0, 2π], got {}", self.angle),
        )?;
        check.require(
            self.diameter / 2.0 > self.flange.width,
            "flange.width",
            "flange must stay clear of the axis",
        )?;
        check.require(
            self.rim.width <= self.flange.width,
            "rim.width",
            "rim must not overhang the flange",
        )?;
        check.require(
            self.channel_diameter < self.rim.width.min(self.rim.height),
            "channel_diameter",
            "channel must leave material around it in the rim",
        )
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        rotate_extrude(
            &self.profile()?,
            &RotateExtrudeParams::partial(0.0, self.angle, self.segments),
            ctx.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::NoExternalGeometry;
    use approx::assert_abs_diff_eq;
    use config::constants::GeometryConfig;
    use glam::DVec3;

    #[test]
    fn test_profile_has_channel() {
        let profile = RimDampenerParams::default().profile().unwrap();
        assert_eq!(profile.holes.len(), 1);
        let (min, max) = profile.bounding_box();
        assert_abs_diff_eq!(min.x, 152.4 - 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(max.x, 152.4 + 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(max.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_validate_rejects_oversized_channel() {
        let params = RimDampenerParams {
            channel_diameter: 4.0,
            ..RimDampenerParams::default()
        };
        assert!(params.validate(&NoExternalGeometry).is_err());
    }

    #[test]
    fn test_strip_is_hollow_along_channel() {
        let config = GeometryConfig::default();
        let ctx = BuildContext {
            config: &config,
            external: &NoExternalGeometry,
        };
        let params = RimDampenerParams {
            segments: 12,
            channel_segments: 8,
            ..RimDampenerParams::default()
        };
        let solid = params.generate(&ctx).unwrap();
        assert!(solid.mesh().manifold_report(config.area_epsilon).is_manifold());

        // Midway through the sweep: channel center is empty, rim wall is not.
        let mid = DVec2::from_angle(params.angle / 2.0);
        let channel_r = 152.4 - 15.0 + 2.0;
        let at = |r: f64, z: f64| DVec3::new(mid.x * r, mid.y * r, z);
        assert!(!solid.contains_point(at(channel_r, 3.0)));
        assert!(solid.contains_point(at(channel_r + 1.6, 3.0)));
        assert!(solid.contains_point(at(152.4, 0.5)));
    }
}
