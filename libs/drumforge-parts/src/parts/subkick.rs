//! # Subkick
//!
//! Two parts of a subkick microphone: the shell holding the speaker and
//! the flange that carries the microphone stand thread.
//!
//! The shell is a cylinder cup with a floor ring for the speaker screws.
//! A flat mount disc sits radially in the wall: its inner copy flattens a
//! seat inside the wall, its outer copy adds a pad outside. The flange is
//! a rounded disc and neck with its lower half cut away, bored for the
//! stand thread and drilled with the same screw pattern as the mount.

use super::{hole, hole_circle, BuildContext, PartGeometry, Validator, CUT_OVERSHOOT};
use crate::error::PartResult;
use crate::external::{ExternalFeature, ExternalGeometry, ThreadSpec};
use drumforge_geometry::primitives::{cylinder, rounded_cylinder};
use drumforge_geometry::{subtract, union, KernelResult, Solid, Transform};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

// =============================================================================
// SHARED MOUNT
// =============================================================================

/// Screw circle shared by the shell's mount and the flange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountScrews {
    pub count: u32,
    pub diameter: f64,
    /// Diameter of the circle the screws sit on
    pub inset: f64,
}

impl Default for MountScrews {
    fn default() -> Self {
        Self {
            count: 3,
            diameter: 3.175,
            inset: 31.75,
        }
    }
}

/// Flat disc the flange is screwed to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlangeMount {
    /// Height of the disc center relative to the shell center
    pub offset: f64,
    /// Angle of the disc around the shell axis
    pub angle: f64,
    pub diameter: f64,
    pub thickness: f64,
    pub screws: MountScrews,
}

impl Default for FlangeMount {
    fn default() -> Self {
        Self {
            offset: -101.6 / 8.0,
            angle: PI / 4.0,
            diameter: 38.1,
            thickness: 6.35,
            screws: MountScrews::default(),
        }
    }
}

impl FlangeMount {
    fn validate_screws(&self, check: &Validator) -> PartResult<()> {
        check.positive("mount.diameter", self.diameter)?;
        check.positive("mount.thickness", self.thickness)?;
        check.positive("mount.screws.diameter", self.screws.diameter)?;
        check.positive("mount.screws.inset", self.screws.inset)?;
        check.require(self.screws.count > 0, "mount.screws.count", "must be positive")?;
        check.require(
            self.screws.inset / 2.0 + self.screws.diameter / 2.0 < self.diameter / 2.0,
            "mount.screws.inset",
            "screws must lie inside the mount disc",
        )
    }

    /// The screw circle around the Z axis, `length` long and centered on
    /// `z = 0`, before any placement.
    fn screw_holes(&self, length: f64, segments: u32) -> KernelResult<Vec<Solid>> {
        hole_circle(
            self.screws.count,
            self.screws.inset / 2.0,
            0.0,
            self.screws.diameter,
            length,
            segments,
        )
    }
}

// =============================================================================
// SHELL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakerScrews {
    pub count: u32,
    pub diameter: f64,
}

impl Default for SpeakerScrews {
    fn default() -> Self {
        Self {
            count: 4,
            diameter: 3.175,
        }
    }
}

/// Floor ring the speaker is screwed to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellRim {
    /// Radial width of the ring measured on the diameter
    pub inset: f64,
    pub thickness: f64,
    pub screws: SpeakerScrews,
}

impl Default for ShellRim {
    fn default() -> Self {
        Self {
            inset: 25.4,
            thickness: 6.35,
            screws: SpeakerScrews::default(),
        }
    }
}

/// Parameters of a subkick shell (millimeters, radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubkickShellParams {
    /// Inside diameter
    pub diameter: f64,
    /// Wall thickness
    pub thickness: f64,
    pub height: f64,
    pub rim: ShellRim,
    pub mount: FlangeMount,
    /// Angular steps of the shell
    pub segments: u32,
}

impl Default for SubkickShellParams {
    fn default() -> Self {
        Self {
            diameter: 203.2,
            thickness: 6.35,
            height: 101.6,
            rim: ShellRim::default(),
            mount: FlangeMount::default(),
            segments: 100,
        }
    }
}

impl SubkickShellParams {
    pub fn outer_radius(&self) -> f64 {
        self.diameter / 2.0 + self.thickness
    }

    /// Radius of the speaker screw circle, in the middle of the floor ring.
    pub fn speaker_screw_radius(&self) -> f64 {
        (self.diameter - self.rim.inset / 2.0) / 2.0
    }

    /// Places a solid built around the Z axis onto the wall: its axis
    /// becomes the radial direction at the mount angle, centered in the
    /// wall at the mount height, shifted radially by `shift`.
    pub fn mount_placement(&self, shift: f64) -> Transform {
        Transform::rotation_y(FRAC_PI_2)
            .then(Transform::translation(DVec3::new(
                (self.diameter + self.thickness) / 2.0 + shift,
                0.0,
                self.mount.offset,
            )))
            .then(Transform::rotation_z(self.mount.angle))
    }
}

impl PartGeometry for SubkickShellParams {
    const KIND: &'static str = "subkick_shell";

    fn validate(&self, _external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("diameter", self.diameter)?;
        check.positive("thickness", self.thickness)?;
        check.positive("height", self.height)?;
        check.positive("rim.inset", self.rim.inset)?;
        check.positive("rim.thickness", self.rim.thickness)?;
        check.positive("rim.screws.diameter", self.rim.screws.diameter)?;
        check.segments("segments", self.segments)?;
        self.mount.validate_screws(&check)?;

        check.require(
            self.rim.inset < self.diameter,
            "rim.inset",
            "speaker opening must stay open",
        )?;
        check.require(
            self.rim.thickness < self.height,
            "rim.thickness",
            "floor must be thinner than the shell height",
        )?;
        check.require(
            self.rim.screws.diameter < self.rim.inset / 2.0,
            "rim.screws.diameter",
            "speaker screws must fit the floor ring",
        )?;
        check.require(
            self.mount.offset.abs() + self.mount.diameter / 2.0 < self.height / 2.0,
            "mount.offset",
            "mount disc must stay within the shell height",
        )?;
        check.require(
            self.mount.diameter < self.diameter,
            "mount.diameter",
            "mount disc must be narrower than the shell",
        )?;
        check.require(
            self.mount.thickness <= self.thickness,
            "mount.thickness",
            "mount disc must not be thicker than the wall",
        )
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let half = self.height / 2.0;
        let screw_segments = ctx.config.default_segments;
        let body = cylinder(self.outer_radius(), self.height, self.segments, true)?;

        let mut cutters = hole_circle(
            self.rim.screws.count,
            self.speaker_screw_radius(),
            -half + self.rim.thickness / 2.0,
            self.rim.screws.diameter,
            self.rim.thickness,
            screw_segments,
        )?;

        // Past the opening cutter's top so the two caps are not coplanar.
        let cavity_height = self.height - self.rim.thickness + 2.0 * CUT_OVERSHOOT;
        cutters.push(
            cylinder(self.diameter / 2.0, cavity_height, self.segments, false)?
                .translated(DVec3::new(0.0, 0.0, -half + self.rim.thickness)),
        );
        cutters.push(hole(
            self.diameter - self.rim.inset,
            self.height,
            self.segments,
            Transform::IDENTITY,
        )?);

        let outer = self.mount_placement(0.0);
        let mount_screws: Vec<Solid> = self
            .mount
            .screw_holes(self.mount.thickness, screw_segments)?
            .iter()
            .map(|screw| screw.transformed(&outer))
            .collect();
        cutters.extend(mount_screws.iter().cloned());
        let seat = cylinder(
            self.mount.diameter / 2.0,
            self.mount.thickness,
            self.segments,
            true,
        )?;
        cutters.push(seat.transformed(&self.mount_placement(-self.thickness / 2.0)));

        let cup = subtract(body, cutters, ctx.config)?;
        let pad = subtract(seat.transformed(&outer), mount_screws, ctx.config)?;
        union([cup, pad], ctx.config)
    }
}

// =============================================================================
// FLANGE
// =============================================================================

/// Neck carrying the stand thread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlangeNeck {
    pub diameter: f64,
    pub height: f64,
}

impl Default for FlangeNeck {
    fn default() -> Self {
        Self {
            diameter: 25.4,
            height: 25.4,
        }
    }
}

/// Parameters of a subkick flange (millimeters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubkickFlangeParams {
    /// Disc matching the shell's mount
    pub mount: FlangeMount,
    /// Height of the full rounded disc before its lower half is cut away
    pub base_height: f64,
    pub round_radius: f64,
    pub neck: FlangeNeck,
    /// Plain bore below the thread
    pub bore_diameter: f64,
    /// Cut an external thread solid into the bore
    pub threaded: bool,
    pub thread: String,
    pub turns: u32,
    pub segments: u32,
}

impl Default for SubkickFlangeParams {
    fn default() -> Self {
        Self {
            mount: FlangeMount::default(),
            base_height: 12.7,
            round_radius: 1.0,
            neck: FlangeNeck::default(),
            bore_diameter: 14.2,
            threaded: false,
            thread: "28-UN-5/8-ext".to_string(),
            turns: 20,
            segments: 100,
        }
    }
}

impl SubkickFlangeParams {
    /// Height where the bore starts.
    pub fn bore_floor(&self) -> f64 {
        self.neck.height / 4.0
    }

    fn bore(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let floor = self.bore_floor();
        let length = self.neck.height / 2.0 - floor + CUT_OVERSHOOT;
        let plain = cylinder(self.bore_diameter / 2.0, length, self.segments, false)?
            .translated(DVec3::new(0.0, 0.0, floor));
        if !self.threaded {
            return Ok(plain);
        }
        let thread = ctx.external.thread(&ThreadSpec {
            designation: self.thread.clone(),
            turns: self.turns,
            segments: self.segments,
        })?;
        union([plain, thread.translated(DVec3::new(0.0, 0.0, floor))], ctx.config)
    }
}

impl PartGeometry for SubkickFlangeParams {
    const KIND: &'static str = "subkick_flange";

    fn validate(&self, external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("base_height", self.base_height)?;
        check.non_negative("round_radius", self.round_radius)?;
        check.positive("neck.diameter", self.neck.diameter)?;
        check.positive("neck.height", self.neck.height)?;
        check.positive("bore_diameter", self.bore_diameter)?;
        check.segments("segments", self.segments)?;
        self.mount.validate_screws(&check)?;

        check.require(
            self.neck.diameter < self.mount.diameter,
            "neck.diameter",
            "neck must be narrower than the disc",
        )?;
        check.require(
            self.base_height < self.neck.height,
            "base_height",
            "disc must be lower than the neck",
        )?;
        check.require(
            2.0 * self.round_radius < self.base_height.min(self.neck.diameter / 2.0),
            "round_radius",
            "rounding must fit the disc and the neck",
        )?;
        check.require(
            self.bore_diameter < self.neck.diameter,
            "bore_diameter",
            "bore must leave a neck wall",
        )?;
        check.require(
            self.mount.screws.inset / 2.0 - self.mount.screws.diameter / 2.0 > self.neck.diameter / 2.0,
            "mount.screws.inset",
            "screws must clear the neck",
        )?;
        if self.threaded {
            check.require(self.turns > 0, "turns", "must be positive")?;
            check.provider("threaded", external, ExternalFeature::Thread)?;
        }
        Ok(())
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let disc = rounded_cylinder(
            self.mount.diameter / 2.0,
            self.base_height,
            self.round_radius,
            self.segments,
            ctx.config,
        )?;
        let neck = rounded_cylinder(
            self.neck.diameter / 2.0,
            self.neck.height,
            self.round_radius,
            self.segments,
            ctx.config,
        )?;
        let body = union([disc, neck], ctx.config)?;

        let lower = self.neck.height / 2.0 + CUT_OVERSHOOT;
        let lower_half = cylinder(
            self.mount.diameter / 2.0 + CUT_OVERSHOOT,
            lower,
            self.segments,
            false,
        )?
        .translated(DVec3::new(0.0, 0.0, -lower));

        let mut cutters = vec![lower_half, self.bore(ctx)?];
        cutters.extend(
            self.mount
                .screw_holes(self.base_height, ctx.config.default_segments)?,
        );
        subtract(body, cutters, ctx.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::NoExternalGeometry;
    use approx::assert_abs_diff_eq;
    use config::constants::GeometryConfig;

    fn context(config: &GeometryConfig) -> BuildContext<'_> {
        BuildContext {
            config,
            external: &NoExternalGeometry,
        }
    }

    fn at(angle: f64, radius: f64, z: f64) -> DVec3 {
        DVec3::new(radius * angle.cos(), radius * angle.sin(), z)
    }

    // =========================================================================
    // SHELL
    // =========================================================================

    #[test]
    fn test_shell_derivations() {
        let params = SubkickShellParams::default();
        assert_abs_diff_eq!(params.outer_radius(), 107.95, epsilon = 1e-12);
        assert_abs_diff_eq!(params.speaker_screw_radius(), 95.25, epsilon = 1e-12);
        let center = params.mount_placement(0.0).apply_point(DVec3::ZERO);
        assert_abs_diff_eq!(center.truncate().length(), 104.775, epsilon = 1e-9);
        assert_abs_diff_eq!(center.z, -12.7, epsilon = 1e-12);
        assert!(params.validate(&NoExternalGeometry).is_ok());
    }

    #[test]
    fn test_shell_rejects_mount_off_the_wall() {
        let params = SubkickShellParams {
            mount: FlangeMount {
                offset: -45.0,
                ..FlangeMount::default()
            },
            ..SubkickShellParams::default()
        };
        let err = params.validate(&NoExternalGeometry).unwrap_err();
        assert!(err.to_string().contains("mount.offset"));
    }

    #[test]
    fn test_shell_cup_and_mount() {
        let config = GeometryConfig::default().with_default_segments(8).unwrap();
        let params = SubkickShellParams {
            segments: 20,
            ..SubkickShellParams::default()
        };
        let solid = params.generate(&context(&config)).unwrap();
        assert!(solid.mesh().manifold_report(config.area_epsilon).is_manifold());

        let quarter = PI / 4.0;
        // Floor ring, speaker opening, wall, open top.
        assert!(solid.contains_point(at(PI / 3.0, 94.0, -48.0)));
        assert!(!solid.contains_point(at(PI / 3.0, 50.0, -48.0)));
        assert!(solid.contains_point(at(PI, 104.5, 0.3)));
        assert!(!solid.contains_point(at(PI, 50.0, 0.3)));
        // Pad outside the wall at the mount, screw through it.
        assert!(solid.contains_point(at(quarter, 107.5, -12.7)));
        assert!(!solid.contains_point(at(quarter, 105.0, -12.7 - 15.875)));
    }

    // =========================================================================
    // FLANGE
    // =========================================================================

    #[test]
    fn test_flange_bore_and_screws() {
        let config = GeometryConfig::default().with_default_segments(8).unwrap();
        let params = SubkickFlangeParams {
            segments: 24,
            ..SubkickFlangeParams::default()
        };
        let solid = params.generate(&context(&config)).unwrap();
        assert!(solid.mesh().manifold_report(config.area_epsilon).is_manifold());

        let bbox = solid.bounding_box().unwrap();
        assert_abs_diff_eq!(bbox.min.z, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.max.z, 12.7, epsilon = 1e-9);

        // Solid below the bore floor, bored above it.
        assert!(solid.contains_point(DVec3::new(0.2, 0.3, 3.0)));
        assert!(!solid.contains_point(DVec3::new(0.2, 0.3, 10.0)));
        assert!(solid.contains_point(DVec3::new(10.0, 0.3, 10.0)));
        // First mount screw on +X goes through the disc.
        assert!(!solid.contains_point(DVec3::new(15.875, 0.2, 3.0)));
        assert!(solid.contains_point(DVec3::new(17.5, 4.0, 3.0)));
    }

    #[test]
    fn test_flange_threaded_needs_provider() {
        let params = SubkickFlangeParams {
            threaded: true,
            ..SubkickFlangeParams::default()
        };
        assert!(params.validate(&NoExternalGeometry).is_err());
        assert!(SubkickFlangeParams::default().validate(&NoExternalGeometry).is_ok());
    }
}
