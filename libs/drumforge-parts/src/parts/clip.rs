//! # Hook Dampener Clip
//!
//! The clip hooks over a drum hoop and carries the dampener arm. Its
//! silhouette is a set of centerline pieces (the clasp arcs, the bracket
//! lip, the arm bend and the foot) stroked with round corners to the
//! material thickness, then extruded by the clip width. Two vertical bolt
//! holes go through the foot.
//!
//! ```text
//!              ╭──╮  clasp
//!              │  │
//!      ╭───────╰──╯  bracket lip
//!      │  arm
//!  ────╯  foot with bolt holes at inset and inset + span
//! ```

use super::{hole, BuildContext, PartGeometry, Validator};
use crate::error::PartResult;
use crate::external::ExternalGeometry;
use config::constants::GeometryConfig;
use drumforge_geometry::ops::extrude::{linear_extrude, LinearExtrudeParams};
use drumforge_geometry::ops::offset::{offset_paths, OffsetParams};
use drumforge_geometry::{subtract, Arc, KernelResult, Path, Solid, Transform};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::debug;

/// Length the bracket lip runs past half of the clip and bolt widths.
pub const BRACKET_LIP: f64 = 2.0;

// =============================================================================
// PARAMETERS
// =============================================================================

/// How the clip is mounted on the drum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Hooked over a tom or snare hoop
    #[default]
    Standard,
    /// Hooked over a kick drum hoop: shorter top arc, full lower bend and a
    /// spine down the back of the clasp
    KickMount,
}

impl Orientation {
    /// End angle of the top clasp arc, which starts at zero.
    pub fn top_sweep_end(self) -> f64 {
        match self {
            Self::Standard => PI,
            Self::KickMount => FRAC_PI_2,
        }
    }

    /// Start angle of the lower bends, which sweep counter-clockwise to a
    /// full turn.
    pub fn lower_sweep_start(self) -> f64 {
        match self {
            Self::Standard => 1.5 * PI,
            Self::KickMount => PI,
        }
    }

    /// Origin of the bracket relative to the clasp center.
    pub fn bracket_origin(self, radius: f64) -> DVec2 {
        match self {
            Self::Standard => DVec2::ZERO,
            Self::KickMount => DVec2::new(-radius, 0.0),
        }
    }

    /// Horizontal reach of the lower arm bend left of the bracket origin,
    /// in clasp radii.
    fn bend_reach(self) -> f64 {
        match self {
            Self::Standard => 4.0,
            Self::KickMount => 5.0,
        }
    }
}

/// Clasp opening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clasp {
    /// Inside height of the hook
    pub height: f64,
    /// Inside depth of the hook
    pub depth: f64,
}

impl Default for Clasp {
    fn default() -> Self {
        Self {
            height: 34.925,
            depth: 12.7,
        }
    }
}

/// Bolt pattern in the foot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipBolt {
    /// Bolt diameter
    pub width: f64,
    /// Distance of the first hole from the bracket origin
    pub inset: f64,
    /// Distance between the two holes
    pub span: f64,
}

impl Default for ClipBolt {
    fn default() -> Self {
        Self {
            width: 6.35,
            inset: 76.2,
            span: 25.4,
        }
    }
}

/// Dampener arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipArm {
    /// Vertical drop between bracket and foot
    pub depth: f64,
}

impl Default for ClipArm {
    fn default() -> Self {
        Self { depth: 19.05 }
    }
}

/// Parameters of a hook dampener clip (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipParams {
    /// Extrusion width
    pub width: f64,
    /// Material thickness
    pub thickness: f64,
    /// Vertical offset of the lower bend below the arm
    pub offset: f64,
    /// Hook opening
    pub clasp: Clasp,
    /// Foot bolt pattern
    pub bolt: ClipBolt,
    /// Arm drop
    pub arm: ClipArm,
    /// Mounting orientation
    pub orientation: Orientation,
    /// Tessellation of a full circle
    pub segments: u32,
}

impl Default for ClipParams {
    fn default() -> Self {
        Self {
            width: 25.4,
            thickness: 6.35,
            offset: 6.35,
            clasp: Clasp::default(),
            bolt: ClipBolt::default(),
            arm: ClipArm::default(),
            orientation: Orientation::Standard,
            segments: 30,
        }
    }
}

// =============================================================================
// DERIVED LAYOUT
// =============================================================================

/// Secondary dimensions of a clip, derived from its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipLayout {
    /// Centerline radius of every bend
    pub radius: f64,
    /// Half the material thickness; the stroke distance
    pub delta: f64,
    /// Straight run between the two clasp arcs
    pub mid_height: f64,
    /// Bracket origin
    pub bracket: DVec2,
    /// Centerline height of the foot
    pub foot_y: f64,
    /// Far end of the foot centerline
    pub foot_end_x: f64,
    /// Bolt hole centers in the XY plane; both sit at half the width in Z
    pub holes: [DVec2; 2],
}

impl ClipLayout {
    /// Derives the layout. Pure arithmetic, no validation.
    pub fn derive(params: &ClipParams) -> Self {
        let radius = params.clasp.depth / 2.0 + params.thickness / 2.0;
        let delta = params.thickness / 2.0;
        let mid_height = params.clasp.height - 2.0 * radius;
        let bracket = params.orientation.bracket_origin(radius);
        let foot_y = bracket.y - 3.0 * radius - delta - mid_height / 2.0 - params.arm.depth;
        let first = bracket.x - params.bolt.inset;
        let second = first - params.bolt.span;
        Self {
            radius,
            delta,
            mid_height,
            bracket,
            foot_y,
            foot_end_x: second - (params.width + params.bolt.width) / 2.0,
            holes: [DVec2::new(first, foot_y), DVec2::new(second, foot_y)],
        }
    }

    /// Outer top of the clasp.
    pub fn clasp_top(&self) -> f64 {
        self.mid_height / 2.0 + self.radius + self.delta
    }

    /// Outer bottom of the clasp.
    pub fn clasp_bottom(&self) -> f64 {
        -self.mid_height / 2.0 - self.radius - self.delta
    }

    /// Center of the lower arm bend.
    fn lower_bend_center(&self, params: &ClipParams) -> DVec2 {
        DVec2::new(
            self.bracket.x - 4.0 * self.radius,
            self.bracket.y
                - params.offset
                - params.thickness
                - self.mid_height / 2.0
                - self.radius
                - params.arm.depth,
        )
    }

    /// Centerline pieces of the silhouette. Pieces only need to overlap
    /// once stroked, not to meet end to end.
    pub fn centerlines(&self, params: &ClipParams, config: &GeometryConfig) -> KernelResult<Vec<Path>> {
        let (r, m, b) = (self.radius, self.mid_height, self.bracket);
        let quarter_steps = params.segments.div_ceil(4).max(1);
        let arc = |center: DVec2, start: f64, end: f64| {
            let steps = (f64::from(quarter_steps) * (end - start).abs() / FRAC_PI_2).round() as u32;
            Path::arc(Arc::new(center, r, start, end, steps.max(1)))
        };
        let lower_start = params.orientation.lower_sweep_start();
        let lip_y = b.y - m / 2.0 - r;
        let arm_x = b.x - 3.0 * r;
        let lower_center = self.lower_bend_center(params);

        let mut paths = vec![
            arc(DVec2::new(0.0, m / 2.0), 0.0, params.orientation.top_sweep_end())?,
            arc(DVec2::new(0.0, -m / 2.0), lower_start, TAU)?,
            Path::line(
                DVec2::new(b.x, lip_y),
                DVec2::new(b.x - (params.width + params.bolt.width) / 2.0 - BRACKET_LIP, lip_y),
            ),
            arc(DVec2::new(b.x - 2.0 * r, lip_y - r), FRAC_PI_2, PI)?,
            Path::line(
                DVec2::new(arm_x, lip_y - r),
                DVec2::new(arm_x, lip_y - r - BRACKET_LIP - params.arm.depth),
            ),
            arc(lower_center, lower_start, TAU)?,
            Path::line(
                DVec2::new(b.x - 4.0 * r, self.foot_y),
                DVec2::new(self.foot_end_x, self.foot_y),
            ),
        ];
        if m > config.path_epsilon {
            paths.push(Path::line(DVec2::new(r, m / 2.0), DVec2::new(r, -m / 2.0)));
            if params.orientation == Orientation::KickMount {
                paths.push(Path::line(b, DVec2::new(b.x, b.y - m / 2.0)));
            }
        }
        Ok(paths)
    }

    /// Gaps between consecutive stroked pieces along their shared
    /// centerline.
    fn joints(&self, params: &ClipParams) -> [Joint; 3] {
        let r = self.radius;
        let lip_end = (params.width + params.bolt.width) / 2.0 + BRACKET_LIP;
        let arm_end = self.bracket.y - self.mid_height / 2.0 - 2.0 * r - BRACKET_LIP - params.arm.depth;
        let lower = self.lower_bend_center(params);
        [
            // The lip may run on past the start of the arm bend.
            Joint::overlapping("width", 2.0 * r - lip_end),
            // The arm may run on past the end of the lower bend.
            Joint::overlapping("offset", arm_end - lower.y),
            // Foot and lower bend are parallel: both directions leave a step.
            Joint::aligned("offset", self.foot_y - (lower.y - r)),
        ]
    }
}

/// Where two stroked pieces of the outline meet.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Joint {
    parameter: &'static str,
    /// Centerline distance left open between the pieces; negative when they
    /// overlap
    gap: f64,
    /// Overlapping pieces stay connected
    may_overlap: bool,
}

impl Joint {
    fn overlapping(parameter: &'static str, gap: f64) -> Self {
        Self {
            parameter,
            gap,
            may_overlap: true,
        }
    }

    fn aligned(parameter: &'static str, gap: f64) -> Self {
        Self {
            parameter,
            gap,
            may_overlap: false,
        }
    }

    /// True when the stroked pieces still touch.
    fn connected(&self, thickness: f64) -> bool {
        let gap = if self.may_overlap { self.gap } else { self.gap.abs() };
        gap < thickness
    }
}

// =============================================================================
// GENERATION
// =============================================================================

impl PartGeometry for ClipParams {
    const KIND: &'static str = "clip";

    fn validate(&self, _external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        check.positive("width", self.width)?;
        check.positive("thickness", self.thickness)?;
        check.non_negative("offset", self.offset)?;
        check.positive("clasp.height", self.clasp.height)?;
        check.positive("clasp.depth", self.clasp.depth)?;
        check.positive("bolt.width", self.bolt.width)?;
        check.positive("arm.depth", self.arm.depth)?;
        check.segments("segments", self.segments)?;

        let layout = ClipLayout::derive(self);
        check.require(
            layout.mid_height >= 0.0,
            "clasp.height",
            format!(
                "must be at least clasp.depth + thickness ({})",
                2.0 * layout.radius
            ),
        )?;
        check.require(
            self.bolt.width < self.width,
            "bolt.width",
            "bolt holes must be narrower than the clip",
        )?;
        check.require(
            self.bolt.span > self.bolt.width,
            "bolt.span",
            "bolt holes must not overlap",
        )?;
        let reach = self.orientation.bend_reach() * layout.radius + layout.delta;
        check.require(
            self.bolt.inset - self.bolt.width / 2.0 > reach,
            "bolt.inset",
            format!("first hole must clear the arm bend ({reach} from the bracket)"),
        )?;
        for joint in layout.joints(self) {
            check.require(
                joint.connected(self.thickness),
                joint.parameter,
                format!("leaves a {:.3} gap in the outline", joint.gap),
            )?;
        }
        Ok(())
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let layout = ClipLayout::derive(self);
        debug!(?layout, "clip: derived layout");

        let paths = layout.centerlines(self, ctx.config)?;
        let outline = offset_paths(&paths, &OffsetParams::round(layout.delta), ctx.config)?
            .into_single()?;
        let body = linear_extrude(&outline, &LinearExtrudeParams::new(self.width), ctx.config)?;

        let holes = layout
            .holes
            .iter()
            .map(|center| {
                let placement = Transform::rotation_z(TAU / 8.0)
                    .then(Transform::rotation_x(-FRAC_PI_2))
                    .then(Transform::translation(center.extend(self.width / 2.0)));
                hole(self.bolt.width, self.thickness, self.segments, placement)
            })
            .collect::<KernelResult<Vec<_>>>()?;

        subtract(body, holes, ctx.config)
    }
}
