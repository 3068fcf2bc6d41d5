//! # Kick Riser
//!
//! A wedge that lifts a kick drum off the floor. The outline is an ASA
//! triangle with the drum's cradle cut from its top and a slot for a
//! mounting plate cut from its base. The walls are that outline minus a
//! chamber inset by the padding; two screw holes reach up from the slot.
//!
//! With a honeycomb provider the chamber is filled with the provider's
//! lattice clipped to the chamber.

use super::{BuildContext, PartGeometry, Validator, CUT_OVERSHOOT};
use crate::error::PartResult;
use crate::external::{ExternalFeature, ExternalGeometry, HoneycombSpec};
use config::constants::{segments_for_sweep, GeometryConfig};
use drumforge_geometry::ops::extrude::{linear_extrude, LinearExtrudeParams};
use drumforge_geometry::ops::offset::{offset_polygon, OffsetParams};
use drumforge_geometry::primitives::cylinder;
use drumforge_geometry::profile::shapes::{rectangle, sector, triangle_asa};
use drumforge_geometry::{
    intersect, subtract, union, KernelResult, Polygon2, Region, Solid, Transform,
};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::debug;

// =============================================================================
// PARAMETERS
// =============================================================================

/// Triangular body the drum rests on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiserBase {
    /// Length of the triangle's base
    pub width: f64,
    /// Height of the cradle's lowest point
    pub height: f64,
    /// Extrusion depth
    pub depth: f64,
    /// Wall thickness around the chamber
    pub padding: f64,
    /// Base angles of the triangle
    pub angle: f64,
}

impl Default for RiserBase {
    fn default() -> Self {
        Self {
            width: 139.7,
            height: 50.8,
            depth: 63.5,
            padding: 3.175,
            angle: PI / 2.5,
        }
    }
}

/// Slot for the mounting plate, cut up from the middle of the base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slot {
    /// Width across the base
    pub width: f64,
    /// Depth of the cut from the bottom face
    pub height: f64,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            width: 19.05,
            height: 19.05,
        }
    }
}

/// Screws fixing the mounting plate, reaching up from the slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiserScrews {
    /// Distance between the two screws along the depth
    pub spread: f64,
    /// Hole diameter
    pub diameter: f64,
    /// Length of each hole, centered on the top of the slot
    pub length: f64,
}

impl Default for RiserScrews {
    fn default() -> Self {
        Self {
            spread: 31.75,
            diameter: 3.175,
            length: 9.525,
        }
    }
}

/// Honeycomb infill cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Honeycomb {
    /// Cells along the height
    pub rows: u32,
    /// Cells along the base
    pub columns: u32,
    /// Circumradius of one cell
    pub radius: f64,
    /// Wall between neighbouring cells
    pub gap: f64,
}

impl Default for Honeycomb {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 6,
            radius: 19.05,
            gap: 3.175,
        }
    }
}

/// Parameters of a kick riser (millimeters, radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickRiserParams {
    /// Diameter of the kick drum resting in the cradle
    pub drum_diameter: f64,
    /// Triangular body
    pub base: RiserBase,
    /// Mounting plate slot
    pub slot: Slot,
    /// Mounting plate screws
    pub screws: RiserScrews,
    /// Fill the chamber with an external honeycomb lattice
    pub honeycomb: Option<Honeycomb>,
    /// Tessellation of a full circle of the cradle
    pub segments: u32,
}

impl Default for KickRiserParams {
    fn default() -> Self {
        Self {
            drum_diameter: 457.2,
            base: RiserBase::default(),
            slot: Slot::default(),
            screws: RiserScrews::default(),
            honeycomb: None,
            segments: 200,
        }
    }
}

// =============================================================================
// PROFILES
// =============================================================================

impl KickRiserParams {
    /// Triangle minus cradle and slot, symmetric about the Y axis with its
    /// base on `y = 0`.
    pub fn outline(&self) -> KernelResult<Polygon2> {
        let base = &self.base;
        let wedge = triangle_asa(base.angle, base.width, base.angle)?
            .translated(DVec2::new(-base.width / 2.0, 0.0));

        let drum_radius = self.drum_diameter / 2.0;
        let sweep = PI - 2.0 * base.angle;
        let cradle = sector(
            drum_radius,
            DVec2::new(0.0, drum_radius + base.height),
            PI + base.angle,
            TAU - base.angle,
            segments_for_sweep(sweep, TAU / f64::from(self.segments)),
        )?;
        let slot = rectangle(
            DVec2::new(self.slot.width, self.slot.height),
            DVec2::new(0.0, self.slot.height / 2.0),
        );

        Region::from(wedge)
            .difference(&Region::from(cradle))
            .difference(&Region::from(slot))
            .into_single()
    }

    /// The outline inset by the padding, minus the clearance around the
    /// slot that keeps material for the screws.
    pub fn chamber(&self, outline: &Polygon2, config: &GeometryConfig) -> KernelResult<Region> {
        let padding = self.base.padding;
        let inset = offset_polygon(outline, &OffsetParams::round(-padding), config)?;
        let clearance_height = self.slot.height + self.screws.length;
        let clearance = rectangle(
            DVec2::new(self.slot.width + 2.0 * padding, clearance_height),
            DVec2::new(0.0, clearance_height / 2.0),
        );
        Ok(inset.difference(&Region::from(clearance)))
    }

    fn screw_holes(&self, segments: u32) -> KernelResult<Vec<Solid>> {
        [1.0, -1.0]
            .into_iter()
            .map(|side: f64| {
                let placement = Transform::rotation_x(-FRAC_PI_2).then(Transform::translation(
                    DVec3::new(0.0, self.slot.height, side * self.screws.spread / 2.0),
                ));
                Ok(cylinder(self.screws.diameter / 2.0, self.screws.length, segments, true)?
                    .transformed(&placement))
            })
            .collect()
    }

    fn infill(
        &self,
        cells: &Honeycomb,
        chamber: &Region,
        ctx: &BuildContext<'_>,
    ) -> KernelResult<Solid> {
        let depth = self.base.depth;
        let lattice = ctx
            .external
            .honeycomb(&HoneycombSpec {
                rows: cells.rows,
                columns: cells.columns,
                radius: cells.radius,
                gap: cells.gap,
                height: depth + 2.0 * CUT_OVERSHOOT,
            })?
            .translated(DVec3::new(
                (-self.base.width + cells.radius + cells.gap / 2.0) / 2.0,
                0.0,
                -depth / 2.0 - CUT_OVERSHOOT,
            ));
        let space = chamber
            .polygons()
            .iter()
            .map(|polygon| {
                linear_extrude(polygon, &LinearExtrudeParams::new(depth).centered(), ctx.config)
            })
            .collect::<KernelResult<Vec<_>>>()?;
        intersect([union(space, ctx.config)?, lattice], ctx.config)
    }
}

// =============================================================================
// GENERATION
// =============================================================================

impl PartGeometry for KickRiserParams {
    const KIND: &'static str = "kick_riser";

    fn validate(&self, external: &dyn ExternalGeometry) -> PartResult<()> {
        let check = Validator::new(Self::KIND);
        let (base, slot, screws) = (&self.base, &self.slot, &self.screws);
        check.positive("drum_diameter", self.drum_diameter)?;
        check.positive("base.width", base.width)?;
        check.positive("base.height", base.height)?;
        check.positive("base.depth", base.depth)?;
        check.positive("base.padding", base.padding)?;
        check.positive("slot.width", slot.width)?;
        check.positive("slot.height", slot.height)?;
        check.positive("screws.spread", screws.spread)?;
        check.positive("screws.diameter", screws.diameter)?;
        check.positive("screws.length", screws.length)?;
        check.segments("segments", self.segments)?;

        check.require(
            base.angle > 0.0 && base.angle < FRAC_PI_2,
            "base.angle",
            format!("must lie in (0, π/2), got {}", base.angle),
        )?;
        check.require(
            base.width / 2.0 * base.angle.tan() > base.height,
            "base.height",
            "cradle must cut into the triangle",
        )?;
        check.require(
            slot.width + 4.0 * base.padding < base.width,
            "slot.width",
            "slot must leave a padded foot on each side",
        )?;
        check.require(
            slot.height + screws.length + base.padding < base.height,
            "screws.length",
            "screw clearance must stay below the cradle",
        )?;
        check.require(
            screws.diameter < slot.width,
            "screws.diameter",
            "screws must fit the slot",
        )?;
        check.require(
            screws.spread + screws.diameter < base.depth,
            "screws.spread",
            "screws must lie within the depth",
        )?;

        if let Some(cells) = &self.honeycomb {
            check.require(
                cells.rows > 0 && cells.columns > 0,
                "honeycomb",
                "needs at least one row and column",
            )?;
            check.positive("honeycomb.radius", cells.radius)?;
            check.non_negative("honeycomb.gap", cells.gap)?;
            check.provider("honeycomb", external, ExternalFeature::Honeycomb)?;
        }
        Ok(())
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        let outline = self.outline()?;
        let chamber = self.chamber(&outline, ctx.config)?;
        debug!(
            outline_area = outline.area(),
            chamber_area = chamber.area(),
            "kick riser: profiles"
        );

        let walls = Region::from(outline).difference(&chamber).into_single()?;
        let body = linear_extrude(
            &walls,
            &LinearExtrudeParams::new(self.base.depth).centered(),
            ctx.config,
        )?;
        let shell = subtract(
            body,
            self.screw_holes(ctx.config.default_segments)?,
            ctx.config,
        )?;

        match &self.honeycomb {
            Some(cells) => union([shell, self.infill(cells, &chamber, ctx)?], ctx.config),
            None => Ok(shell),
        }
    }
}
