//! # 2D Regions
//!
//! A [`Region`] is a set of disjoint [`Polygon2`] values. Union, difference
//! and intersection go through `geo`'s `BooleanOps`, which snaps coordinates
//! to an integer grid internally and therefore stays robust on the
//! near-coincident edges produced by offsetting.

use super::Polygon2;
use crate::error::{KernelError, KernelResult};
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon as GeoPolygon};
use glam::DVec2;

/// Vertices closer than this (or this close to collinear) are merged when
/// reading results back from `geo`.
const CLEANUP_EPSILON: f64 = 1e-7;

/// A set of disjoint polygons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    polygons: Vec<Polygon2>,
}

impl Region {
    /// Wraps polygons that are already known to be disjoint.
    pub fn new(polygons: Vec<Polygon2>) -> Self {
        Self { polygons }
    }

    /// A region made of one polygon.
    pub fn from_polygon(polygon: Polygon2) -> Self {
        Self {
            polygons: vec![polygon],
        }
    }

    /// The member polygons.
    pub fn polygons(&self) -> &[Polygon2] {
        &self.polygons
    }

    /// Number of disjoint pieces.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// True if nothing is enclosed.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Total enclosed area.
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon2::area).sum()
    }

    /// Set union.
    #[must_use]
    pub fn union(&self, other: &Region) -> Region {
        Region::from_geo(&self.to_geo().union(&other.to_geo()))
    }

    /// Set difference `self \ other`.
    #[must_use]
    pub fn difference(&self, other: &Region) -> Region {
        Region::from_geo(&self.to_geo().difference(&other.to_geo()))
    }

    /// Set intersection.
    #[must_use]
    pub fn intersection(&self, other: &Region) -> Region {
        Region::from_geo(&self.to_geo().intersection(&other.to_geo()))
    }

    /// Unions many regions by pairwise reduction, keeping operand sizes
    /// balanced.
    pub fn union_all(mut regions: Vec<Region>) -> Region {
        if regions.is_empty() {
            return Region::default();
        }
        while regions.len() > 1 {
            let mut merged = Vec::with_capacity(regions.len().div_ceil(2));
            let mut iter = regions.into_iter();
            while let Some(first) = iter.next() {
                match iter.next() {
                    Some(second) => merged.push(first.union(&second)),
                    None => merged.push(first),
                }
            }
            regions = merged;
        }
        regions.pop().unwrap_or_default()
    }

    /// The single polygon of a connected region.
    ///
    /// # Errors
    ///
    /// [`KernelError::Geometry`] if the region is empty or has several
    /// disjoint pieces.
    pub fn into_single(mut self) -> KernelResult<Polygon2> {
        match self.polygons.len() {
            1 => Ok(self.polygons.remove(0)),
            0 => Err(KernelError::geometry("region is empty")),
            n => Err(KernelError::geometry(format!(
                "region has {n} disjoint pieces, expected one connected outline"
            ))),
        }
    }

    pub(crate) fn to_geo(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons.iter().map(polygon_to_geo).collect())
    }

    pub(crate) fn from_geo(multi: &MultiPolygon<f64>) -> Region {
        let polygons = multi
            .0
            .iter()
            .map(|polygon| {
                Polygon2::with_holes(
                    ring_from_geo(polygon.exterior()),
                    polygon.interiors().iter().map(ring_from_geo).collect(),
                )
                .simplified(CLEANUP_EPSILON)
                .normalized()
            })
            .filter(|polygon| polygon.outer.len() >= 3)
            .collect();
        Region { polygons }
    }
}

impl From<Polygon2> for Region {
    fn from(polygon: Polygon2) -> Self {
        Region::from_polygon(polygon)
    }
}

fn ring_to_geo(ring: &[DVec2]) -> LineString<f64> {
    LineString::new(ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

fn polygon_to_geo(polygon: &Polygon2) -> GeoPolygon<f64> {
    GeoPolygon::new(
        ring_to_geo(&polygon.outer),
        polygon.holes.iter().map(|hole| ring_to_geo(hole)).collect(),
    )
}

fn ring_from_geo(ring: &LineString<f64>) -> Vec<DVec2> {
    let mut points: Vec<DVec2> = ring.0.iter().map(|c| DVec2::new(c.x, c.y)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}
