//! # Part Assembler
//!
//! Turns part requests into solids. Every request is validated before any
//! geometry is built; kernel failures are reported with the sub-part name
//! and its parameter record.
//!
//! Independent requests share nothing but the read-only configuration and
//! provider, so [`Assembler::build_all`] and [`Assembler::build_layout`]
//! fork them onto the rayon pool and only join to report or compose.

use crate::error::{PartError, PartResult};
use crate::external::{ExternalGeometry, NoExternalGeometry};
use crate::kind::PartKind;
use crate::part::Part;
use crate::parts::clip::ClipParams;
use crate::parts::head::HeadParams;
use crate::parts::BuildContext;
use config::constants::GeometryConfig;
use drumforge_geometry::union;
use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

// =============================================================================
// REQUESTS
// =============================================================================

/// One named part to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRequest {
    pub name: String,
    #[serde(flatten)]
    pub kind: PartKind,
}

impl PartRequest {
    /// Request for `kind` reported under `name`.
    pub fn new(name: impl Into<String>, kind: PartKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A sub-part of a layout and where it goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub name: String,
    #[serde(flatten)]
    pub kind: PartKind,
    #[serde(default)]
    pub offset: DVec3,
}

/// Several parts translated side by side and unioned, for previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub entries: Vec<LayoutEntry>,
}

impl Layout {
    /// The hook dampener: clip at the origin, head beside its foot.
    pub fn hook_dampener_preview() -> Self {
        Self {
            name: "hook_dampener".to_string(),
            entries: vec![
                LayoutEntry {
                    name: "clip".to_string(),
                    kind: PartKind::Clip(ClipParams::default()),
                    offset: DVec3::ZERO,
                },
                LayoutEntry {
                    name: "head".to_string(),
                    kind: PartKind::Head(HeadParams::default()),
                    offset: DVec3::new(-50.8, 0.0, 3.175),
                },
            ],
        }
    }
}

// =============================================================================
// ASSEMBLER
// =============================================================================

/// Builds parts with a fixed configuration and provider.
#[derive(Debug, Clone)]
pub struct Assembler {
    config: GeometryConfig,
    external: Arc<dyn ExternalGeometry>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(GeometryConfig::default())
    }
}

impl Assembler {
    /// Assembler without external geometry.
    pub fn new(config: GeometryConfig) -> Self {
        Self {
            config,
            external: Arc::new(NoExternalGeometry),
        }
    }

    /// Replaces the thread and honeycomb provider.
    #[must_use]
    pub fn with_external(mut self, external: Arc<dyn ExternalGeometry>) -> Self {
        self.external = external;
        self
    }

    /// Tolerances and tessellation defaults every build uses.
    ///
    /// ```rust
    /// use drumforge_parts::Assembler;
    /// use drumforge_geometry::GeometryConfig;
    ///
    /// let config = GeometryConfig::default().with_default_segments(12).expect("valid segments");
    /// assert_eq!(Assembler::new(config).config().default_segments, 12);
    /// ```
    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Builds one part named after its kind.
    ///
    /// # Errors
    ///
    /// [`PartError::ParameterRange`] before any geometry is built, or
    /// [`PartError::Build`] if a kernel stage fails.
    pub fn build(&self, kind: &PartKind) -> PartResult<Part> {
        self.build_named(kind.name(), kind)
    }

    /// Builds one part under the given name.
    ///
    /// # Errors
    ///
    /// As [`Assembler::build`], reported under `name`.
    pub fn build_named(&self, name: &str, kind: &PartKind) -> PartResult<Part> {
        kind.validate(self.external.as_ref())
            .map_err(|err| err.in_part(name))?;

        let ctx = BuildContext {
            config: &self.config,
            external: self.external.as_ref(),
        };
        let params = kind.params_value();
        let solid = kind.generate(&ctx).map_err(|source| PartError::Build {
            part: name.to_string(),
            params: params.to_string(),
            source,
        })?;

        info!(
            part = name,
            kind = kind.name(),
            triangles = solid.mesh().triangles().len(),
            "part built"
        );
        Ok(Part::new(name, kind.name(), params, solid))
    }

    /// Builds every request in parallel. Results come back in request order
    /// and a failure affects only its own entry.
    pub fn build_all(&self, requests: &[PartRequest]) -> Vec<PartResult<Part>> {
        requests
            .par_iter()
            .map(|request| self.build_named(&request.name, &request.kind))
            .collect()
    }

    /// Builds the layout's sub-parts in parallel, then unions them at their
    /// offsets.
    ///
    /// # Errors
    ///
    /// [`PartError::Layout`] listing every failed sub-part, or
    /// [`PartError::Build`] under the layout name if the final union fails.
    pub fn build_layout(&self, layout: &Layout) -> PartResult<Part> {
        let results: Vec<PartResult<Part>> = layout
            .entries
            .par_iter()
            .map(|entry| self.build_named(&entry.name, &entry.kind))
            .collect();

        let mut placed = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (entry, result) in layout.entries.iter().zip(results) {
            match result {
                Ok(part) => placed.push(part.into_solid().translated(entry.offset)),
                Err(err) => {
                    warn!(layout = %layout.name, part = %entry.name, "sub-part failed: {err}");
                    failures.push(err);
                }
            }
        }
        if !failures.is_empty() {
            return Err(PartError::Layout { failures });
        }

        debug!(layout = %layout.name, parts = placed.len(), "composing layout");
        let params = serde_json::to_value(layout).unwrap_or(serde_json::Value::Null);
        let solid = union(placed, &self.config).map_err(|source| PartError::Build {
            part: layout.name.clone(),
            params: params.to_string(),
            source,
        })?;
        info!(layout = %layout.name, "layout built");
        Ok(Part::new(layout.name.clone(), "layout", params, solid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::ring::RingParams;
    use serde_json::json;

    #[test]
    fn test_request_json_shape() {
        let request: PartRequest = serde_json::from_value(json!({
            "name": "template",
            "kind": "ring",
            "params": { "width": 10.0 }
        }))
        .unwrap();
        assert_eq!(request.name, "template");
        assert!(matches!(request.kind, PartKind::Ring(RingParams { width, .. }) if width == 10.0));
    }

    #[test]
    fn test_validation_error_uses_request_name() {
        let assembler = Assembler::default();
        let kind = PartKind::Ring(RingParams {
            thickness: -1.0,
            ..RingParams::default()
        });
        let err = assembler.build_named("drill template", &kind).unwrap_err();
        assert!(matches!(
            err,
            PartError::ParameterRange { ref part, parameter: "thickness", .. } if part == "drill template"
        ));
    }

    #[test]
    fn test_build_records_params() {
        let assembler = Assembler::default();
        let part = assembler
            .build(&PartKind::Ring(RingParams {
                segments: 16,
                ..RingParams::default()
            }))
            .unwrap();
        assert_eq!(part.name(), "ring");
        assert_eq!(part.kind(), "ring");
        assert_eq!(part.params()["segments"], 16);
        assert!(!part.solid().is_empty());
    }
}
