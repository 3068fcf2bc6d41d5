//! # Part Kinds
//!
//! The closed set of parts the library can build. Each case carries only
//! its own parameter record; dispatch to validation and generation happens
//! once, here.
//!
//! Serialized records are tagged:
//!
//! ```json
//! { "kind": "ring", "params": { "inner_radius": 63.5, "width": 12.7 } }
//! ```

use crate::error::{PartError, PartResult};
use crate::external::ExternalGeometry;
use crate::parts::clip::ClipParams;
use crate::parts::head::HeadParams;
use crate::parts::kick_riser::KickRiserParams;
use crate::parts::pill::PillParams;
use crate::parts::rim_dampener::RimDampenerParams;
use crate::parts::ring::RingParams;
use crate::parts::subkick::{SubkickFlangeParams, SubkickShellParams};
use crate::parts::tom_leg::TomLegParams;
use crate::parts::{BuildContext, PartGeometry};
use drumforge_geometry::{KernelResult, Solid};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A part kind together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum PartKind {
    Clip(ClipParams),
    Head(HeadParams),
    Ring(RingParams),
    RimDampener(RimDampenerParams),
    TomLeg(TomLegParams),
    KickRiser(KickRiserParams),
    SubkickShell(SubkickShellParams),
    SubkickFlange(SubkickFlangeParams),
    Pill(PillParams),
}

/// Applies `$body` to the parameter record of any case.
macro_rules! with_params {
    ($kind:expr, $params:ident => $body:expr) => {
        match $kind {
            PartKind::Clip($params) => $body,
            PartKind::Head($params) => $body,
            PartKind::Ring($params) => $body,
            PartKind::RimDampener($params) => $body,
            PartKind::TomLeg($params) => $body,
            PartKind::KickRiser($params) => $body,
            PartKind::SubkickShell($params) => $body,
            PartKind::SubkickFlange($params) => $body,
            PartKind::Pill($params) => $body,
        }
    };
}

impl PartKind {
    /// Every tag [`PartKind::from_record`] accepts.
    pub const TAGS: [&'static str; 9] = [
        ClipParams::KIND,
        HeadParams::KIND,
        RingParams::KIND,
        RimDampenerParams::KIND,
        TomLegParams::KIND,
        KickRiserParams::KIND,
        SubkickShellParams::KIND,
        SubkickFlangeParams::KIND,
        PillParams::KIND,
    ];

    /// Parses a parameter record for the part kind named `tag`.
    ///
    /// Missing fields take their defaults; `null` stands for all defaults.
    ///
    /// # Errors
    ///
    /// [`PartError::ParameterRange`] for an unknown tag (parameter `kind`)
    /// or a record that does not deserialize (parameter `params`).
    pub fn from_record(tag: &str, params: Value) -> PartResult<Self> {
        let params = if params.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            params
        };
        Ok(match tag {
            t if t == ClipParams::KIND => Self::Clip(parse(tag, params)?),
            t if t == HeadParams::KIND => Self::Head(parse(tag, params)?),
            t if t == RingParams::KIND => Self::Ring(parse(tag, params)?),
            t if t == RimDampenerParams::KIND => Self::RimDampener(parse(tag, params)?),
            t if t == TomLegParams::KIND => Self::TomLeg(parse(tag, params)?),
            t if t == KickRiserParams::KIND => Self::KickRiser(parse(tag, params)?),
            t if t == SubkickShellParams::KIND => Self::SubkickShell(parse(tag, params)?),
            t if t == SubkickFlangeParams::KIND => Self::SubkickFlange(parse(tag, params)?),
            t if t == PillParams::KIND => Self::Pill(parse(tag, params)?),
            unknown => {
                return Err(PartError::parameter(
                    unknown,
                    "kind",
                    format!("is not a part kind; expected one of {}", Self::TAGS.join(", ")),
                ))
            }
        })
    }

    /// Tag of this kind.
    pub fn name(&self) -> &'static str {
        fn kind_of<P: PartGeometry>(_: &P) -> &'static str {
            P::KIND
        }
        with_params!(self, params => kind_of(params))
    }

    /// The parameter record as JSON, for error reports and [`Part`](crate::Part).
    pub fn params_value(&self) -> Value {
        with_params!(self, params => serde_json::to_value(params).unwrap_or(Value::Null))
    }

    /// Checks the parameter record.
    ///
    /// # Errors
    ///
    /// [`PartError::ParameterRange`] naming the first offending parameter.
    pub fn validate(&self, external: &dyn ExternalGeometry) -> PartResult<()> {
        with_params!(self, params => params.validate(external))
    }

    pub(crate) fn generate(&self, ctx: &BuildContext<'_>) -> KernelResult<Solid> {
        with_params!(self, params => params.generate(ctx))
    }
}

fn parse<T: DeserializeOwned>(tag: &str, params: Value) -> PartResult<T> {
    serde_json::from_value(params).map_err(|err| PartError::parameter(tag, "params", err.to_string()))
}
