//! # Drumforge Parts
//!
//! The parametric drum hardware library. Each part kind is a serde
//! parameter record plus a generator that drives the geometry kernel.
//!
//! ## Architecture
//!
//! ```text
//! PartRequest / Layout
//!        ↓
//!    Assembler ── validate (ParameterRange) ── generate (Build)
//!        ↓                                        ↓
//!      Part                        drumforge_geometry kernel
//! ```
//!
//! Parameters are already in millimeters and radians. Thread and honeycomb
//! solids come from an [`ExternalGeometry`] provider; parts that need one
//! refuse to validate without it.
//!
//! ## Usage
//!
//! ```rust
//! use drumforge_parts::{Assembler, PartKind};
//! use serde_json::json;
//!
//! let kind = PartKind::from_record("ring", json!({ "segments": 24 }))?;
//! let part = Assembler::default().build(&kind)?;
//! let bbox = part.solid().bounding_box().expect("ring is not empty");
//! assert!((bbox.max.x - 76.2).abs() < 1e-9);
//! # Ok::<(), drumforge_parts::PartError>(())
//! ```

pub mod assembler;
pub mod error;
pub mod external;
pub mod kind;
pub mod part;
pub mod parts;

pub use assembler::{Assembler, Layout, LayoutEntry, PartRequest};
pub use error::{PartError, PartResult};
pub use external::{ExternalFeature, ExternalGeometry, HoneycombSpec, NoExternalGeometry, ThreadSpec};
pub use kind::PartKind;
pub use part::Part;
pub use parts::clip::Orientation;
pub use parts::PartGeometry;
