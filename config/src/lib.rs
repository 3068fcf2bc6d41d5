//! # Config Crate
//!
//! Tolerances and tessellation defaults for the drumforge geometry pipeline.
//! Every kernel call that needs a tolerance or a default segment count reads
//! it from an explicit [`constants::GeometryConfig`] value instead of a
//! process-wide global, so concurrent part builds share nothing mutable.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{GeometryConfig, DEFAULT_SEGMENTS};
//!
//! let config = GeometryConfig::default();
//! assert_eq!(config.default_segments, DEFAULT_SEGMENTS);
//!
//! let coarse = config.with_default_segments(12).expect("valid segments");
//! assert_eq!(coarse.default_segments, 12);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Immutable**: Configuration is a `Copy` value, validated on construction
//! - **Millimetres**: All lengths are in one working unit (mm)

pub mod constants;
