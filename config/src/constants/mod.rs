//! # Configuration Constants
//!
//! Tolerances, tessellation limits and the immutable [`GeometryConfig`]
//! snapshot handed to every geometry kernel call.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Resolution**: Default tessellation parameters
//! - **Limits**: Maximum values for safety bounds
//! - **Recursion**: Stack growth for deep BSP trees

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Generic tolerance for floating-point comparisons.
///
/// # Examples
/// ```
/// use config::constants::EPSILON_TOLERANCE;
/// assert!(EPSILON_TOLERANCE < 1.0e-6);
/// ```
pub const EPSILON_TOLERANCE: f64 = 1.0e-9;

/// Distance within which a vertex is classified as lying on a BSP plane.
///
/// # Examples
/// ```
/// use config::constants::PLANE_EPSILON;
/// assert!(PLANE_EPSILON > 0.0 && PLANE_EPSILON < 1.0e-3);
/// ```
pub const PLANE_EPSILON: f64 = 1.0e-5;

/// Distance below which two vertices of a boolean result are welded together.
///
/// # Examples
/// ```
/// use config::constants::{PLANE_EPSILON, WELD_EPSILON};
/// assert!(WELD_EPSILON >= PLANE_EPSILON);
/// ```
pub const WELD_EPSILON: f64 = 1.0e-5;

/// Triangle area below which a face counts as degenerate.
///
/// # Examples
/// ```
/// use config::constants::AREA_EPSILON;
/// assert!(AREA_EPSILON < 1.0e-9);
/// ```
pub const AREA_EPSILON: f64 = 1.0e-12;

/// Maximum gap allowed between the end of one path segment and the start of
/// the next.
///
/// # Examples
/// ```
/// use config::constants::PATH_EPSILON;
/// let gap: f64 = 1.0e-8;
/// assert!(gap < PATH_EPSILON);
/// ```
pub const PATH_EPSILON: f64 = 1.0e-6;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default tessellation segment count for full circles, cylinders and
/// revolutions when a caller does not choose one.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_SEGMENTS;
/// assert!(DEFAULT_SEGMENTS >= 12);
/// ```
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Minimum number of segments for any closed curve.
///
/// # Examples
/// ```
/// use config::constants::MIN_SEGMENTS;
/// assert_eq!(MIN_SEGMENTS, 3);
/// ```
pub const MIN_SEGMENTS: u32 = 3;

/// Upper bound on segment counts accepted from parameter records.
///
/// # Examples
/// ```
/// use config::constants::{MAX_SEGMENTS, MIN_SEGMENTS};
/// assert!(MAX_SEGMENTS > MIN_SEGMENTS);
/// ```
pub const MAX_SEGMENTS: u32 = 1000;

/// Default ratio between miter length and offset distance beyond which a
/// mitered corner is beveled.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_MITER_LIMIT;
/// assert!(DEFAULT_MITER_LIMIT >= 1.0);
/// ```
pub const DEFAULT_MITER_LIMIT: f64 = 2.0;

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum triangle count a boolean result may reach before the operation
/// is aborted.
///
/// # Examples
/// ```
/// use config::constants::MAX_TRIANGLES;
/// assert!(MAX_TRIANGLES >= 1_000_000);
/// ```
pub const MAX_TRIANGLES: usize = 5_000_000;

// =============================================================================
// RECURSION
// =============================================================================

/// Remaining stack below which `stacker` allocates a new segment.
///
/// # Examples
/// ```
/// use config::constants::STACKER_RED_ZONE_BYTES;
/// assert!(STACKER_RED_ZONE_BYTES >= 32 * 1024);
/// ```
pub const STACKER_RED_ZONE_BYTES: usize = 128 * 1024;

/// Bytes of stack space reserved when growing recursion limits using the
/// `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
/// assert!(STACKER_STACK_SIZE_BYTES > STACKER_RED_ZONE_BYTES);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Number of equal segments needed so that no step of a sweep exceeds
/// `max_step` radians, clamped to `[1, MAX_SEGMENTS]`.
///
/// # Examples
/// ```
/// use config::constants::segments_for_sweep;
/// use std::f64::consts::PI;
/// assert_eq!(segments_for_sweep(PI, PI / 4.0), 4);
/// assert_eq!(segments_for_sweep(0.1, PI / 4.0), 1);
/// ```
pub fn segments_for_sweep(sweep: f64, max_step: f64) -> u32 {
    if !(max_step > 0.0) || !sweep.is_finite() {
        return 1;
    }
    let count = (sweep.abs() / max_step - EPSILON_TOLERANCE).ceil();
    (count.max(1.0) as u32).min(MAX_SEGMENTS)
}

// =============================================================================
// GEOMETRY CONFIG
// =============================================================================

/// Immutable snapshot of the tolerances and tessellation defaults used by
/// the geometry kernel.
///
/// # Examples
/// ```
/// use config::constants::GeometryConfig;
/// let config = GeometryConfig::default();
/// assert!(config.plane_epsilon > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    /// Distance tolerance for BSP plane classification.
    pub plane_epsilon: f64,
    /// Distance tolerance for vertex welding and T-junction repair.
    pub weld_epsilon: f64,
    /// Area below which a face is degenerate.
    pub area_epsilon: f64,
    /// Maximum endpoint gap tolerated between consecutive path segments.
    pub path_epsilon: f64,
    /// Segment count for full circles when none is specified.
    pub default_segments: u32,
    /// Miter length ratio beyond which corners are beveled.
    pub miter_limit: f64,
}

impl GeometryConfig {
    /// Builds a configuration, rejecting tolerances that are not strictly
    /// positive, segment counts that cannot form a polygon and miter limits
    /// below one.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GeometryConfig;
    /// let cfg = GeometryConfig::new(1.0e-5, 1.0e-5, 1.0e-12, 1.0e-6, 24, 2.0)
    ///     .expect("valid config");
    /// assert_eq!(cfg.default_segments, 24);
    /// ```
    pub fn new(
        plane_epsilon: f64,
        weld_epsilon: f64,
        area_epsilon: f64,
        path_epsilon: f64,
        default_segments: u32,
        miter_limit: f64,
    ) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("plane_epsilon", plane_epsilon),
            ("weld_epsilon", weld_epsilon),
            ("area_epsilon", area_epsilon),
            ("path_epsilon", path_epsilon),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidTolerance { name, value });
            }
        }
        if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&default_segments) {
            return Err(ConfigError::InvalidSegments(default_segments));
        }
        if !(miter_limit >= 1.0) || !miter_limit.is_finite() {
            return Err(ConfigError::InvalidMiterLimit(miter_limit));
        }
        Ok(Self {
            plane_epsilon,
            weld_epsilon,
            area_epsilon,
            path_epsilon,
            default_segments,
            miter_limit,
        })
    }

    /// Returns a copy with a different default segment count.
    pub fn with_default_segments(self, default_segments: u32) -> Result<Self, ConfigError> {
        Self::new(
            self.plane_epsilon,
            self.weld_epsilon,
            self.area_epsilon,
            self.path_epsilon,
            default_segments,
            self.miter_limit,
        )
    }

    /// Returns a copy with a different miter limit.
    pub fn with_miter_limit(self, miter_limit: f64) -> Result<Self, ConfigError> {
        Self::new(
            self.plane_epsilon,
            self.weld_epsilon,
            self.area_epsilon,
            self.path_epsilon,
            self.default_segments,
            miter_limit,
        )
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            plane_epsilon: PLANE_EPSILON,
            weld_epsilon: WELD_EPSILON,
            area_epsilon: AREA_EPSILON,
            path_epsilon: PATH_EPSILON,
            default_segments: DEFAULT_SEGMENTS,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when a tolerance is zero, negative or not finite.
    InvalidTolerance { name: &'static str, value: f64 },
    /// Raised when the segment count is outside `[MIN_SEGMENTS, MAX_SEGMENTS]`.
    InvalidSegments(u32),
    /// Raised when the miter limit is below one.
    InvalidMiterLimit(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance { name, value } => {
                write!(f, "{name} must be positive and finite: {value}")
            }
            ConfigError::InvalidSegments(value) => {
                write!(
                    f,
                    "default_segments must be in {MIN_SEGMENTS}..={MAX_SEGMENTS}: {value}"
                )
            }
            ConfigError::InvalidMiterLimit(value) => {
                write!(f, "miter_limit must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
