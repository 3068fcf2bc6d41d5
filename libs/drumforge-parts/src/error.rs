//! # Part Errors
//!
//! Error types for parameter validation and part generation.

use drumforge_geometry::KernelError;
use thiserror::Error;

/// Errors that can occur while assembling parts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartError {
    /// The parameter record is invalid; raised before any geometry is built.
    #[error("Parameter out of range for {part}: {parameter} {message}")]
    ParameterRange {
        part: String,
        parameter: &'static str,
        message: String,
    },

    /// A kernel stage failed while building a validated part.
    #[error("Failed to build {part}: {source} (parameters: {params})")]
    Build {
        part: String,
        params: String,
        #[source]
        source: KernelError,
    },

    /// One or more sub-parts of a layout failed.
    #[error("Layout failed: {}", describe_failures(.failures))]
    Layout { failures: Vec<PartError> },
}

impl PartError {
    /// Creates a parameter range error.
    pub fn parameter(
        part: impl Into<String>,
        parameter: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::ParameterRange {
            part: part.into(),
            parameter,
            message: message.into(),
        }
    }

    /// Reports the error under the sub-part name `name` instead of the
    /// part kind. Layout errors are left alone.
    #[must_use]
    pub fn in_part(self, name: &str) -> Self {
        match self {
            Self::ParameterRange {
                parameter, message, ..
            } => Self::ParameterRange {
                part: name.to_string(),
                parameter,
                message,
            },
            Self::Build { params, source, .. } => Self::Build {
                part: name.to_string(),
                params,
                source,
            },
            layout @ Self::Layout { .. } => layout,
        }
    }

    /// Name of the part the error belongs to, if it is about a single part.
    pub fn part(&self) -> Option<&str> {
        match self {
            Self::ParameterRange { part, .. } | Self::Build { part, .. } => Some(part),
            Self::Layout { .. } => None,
        }
    }
}

fn describe_failures(failures: &[PartError]) -> String {
    let names: Vec<&str> = failures.iter().filter_map(PartError::part).collect();
    format!("{} sub-part(s) failed [{}]", failures.len(), names.join(", "))
}

/// Result alias for part assembly.
pub type PartResult<T> = Result<T, PartError>;

// =============================================================================
// TESTS
// =============================================================================
