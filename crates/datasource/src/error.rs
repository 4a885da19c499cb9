//! Error types for dataset resolution.

use dataset_model::ModelError;
use std::fmt;
use thiserror::Error;

/// Spatial axis identifier, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Errors raised while resolving a data source.
///
/// Each variant corresponds to one fatal failure class of the resolution
/// pipeline; the first phase to fail short-circuits the rest.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No CRS convention matched and the axes are not plain geographic.
    /// Also raised when a projection variable is present but unparsable;
    /// that case is never silently defaulted.
    #[error("CRS is indeterminate for variable '{variable}': {reason}")]
    CrsIndeterminate { variable: String, reason: String },

    /// The X or Y dimension or its coordinate variable was not found.
    #[error("could not locate the {axis} axis for variable '{variable}'")]
    AxisNotFound { axis: Axis, variable: String },

    /// An axis has fewer than two coordinate samples, so cell size and
    /// bounding box cannot be derived.
    #[error("coordinate variable '{variable}' has fewer than two samples")]
    InsufficientCoordinateSamples { variable: String },

    /// The target variable does not exist in the dataset.
    #[error("variable '{0}' not found in dataset")]
    VariableNotFound(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}
