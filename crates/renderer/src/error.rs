//! Error types for rendering.

use thiserror::Error;

/// Errors raised while configuring or running the point renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The data source's CRS or grid geometry was never resolved;
    /// rendering cannot proceed without it.
    #[error("data source '{0}' has unresolved geometry")]
    UnresolvedDataSource(String),

    /// A known settings key carried a value that does not parse.
    /// Unknown keys are ignored with a warning instead.
    #[error("invalid point style setting '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    /// Vector rendering needs paired u/v component data objects.
    #[error("vector rendering requires two component data objects, found {0}")]
    MissingVectorComponents(usize),

    /// A font file could not be loaded or parsed.
    #[error("font error: {0}")]
    Font(String),
}
