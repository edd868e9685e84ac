//! Error types.

/// Errors raised while reading chart configuration.
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    /// A props payload could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A required top-level configuration block is absent.
    #[error("missing required chart configuration: {0}")]
    MissingConfig(&'static str),
}

/// A color string that is not a recognized CSS color.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized color: {0:?}")]
pub struct ColorParseError(pub String);
