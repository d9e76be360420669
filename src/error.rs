//! Error types for route computation.
//!
//! Two failure classes reach the caller:
//!
//! - [`RouteError::Input`]: the request itself is unusable (empty feature
//!   collection, degenerate bounds, missing fields). Maps to a client error.
//! - [`RouteError::Computation`]: something failed while building the grid,
//!   decoding a raster, or reprojecting coordinates. Maps to a server error
//!   and carries the underlying cause.
//!
//! "No path" is not an error. The search degrades to a straight-line fallback.

use thiserror::Error;

/// Boxed cause attached to computation failures.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Route computation error type
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Route computation failed: {context}")]
    Computation {
        context: String,
        #[source]
        source: Option<Cause>,
    },
}

impl RouteError {
    /// Input error with a message.
    pub fn input(msg: impl Into<String>) -> Self {
        RouteError::Input(msg.into())
    }

    /// Computation error without an underlying cause.
    pub fn computation(context: impl Into<String>) -> Self {
        RouteError::Computation {
            context: context.into(),
            source: None,
        }
    }

    /// Computation error wrapping an underlying cause.
    pub fn computation_with(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RouteError::Computation {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True when the caller sent something unusable (client-side failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, RouteError::Input(_))
    }
}

impl From<std::io::Error> for RouteError {
    fn from(e: std::io::Error) -> Self {
        RouteError::computation_with("I/O failure", e)
    }
}

impl From<tiff::TiffError> for RouteError {
    fn from(e: tiff::TiffError) -> Self {
        RouteError::computation_with("raster decoding failed", e)
    }
}

impl From<image::ImageError> for RouteError {
    fn from(e: image::ImageError) -> Self {
        RouteError::computation_with("image decoding failed", e)
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(e: serde_json::Error) -> Self {
        // Syntax and shape problems come from the caller; I/O during a
        // streaming read does not.
        if e.is_io() {
            RouteError::computation_with("JSON read failed", e)
        } else {
            RouteError::Input(format!("malformed JSON: {e}"))
        }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_input_is_client_error() {
        assert!(RouteError::input("empty").is_client_error());
        assert!(!RouteError::computation("boom").is_client_error());
    }

    #[test]
    fn test_computation_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.tif");
        let err = RouteError::from(io);
        assert!(!err.is_client_error());
        let source = err.source().expect("cause attached");
        assert!(source.to_string().contains("missing.tif"));
    }

    #[test]
    fn test_bad_json_is_input_error() {
        let err: RouteError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(err.is_client_error());
    }
}
