//! Error types for sluice.
//!
//! This module provides the [`SluiceError`] type, the standard error type
//! used throughout the sluice workspace.
//!
//! The pipeline is a transparent conduit for failures: an error raised by a
//! wrapped operation is carried through every pipe unchanged and surfaces to
//! the caller as [`SluiceError::Operation`]. The pipeline performs no
//! automatic retries and no error translation.

use thiserror::Error;

/// A type-erased error produced by a wrapped operation.
///
/// Operations may fail with any error type; the pipeline boxes the failure
/// at the invocation boundary and hands it back untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`SluiceError`].
pub type SluiceResult<T> = Result<T, SluiceError>;

/// Standard error type for sluice pipeline invocations.
///
/// # Example
///
/// ```
/// use sluice_core::SluiceError;
///
/// let err = SluiceError::operation(std::io::Error::other("downstream unavailable"));
/// assert_eq!(err.to_string(), "downstream unavailable");
/// ```
#[derive(Error, Debug)]
pub enum SluiceError {
    /// A failure raised by the wrapped operation, propagated unchanged.
    ///
    /// Display and `source` delegate straight to the original failure so
    /// callers see exactly what the operation raised.
    #[error(transparent)]
    Operation(BoxError),

    /// A cached value could not be interpreted as the requested result type.
    ///
    /// The cache store is type-erased; interpreting a retrieved value as the
    /// expected concrete type is the caller's contract. Reading a key back
    /// at a different type than it was stored under violates that contract.
    #[error("cached value under key `{key}` does not match the requested type")]
    CacheTypeMismatch {
        /// The cache key whose stored value failed the conversion.
        key: String,
    },
}

impl SluiceError {
    /// Wraps an arbitrary operation failure.
    pub fn operation(err: impl Into<BoxError>) -> Self {
        Self::Operation(err.into())
    }

    /// Returns the underlying operation failure, if this is one.
    #[must_use]
    pub fn as_operation(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Operation(err) => Some(err.as_ref()),
            Self::CacheTypeMismatch { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_displays_original_message() {
        let err = SluiceError::operation(std::io::Error::other("connection reset"));
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_operation_error_preserves_concrete_type() {
        let err = SluiceError::operation(std::io::Error::other("boom"));

        let inner = err.as_operation().expect("should be an operation failure");
        assert!(inner.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_cache_type_mismatch_names_the_key() {
        let err = SluiceError::CacheTypeMismatch {
            key: "get-fruit".to_string(),
        };

        assert!(err.to_string().contains("get-fruit"));
        assert!(err.as_operation().is_none());
    }
}
