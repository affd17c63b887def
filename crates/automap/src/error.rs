//! Errors produced while registering and running conversions.

use crate::key::TypeKey;

/// Error type returned by user-supplied conversions, boxed so heterogeneous
/// callables can share one registry.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur when registering or invoking mappers.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("mapper must take one input and produce one output: {0}")]
    InvalidSignature(TypeKey),

    #[error("mapper already registered for this type pair: {0}")]
    Conflict(TypeKey),

    #[error("source does not carry a value of the registered type: {0}")]
    InvalidSource(TypeKey),

    #[error("destination cannot receive a value of the registered type: {0}")]
    InvalidDestination(TypeKey),

    #[error("no mapper found for type pair: {0}")]
    NotFound(TypeKey),

    /// The conversion itself failed. Carries the callable's own error.
    #[error(transparent)]
    Conversion(BoxError),
}

impl MapError {
    /// The type pair this error is about, if any.
    pub fn key(&self) -> Option<&TypeKey> {
        match self {
            MapError::InvalidSignature(key)
            | MapError::Conflict(key)
            | MapError::InvalidSource(key)
            | MapError::InvalidDestination(key)
            | MapError::NotFound(key) => Some(key),
            MapError::Conversion(_) => None,
        }
    }

    /// Borrow the error a conversion returned, if it has type `E`.
    pub fn conversion_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            MapError::Conversion(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take ownership of the error a conversion returned.
    pub fn into_conversion_error(self) -> Option<BoxError> {
        match self {
            MapError::Conversion(err) => Some(err),
            _ => None,
        }
    }
}
