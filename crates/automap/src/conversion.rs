//! Type-erased conversions and the adapters that build them.
//!
//! Every registered callable is wrapped in a generic adapter that remembers
//! its source and destination types, then stored behind the [`Conversion`]
//! trait object. Values cross the erased boundary as `Box<dyn Any>` and are
//! downcast back on the other side.

use crate::error::{BoxError, MapError};
use crate::key::TypeKey;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A value crossing the erased boundary.
pub type AnyValue = Box<dyn Any>;

/// Uniform interface over a stored conversion.
pub(crate) trait Conversion: Send + Sync {
    /// Run the conversion on a boxed source value.
    fn invoke(&self, source: AnyValue) -> Result<AnyValue, MapError>;
}

/// Adapter from a typed callable to [`Conversion`].
///
/// The callable is normalized to `Fn(S) -> Result<D, BoxError>` before it
/// gets here, so all registration shapes share one adapter.
struct Typed<S, D, F> {
    key: TypeKey,
    func: F,
    _types: PhantomData<fn(S) -> D>,
}

impl<S, D, F> Conversion for Typed<S, D, F>
where
    S: 'static,
    D: 'static,
    F: Fn(S) -> Result<D, BoxError> + Send + Sync,
{
    fn invoke(&self, source: AnyValue) -> Result<AnyValue, MapError> {
        let source = source
            .downcast::<S>()
            .map_err(|_| MapError::InvalidSource(self.key))?;
        let output = (self.func)(*source).map_err(MapError::Conversion)?;
        Ok(Box::new(output))
    }
}

/// A registered conversion: one callable plus the type pair it serves.
#[derive(Clone)]
pub struct ConversionEntry {
    key: TypeKey,
    conversion: Arc<dyn Conversion>,
}

impl ConversionEntry {
    fn erase<S, D, F>(func: F) -> Self
    where
        S: 'static,
        D: 'static,
        F: Fn(S) -> Result<D, BoxError> + Send + Sync + 'static,
    {
        let key = TypeKey::derive::<S, D>();
        Self {
            key,
            conversion: Arc::new(Typed {
                key,
                func,
                _types: PhantomData,
            }),
        }
    }

    /// Wrap a conversion that always produces a value.
    pub fn infallible<S, D, F>(func: F) -> Self
    where
        S: 'static,
        D: 'static,
        F: Fn(S) -> D + Send + Sync + 'static,
    {
        Self::erase::<S, D, _>(move |source: S| Ok(func(source)))
    }

    /// Wrap a conversion that may fail.
    pub fn fallible<S, D, E, F>(func: F) -> Self
    where
        S: 'static,
        D: 'static,
        E: Into<BoxError>,
        F: Fn(S) -> Result<D, E> + Send + Sync + 'static,
    {
        Self::erase::<S, D, _>(move |source: S| func(source).map_err(Into::into))
    }

    /// Wrap a conversion that may fail or produce no value.
    ///
    /// An absent value is not an error: it becomes `D::default()`.
    pub fn optional<S, D, E, F>(func: F) -> Self
    where
        S: 'static,
        D: Default + 'static,
        E: Into<BoxError>,
        F: Fn(S) -> Result<Option<D>, E> + Send + Sync + 'static,
    {
        let key = TypeKey::derive::<S, D>();
        Self::erase::<S, D, _>(move |source: S| {
            let output: Option<D> = func(source).map_err(Into::<BoxError>::into)?;
            match output {
                Some(value) => Ok(value),
                None => {
                    tracing::trace!(pair = %key, "mapper produced no value, using default");
                    Ok(D::default())
                }
            }
        })
    }

    /// The type pair this entry converts.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Run the conversion on an already boxed source value.
    pub fn invoke(&self, source: AnyValue) -> Result<AnyValue, MapError> {
        self.conversion.invoke(source)
    }

    /// Run the conversion with concrete types on both sides.
    ///
    /// Fails with [`MapError::InvalidSource`] or
    /// [`MapError::InvalidDestination`] when `S` or `D` differ from the
    /// entry's type pair.
    pub fn call<S: 'static, D: 'static>(&self, source: S) -> Result<D, MapError> {
        let output = self.invoke(Box::new(source))?;
        output
            .downcast::<D>()
            .map(|value| *value)
            .map_err(|_| MapError::InvalidDestination(self.key))
    }
}

impl fmt::Debug for ConversionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionEntry")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
