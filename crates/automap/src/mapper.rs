//! The mapper: registration and single-value conversion.

use crate::config::MapperConfig;
use crate::conversion::ConversionEntry;
use crate::error::{BoxError, MapError};
use crate::key::TypeKey;
use crate::registry::Registry;

#[cfg(feature = "parallel")]
use std::sync::{Arc, OnceLock};

/// A runtime registry of conversions between concrete types.
///
/// Conversions are registered once per (source, destination) pair and later
/// resolved from the types at the call site:
///
/// ```
/// use rhi_automap::{MapError, Mapper};
///
/// let mut mapper = Mapper::new();
/// mapper.add_fn(|n: i32| format!("value-{}", n))?;
///
/// let mut out = String::new();
/// mapper.map(5, &mut out)?;
/// assert_eq!(out, "value-5");
/// # Ok::<(), MapError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Mapper {
    registry: Registry,
    config: MapperConfig,
    #[cfg(feature = "parallel")]
    pool: OnceLock<Option<Arc<rayon::ThreadPool>>>,
}

impl Mapper {
    /// Create an empty mapper with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapper with the given settings.
    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Settings this mapper was created with.
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn label(&self) -> &str {
        self.config.name.as_deref().unwrap_or("default")
    }

    /// Dedicated pool for parallel bulk conversion, built on first use.
    ///
    /// `None` means rayon's global pool is used, either because no thread
    /// count is configured or because the pool could not be built.
    #[cfg(feature = "parallel")]
    pub(crate) fn thread_pool(&self) -> Option<&rayon::ThreadPool> {
        self.pool
            .get_or_init(|| {
                let threads = self.config.parallel.threads?;
                match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => Some(Arc::new(pool)),
                    Err(err) => {
                        tracing::warn!(
                            mapper = self.label(),
                            threads,
                            error = %err,
                            "failed to build thread pool, using global pool"
                        );
                        None
                    }
                }
            })
            .as_deref()
    }

    /// Run a setup profile against this mapper and hand it back.
    ///
    /// If the profile fails, the error is returned and the mapper is dropped.
    /// Registrations the profile made before failing are not rolled back;
    /// they are discarded together with the mapper.
    pub fn configure(mut self, profile: impl Profile) -> Result<Self, MapError> {
        profile.configure(&mut self)?;
        tracing::debug!(
            mapper = self.label(),
            mappers = self.len(),
            "mapper configured"
        );
        Ok(self)
    }

    /// Apply a profile in place.
    ///
    /// Same contract as [`Mapper::configure`]: registrations made before a
    /// failure stay registered.
    pub fn add_profile(&mut self, profile: impl Profile) -> Result<(), MapError> {
        let name = profile.name();
        profile.configure(self)?;
        tracing::debug!(mapper = self.label(), profile = name, "profile applied");
        Ok(())
    }

    /// Register a conversion that always produces a value.
    pub fn add_fn<S, D, F>(&mut self, func: F) -> Result<(), MapError>
    where
        S: 'static,
        D: 'static,
        F: Fn(S) -> D + Send + Sync + 'static,
    {
        self.register(ConversionEntry::infallible(func))
    }

    /// Register a conversion that may fail.
    ///
    /// Errors returned by `func` reach callers of [`Mapper::map`] unchanged,
    /// as [`MapError::Conversion`].
    pub fn add_mapper<S, D, E, F>(&mut self, func: F) -> Result<(), MapError>
    where
        S: 'static,
        D: 'static,
        E: Into<BoxError>,
        F: Fn(S) -> Result<D, E> + Send + Sync + 'static,
    {
        self.register(ConversionEntry::fallible(func))
    }

    /// Register a conversion that may fail or produce no value.
    ///
    /// When `func` returns `Ok(None)` the destination receives
    /// `D::default()`; absence is not treated as an error.
    pub fn add_optional<S, D, E, F>(&mut self, func: F) -> Result<(), MapError>
    where
        S: 'static,
        D: Default + 'static,
        E: Into<BoxError>,
        F: Fn(S) -> Result<Option<D>, E> + Send + Sync + 'static,
    {
        self.register(ConversionEntry::optional(func))
    }

    fn register(&mut self, entry: ConversionEntry) -> Result<(), MapError> {
        let key = *entry.key();
        if !key.is_concrete() {
            return Err(MapError::InvalidSignature(key));
        }

        self.registry.insert(entry)?;
        tracing::debug!(mapper = self.label(), pair = %key, "registered mapper");
        Ok(())
    }

    /// Convert `source` into a `D` with the registered conversion.
    pub fn convert<S: 'static, D: 'static>(&self, source: S) -> Result<D, MapError> {
        let key = TypeKey::derive::<S, D>();
        check_shape(&key)?;

        let entry = self
            .registry
            .lookup(&key)
            .ok_or(MapError::NotFound(key))?;
        tracing::trace!(mapper = self.label(), pair = %key, "resolved mapper");

        entry.call(source)
    }

    /// Convert `source` and write the result into `dest`.
    ///
    /// On error `dest` is left untouched.
    pub fn map<S: 'static, D: 'static>(&self, source: S, dest: &mut D) -> Result<(), MapError> {
        *dest = self.convert(source)?;
        Ok(())
    }

    /// Check if a conversion from `S` to `D` is registered.
    pub fn contains<S: 'static, D: 'static>(&self) -> bool {
        self.registry.contains(&TypeKey::derive::<S, D>())
    }

    /// Iterate over registered type pairs in registration order.
    pub fn type_pairs(&self) -> impl Iterator<Item = &TypeKey> {
        self.registry.keys()
    }

    /// Number of registered conversions.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if no conversions are registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

/// Reject call sites whose types cannot carry a value.
pub(crate) fn check_shape(key: &TypeKey) -> Result<(), MapError> {
    if key.dest_is_unit() {
        return Err(MapError::InvalidDestination(*key));
    }
    if key.source_is_unit() {
        return Err(MapError::InvalidSource(*key));
    }
    Ok(())
}

/// A reusable bundle of registrations.
///
/// Closures taking `&mut Mapper` are profiles too, so one-off setup can be
/// passed to [`Mapper::configure`] directly.
pub trait Profile {
    /// Register this profile's conversions on `mapper`.
    fn configure(self, mapper: &mut Mapper) -> Result<(), MapError>;

    /// Name used in log events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Profile for F
where
    F: FnOnce(&mut Mapper) -> Result<(), MapError>,
{
    fn configure(self, mapper: &mut Mapper) -> Result<(), MapError> {
        self(mapper)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}
