//! Registry of conversions keyed by type pair.

use crate::conversion::ConversionEntry;
use crate::error::MapError;
use crate::key::TypeKey;
use indexmap::IndexMap;
use indexmap::map::Entry;

/// Registry of available conversions.
///
/// Holds at most one entry per [`TypeKey`]. Entries are never replaced or
/// removed once inserted.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    /// Conversions indexed by type pair, in registration order.
    entries: IndexMap<TypeKey, ConversionEntry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a conversion under its own key.
    ///
    /// Fails with [`MapError::Conflict`] if the key is already taken; the
    /// existing entry is left in place and `entry` is dropped.
    pub fn insert(&mut self, entry: ConversionEntry) -> Result<(), MapError> {
        match self.entries.entry(*entry.key()) {
            Entry::Occupied(existing) => Err(MapError::Conflict(*existing.key())),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Get the conversion registered for a type pair.
    pub fn lookup(&self, key: &TypeKey) -> Option<&ConversionEntry> {
        self.entries.get(key)
    }

    /// Check if a conversion is registered for a type pair.
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over registered type pairs in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.entries.keys()
    }

    /// Number of registered conversions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
