//! Type-pair keys.
//!
//! A [`TypeKey`] identifies one conversion by the [`TypeId`] of its source and
//! destination types. Type names are carried along for diagnostics only and
//! never take part in comparisons.

use std::any::{TypeId, type_name};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a (source type, destination type) pair.
#[derive(Clone, Copy)]
pub struct TypeKey {
    source: TypeId,
    dest: TypeId,
    source_name: &'static str,
    dest_name: &'static str,
}

impl TypeKey {
    /// Derive the key for converting `S` into `D`.
    pub fn derive<S: 'static, D: 'static>() -> Self {
        Self {
            source: TypeId::of::<S>(),
            dest: TypeId::of::<D>(),
            source_name: type_name::<S>(),
            dest_name: type_name::<D>(),
        }
    }

    /// Type id of the source side.
    pub fn source(&self) -> TypeId {
        self.source
    }

    /// Type id of the destination side.
    pub fn dest(&self) -> TypeId {
        self.dest
    }

    /// Fully-qualified name of the source type.
    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    /// Fully-qualified name of the destination type.
    pub fn dest_name(&self) -> &'static str {
        self.dest_name
    }

    /// True when the source is `()`, which carries no value.
    pub fn source_is_unit(&self) -> bool {
        self.source == TypeId::of::<()>()
    }

    /// True when the destination is `()`, which cannot receive a value.
    pub fn dest_is_unit(&self) -> bool {
        self.dest == TypeId::of::<()>()
    }

    /// Check if both sides denote concrete value types.
    pub fn is_concrete(&self) -> bool {
        !self.source_is_unit() && !self.dest_is_unit()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.dest == other.dest
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.dest.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.source, self.dest).cmp(&(other.source, other.dest))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source_name, self.dest_name)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self)
    }
}
