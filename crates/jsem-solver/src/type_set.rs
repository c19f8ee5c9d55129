//! Deduplicating collection of types.

use crate::types::{Type, TypeKind};
use serde::Serialize;
use smallvec::SmallVec;

/// Set of types in insertion order. Most sets hold zero to two types, so
/// the storage is inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TypeSet {
    types: SmallVec<[Type; 2]>,
}

impl TypeSet {
    pub fn new() -> TypeSet {
        TypeSet::default()
    }

    pub fn single(ty: Type) -> TypeSet {
        let mut set = TypeSet::new();
        set.add(ty);
        set
    }

    /// Add a type; returns false when an equal type was already present.
    pub fn add(&mut self, ty: Type) -> bool {
        if self.types.contains(&ty) {
            return false;
        }
        self.types.push(ty);
        true
    }

    /// Add every type of `other`; returns true if anything was new.
    pub fn union_with(&mut self, other: &TypeSet) -> bool {
        let mut changed = false;
        for ty in &other.types {
            changed |= self.add(ty.clone());
        }
        changed
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.types.contains(ty)
    }

    pub fn contains_kind(&self, kind: TypeKind) -> bool {
        self.types.iter().any(|ty| ty.kind() == kind)
    }

    /// The type of `kind` when exactly one is present. Two types of the same
    /// kind (e.g. two different functions) make the answer ambiguous.
    pub fn unique(&self, kind: TypeKind) -> Option<&Type> {
        let mut matching = self.types.iter().filter(|ty| ty.kind() == kind);
        let first = matching.next()?;
        if matching.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// The only type in the set, if there is exactly one.
    pub fn only(&self) -> Option<&Type> {
        match self.types.as_slice() {
            [ty] => Some(ty),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<Type> for TypeSet {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        let mut set = TypeSet::new();
        for ty in iter {
            set.add(ty);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TypeSet {
    type Item = &'a Type;
    type IntoIter = std::slice::Iter<'a, Type>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}
