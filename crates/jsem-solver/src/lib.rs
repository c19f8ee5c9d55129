//! Heuristic type representation
//!
//! The inference engine classifies expressions and symbols with a closed set
//! of [`Type`]s: primitives, structural kinds, built-in wrapper objects, a
//! few browser API kinds and a few framework kinds. Types are plain values;
//! a [`TypeSet`] collects the distinct types observed for one symbol or
//! expression.
//!
//! Nothing here is sound. A `TypeSet` is the union of everything the
//! flow-insensitive pass saw, and an empty set means "no information".

pub mod type_set;
pub mod types;

pub use type_set::TypeSet;
pub use types::{BuiltInKind, Callability, FrameworkKind, PrimitiveKind, Type, TypeKind, WebApiKind};
