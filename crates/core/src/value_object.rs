//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two carton
/// dimension triples with the same lengths are the same dimensions. To
/// "modify" one, build a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
