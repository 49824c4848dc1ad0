//! Entity trait: reference records identified by key.

/// Entity marker + minimal interface.
///
/// Sellers and products are looked up by key during aggregation; two records
/// with the same key are the same entity, whatever their other fields say.
pub trait Entity {
    /// Strongly-typed entity key.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity key.
    fn id(&self) -> &Self::Id;
}
