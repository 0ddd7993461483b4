//! Entity trait: identity + ownership of a stored document.

use crate::id::OwnerId;

/// A persisted, owner-scoped document.
///
/// Stores key every record by `(owner_id, id)`; there is no way to address a
/// document without naming its owner.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    /// Stable collection name (used as a table/partition key by stores).
    const COLLECTION: &'static str;

    /// Singular human-facing name, used in not-found messages.
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Returns the owning account.
    fn owner_id(&self) -> &OwnerId;
}
