//! Owner-scoped document storage.
//!
//! Every record is addressed by `(owner_id, id)`. Mutations run as a single
//! atomic step: the closure sees the current document, and its result is
//! written back only when it returns `Ok`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use daybook_core::{DomainError, DomainResult, Entity, OwnerId};

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryDocumentStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// A mutation applied to one document under the store's write guard.
pub type Mutation<'a, V> = &'a mut (dyn FnMut(&mut V) -> DomainResult<()> + Send);

/// A mutation applied to all of one owner's documents at once.
///
/// The closure may edit documents and push new ones. Documents it drops from
/// the vector are left as they are in the store.
pub type BatchMutation<'a, V> = &'a mut (dyn FnMut(&mut Vec<V>) -> DomainResult<()> + Send);

#[derive(Debug, Error)]
pub enum StoreError {
    /// A domain rule rejected the operation (includes not-found).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("document serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait DocumentStore<V>: Send + Sync
where
    V: Entity + Send + Sync + 'static,
{
    async fn get(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>>;

    /// Fails with a conflict if the owner already has a document with that id.
    async fn insert(&self, doc: V) -> StoreResult<V>;

    /// Apply `mutation` to one document. Not-found if the owner has no such document.
    async fn update(&self, owner: &OwnerId, id: V::Id, mutation: Mutation<'_, V>) -> StoreResult<V>;

    /// Apply `mutation` to every document of `owner`, returning the written set.
    async fn update_all(&self, owner: &OwnerId, mutation: BatchMutation<'_, V>) -> StoreResult<Vec<V>>;

    async fn remove(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>>;

    /// All documents of `owner`, oldest first.
    async fn list(&self, owner: &OwnerId) -> StoreResult<Vec<V>>;

    /// Owners holding at least one document in this collection.
    async fn owners(&self) -> StoreResult<Vec<OwnerId>>;
}

#[async_trait]
impl<V, S> DocumentStore<V> for Arc<S>
where
    V: Entity + Send + Sync + 'static,
    S: DocumentStore<V> + ?Sized,
{
    async fn get(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>> {
        (**self).get(owner, id).await
    }

    async fn insert(&self, doc: V) -> StoreResult<V> {
        (**self).insert(doc).await
    }

    async fn update(&self, owner: &OwnerId, id: V::Id, mutation: Mutation<'_, V>) -> StoreResult<V> {
        (**self).update(owner, id, mutation).await
    }

    async fn update_all(&self, owner: &OwnerId, mutation: BatchMutation<'_, V>) -> StoreResult<Vec<V>> {
        (**self).update_all(owner, mutation).await
    }

    async fn remove(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>> {
        (**self).remove(owner, id).await
    }

    async fn list(&self, owner: &OwnerId) -> StoreResult<Vec<V>> {
        (**self).list(owner).await
    }

    async fn owners(&self) -> StoreResult<Vec<OwnerId>> {
        (**self).owners().await
    }
}

/// Reject batch results that smuggle in documents of another owner.
pub(crate) fn ensure_owned<V: Entity>(owner: &OwnerId, docs: &[V]) -> StoreResult<()> {
    if docs.iter().any(|d| d.owner_id() != owner) {
        return Err(DomainError::invariant(format!(
            "{} batch contains documents of another owner",
            V::COLLECTION
        ))
        .into());
    }
    Ok(())
}
