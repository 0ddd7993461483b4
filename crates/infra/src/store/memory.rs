use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use daybook_core::{DomainError, Entity, OwnerId};

use super::{BatchMutation, DocumentStore, Mutation, StoreError, StoreResult, ensure_owned};

/// In-memory owner-partitioned store for tests/dev.
///
/// Ids are UUIDv7, so per-owner iteration order is creation order.
#[derive(Debug)]
pub struct InMemoryDocumentStore<V: Entity> {
    inner: RwLock<BTreeMap<OwnerId, BTreeMap<V::Id, V>>>,
}

impl<V: Entity> InMemoryDocumentStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<V: Entity> Default for InMemoryDocumentStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl<V> DocumentStore<V> for InMemoryDocumentStore<V>
where
    V: Entity + Clone + Send + Sync + 'static,
{
    async fn get(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(owner).and_then(|docs| docs.get(&id)).cloned())
    }

    async fn insert(&self, doc: V) -> StoreResult<V> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let docs = map.entry(doc.owner_id().clone()).or_default();
        if docs.contains_key(&doc.id()) {
            return Err(DomainError::conflict(format!("{} {} already exists", V::KIND, doc.id())).into());
        }
        docs.insert(doc.id(), doc.clone());
        Ok(doc)
    }

    async fn update(&self, owner: &OwnerId, id: V::Id, mutation: Mutation<'_, V>) -> StoreResult<V> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let slot = map
            .get_mut(owner)
            .and_then(|docs| docs.get_mut(&id))
            .ok_or(DomainError::not_found(V::KIND))?;

        let mut draft = slot.clone();
        mutation(&mut draft)?;
        *slot = draft.clone();
        Ok(draft)
    }

    async fn update_all(&self, owner: &OwnerId, mutation: BatchMutation<'_, V>) -> StoreResult<Vec<V>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;

        let mut draft: Vec<V> = map
            .get(owner)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();
        mutation(&mut draft)?;
        ensure_owned(owner, &draft)?;

        let docs = map.entry(owner.clone()).or_default();
        for doc in &draft {
            docs.insert(doc.id(), doc.clone());
        }
        Ok(draft)
    }

    async fn remove(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let Some(docs) = map.get_mut(owner) else {
            return Ok(None);
        };
        let removed = docs.remove(&id);
        if docs.is_empty() {
            map.remove(owner);
        }
        Ok(removed)
    }

    async fn list(&self, owner: &OwnerId) -> StoreResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .get(owner)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn owners(&self) -> StoreResult<Vec<OwnerId>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};

    use daybook_core::HabitId;
    use daybook_habits::{Habit, NewHabit};

    use super::*;

    fn owner(name: &str) -> OwnerId {
        OwnerId::new(name).unwrap()
    }

    fn habit(owner_id: &OwnerId, name: &str) -> Habit {
        Habit::create(
            HabitId::new(),
            owner_id.clone(),
            NewHabit {
                name: name.to_string(),
                ..NewHabit::default()
            },
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[tokio::test]
    async fn documents_are_isolated_per_owner() {
        let store = InMemoryDocumentStore::<Habit>::new();
        let alice = owner("alice");
        let bob = owner("bob");
        let h = store.insert(habit(&alice, "read")).await.unwrap();

        assert!(store.get(&alice, h.id()).await.unwrap().is_some());
        assert!(store.get(&bob, h.id()).await.unwrap().is_none());
        assert!(store.list(&bob).await.unwrap().is_empty());
        assert!(store.remove(&bob, h.id()).await.unwrap().is_none());

        let err = store
            .update(&bob, h.id(), &mut |_h: &mut Habit| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::NotFound("habit"))));
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let store = InMemoryDocumentStore::<Habit>::new();
        let h = habit(&owner("alice"), "read");
        store.insert(h.clone()).await.unwrap();
        let err = store.insert(h).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn failed_mutation_leaves_document_untouched() {
        let store = InMemoryDocumentStore::<Habit>::new();
        let alice = owner("alice");
        let h = store.insert(habit(&alice, "read")).await.unwrap();
        let now = Utc::now();

        let err = store
            .update(&alice, h.id(), &mut |h: &mut Habit| {
                h.check_in(day(), now);
                Err(DomainError::invariant("abort"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvariantViolation(_))));

        let stored = store.get(&alice, h.id()).await.unwrap().unwrap();
        assert_eq!(stored, h);
    }

    #[tokio::test]
    async fn update_all_is_all_or_nothing() {
        let store = InMemoryDocumentStore::<Habit>::new();
        let alice = owner("alice");
        let a = store.insert(habit(&alice, "a")).await.unwrap();
        store.insert(habit(&alice, "b")).await.unwrap();
        let now = Utc::now();

        let result = store
            .update_all(&alice, &mut |all: &mut Vec<Habit>| {
                for h in all.iter_mut() {
                    h.check_in(day(), now);
                }
                Err(DomainError::conflict("stop"))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.get(&alice, a.id()).await.unwrap().unwrap().current_streak(), 0);

        let pushed = habit(&alice, "c");
        let written = store
            .update_all(&alice, &mut |all: &mut Vec<Habit>| {
                all.push(pushed.clone());
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(store.list(&alice).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_all_rejects_foreign_documents() {
        let store = InMemoryDocumentStore::<Habit>::new();
        let alice = owner("alice");
        let intruder = habit(&owner("mallory"), "x");

        let err = store
            .update_all(&alice, &mut |all: &mut Vec<Habit>| {
                all.push(intruder.clone());
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvariantViolation(_))));
        assert!(store.owners().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_check_ins_increment_once() {
        let store = Arc::new(InMemoryDocumentStore::<Habit>::new());
        let alice = owner("alice");
        let h = store.insert(habit(&alice, "read")).await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let alice = alice.clone();
            let id = h.id();
            tasks.push(tokio::spawn(async move {
                store
                    .update(&alice, id, &mut |h: &mut Habit| h.check_in_once(day(), Utc::now()).map(|_| ()))
                    .await
            }));
        }

        let mut ok = 0;
        let mut conflicts = 0;
        for t in tasks {
            match t.await.unwrap() {
                Ok(_) => ok += 1,
                Err(StoreError::Domain(DomainError::Conflict(_))) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 15);

        let stored = store.get(&alice, h.id()).await.unwrap().unwrap();
        assert_eq!(stored.current_streak(), 1);
        assert_eq!(stored.completion_history().len(), 1);
    }

    #[tokio::test]
    async fn owners_lists_only_non_empty_partitions() {
        let store = InMemoryDocumentStore::<Habit>::new();
        let alice = owner("alice");
        let h = store.insert(habit(&alice, "a")).await.unwrap();
        store.insert(habit(&owner("bob"), "b")).await.unwrap();

        assert_eq!(store.owners().await.unwrap().len(), 2);
        store.remove(&alice, h.id()).await.unwrap();
        assert_eq!(store.owners().await.unwrap(), vec![owner("bob")]);
    }
}
