//! Postgres-backed document store.
//!
//! All collections share one JSONB table keyed by `(collection, owner_id, id)`.
//! Every query carries the owner in its WHERE clause, so cross-owner access
//! cannot be expressed.
//!
//! ## Atomicity
//!
//! `update` locks the target row with `SELECT ... FOR UPDATE` inside a
//! transaction. `update_all` additionally takes a transaction-scoped advisory
//! lock on `(collection, owner)` so that batches which only insert rows are
//! serialized too.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use daybook_core::{DomainError, Entity, OwnerId};

use super::{BatchMutation, DocumentStore, Mutation, StoreError, StoreResult, ensure_owned};

const SCHEMA: &str = include_str!("../../migrations/0001_documents.sql");

/// Create the `documents` table if it does not exist.
pub async fn migrate(pool: &PgPool) -> StoreResult<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
    Ok(())
}

pub struct PostgresDocumentStore<V> {
    pool: Arc<PgPool>,
    _value: PhantomData<fn() -> V>,
}

impl<V> PostgresDocumentStore<V> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            _value: PhantomData,
        }
    }
}

impl<V> Clone for PostgresDocumentStore<V> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _value: PhantomData,
        }
    }
}

impl<V> std::fmt::Debug for PostgresDocumentStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDocumentStore").finish_non_exhaustive()
    }
}

fn map_sqlx_error(operation: &'static str, e: sqlx::Error) -> StoreError {
    tracing::warn!(operation, error = %e, "postgres document store error");
    StoreError::Backend(format!("{operation}: {e}"))
}

fn encode<V: Serialize>(doc: &V) -> StoreResult<serde_json::Value> {
    serde_json::to_value(doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<V: DeserializeOwned>(row: &sqlx::postgres::PgRow) -> StoreResult<V> {
    let body: serde_json::Value = row
        .try_get("body")
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    serde_json::from_value(body).map_err(|e| StoreError::Serialization(e.to_string()))
}

async fn upsert<V>(tx: &mut Transaction<'_, Postgres>, doc: &V) -> StoreResult<()>
where
    V: Entity + Serialize,
{
    sqlx::query(
        r#"
        INSERT INTO documents (collection, owner_id, id, body)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (collection, owner_id, id)
        DO UPDATE SET body = EXCLUDED.body, updated_at = now()
        "#,
    )
    .bind(V::COLLECTION)
    .bind(doc.owner_id().as_str())
    .bind(doc.id().to_string())
    .bind(encode(doc)?)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("upsert", e))?;
    Ok(())
}

#[async_trait]
impl<V> DocumentStore<V> for PostgresDocumentStore<V>
where
    V: Entity + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    #[instrument(skip(self), fields(collection = V::COLLECTION, owner = %owner), err)]
    async fn get(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND owner_id = $2 AND id = $3")
            .bind(V::COLLECTION)
            .bind(owner.as_str())
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(decode).transpose()
    }

    #[instrument(skip(self, doc), fields(collection = V::COLLECTION, owner = %doc.owner_id()), err)]
    async fn insert(&self, doc: V) -> StoreResult<V> {
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, owner_id, id, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, owner_id, id) DO NOTHING
            "#,
        )
        .bind(V::COLLECTION)
        .bind(doc.owner_id().as_str())
        .bind(doc.id().to_string())
        .bind(encode(&doc)?)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::conflict(format!("{} {} already exists", V::KIND, doc.id())).into());
        }
        Ok(doc)
    }

    #[instrument(skip(self, mutation), fields(collection = V::COLLECTION, owner = %owner), err)]
    async fn update(&self, owner: &OwnerId, id: V::Id, mutation: Mutation<'_, V>) -> StoreResult<V> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let row = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND owner_id = $2 AND id = $3 FOR UPDATE",
        )
        .bind(V::COLLECTION)
        .bind(owner.as_str())
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("select_for_update", e))?;

        let Some(row) = row else {
            return Err(DomainError::not_found(V::KIND).into());
        };
        let mut doc: V = decode(&row)?;

        // Dropping `tx` on the error path rolls the transaction back.
        mutation(&mut doc)?;
        upsert(&mut tx, &doc).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(doc)
    }

    #[instrument(skip(self, mutation), fields(collection = V::COLLECTION, owner = %owner), err)]
    async fn update_all(&self, owner: &OwnerId, mutation: BatchMutation<'_, V>) -> StoreResult<Vec<V>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || ':' || $2))")
            .bind(V::COLLECTION)
            .bind(owner.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("advisory_lock", e))?;

        let rows = sqlx::query(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND owner_id = $2
            ORDER BY created_at ASC, id ASC
            FOR UPDATE
            "#,
        )
        .bind(V::COLLECTION)
        .bind(owner.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("select_all_for_update", e))?;

        let mut docs = rows.iter().map(decode).collect::<StoreResult<Vec<V>>>()?;
        mutation(&mut docs)?;
        ensure_owned(owner, &docs)?;

        for doc in &docs {
            upsert(&mut tx, doc).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(docs)
    }

    #[instrument(skip(self), fields(collection = V::COLLECTION, owner = %owner), err)]
    async fn remove(&self, owner: &OwnerId, id: V::Id) -> StoreResult<Option<V>> {
        let row = sqlx::query(
            "DELETE FROM documents WHERE collection = $1 AND owner_id = $2 AND id = $3 RETURNING body",
        )
        .bind(V::COLLECTION)
        .bind(owner.as_str())
        .bind(id.to_string())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("remove", e))?;

        row.as_ref().map(decode).transpose()
    }

    #[instrument(skip(self), fields(collection = V::COLLECTION, owner = %owner), err)]
    async fn list(&self, owner: &OwnerId) -> StoreResult<Vec<V>> {
        let rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND owner_id = $2 ORDER BY created_at ASC, id ASC",
        )
        .bind(V::COLLECTION)
        .bind(owner.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(decode).collect()
    }

    #[instrument(skip(self), fields(collection = V::COLLECTION), err)]
    async fn owners(&self) -> StoreResult<Vec<OwnerId>> {
        let rows = sqlx::query("SELECT DISTINCT owner_id FROM documents WHERE collection = $1 ORDER BY owner_id")
            .bind(V::COLLECTION)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("owners", e))?;

        rows.iter()
            .map(|r| {
                let raw: String = r.try_get("owner_id").map_err(|e| map_sqlx_error("owners", e))?;
                OwnerId::new(raw).map_err(StoreError::from)
            })
            .collect()
    }
}
