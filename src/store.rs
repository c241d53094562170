use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;

/// A stored document body: a JSON object with whatever fields the caller wrote.
pub type Document = Map<String, Value>;

/// SQLSTATE for `insufficient_privilege`.
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: Document,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some(PG_INSUFFICIENT_PRIVILEGE) {
                return StoreError::PermissionDenied(db.message().to_string());
            }
        }
        StoreError::Backend(e.to_string())
    }
}

/// Get/set-by-key access to a document database, addressed by collection and id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<DocumentSnapshot>, StoreError>;

    /// Replaces the whole document at `id`; nothing from a previous version survives.
    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<DocumentSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, (Json<Document>, OffsetDateTime)>(
            r#"
            SELECT data, updated_at
              FROM documents
             WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(Json(data), updated_at)| DocumentSnapshot {
            id: id.to_string(),
            data,
            updated_at,
        }))
    }

    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.db)
        .await?;
        debug!(%collection, %id, "document written");
        Ok(())
    }
}

/// Process-local store for `STORE_BACKEND=memory` and tests.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<(String, String), DocumentSnapshot>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<DocumentSnapshot>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.get(&(collection.to_string(), id.to_string())).cloned())
    }

    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError> {
        let snapshot = DocumentSnapshot {
            id: id.to_string(),
            data,
            updated_at: OffsetDateTime::now_utc(),
        };
        self.docs
            .write()
            .await
            .insert((collection.to_string(), id.to_string()), snapshot);
        Ok(())
    }
}
