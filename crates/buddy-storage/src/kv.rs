use crate::StorageError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A durable string-to-string map. Writes replace the whole value under a key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    pub async fn connect(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}", db_path.to_string_lossy());
        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!(path = %db_path.display(), "opened key-value store");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
              value = excluded.value,
              updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sqlite_put_overwrites_previous_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SqliteKvStore::connect(&dir.path().join("kv.sqlite3"))
            .await
            .expect("connect");

        assert_eq!(store.get("drafts").await.expect("get"), None);

        store.put("drafts", "[1]").await.expect("first put");
        store.put("drafts", "[1,2]").await.expect("second put");

        assert_eq!(
            store.get("drafts").await.expect("get"),
            Some("[1,2]".to_string())
        );
    }

    #[tokio::test]
    async fn sqlite_values_survive_reconnect() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("kv.sqlite3");

        {
            let store = SqliteKvStore::connect(&path).await.expect("connect");
            store.put("tones", "[]").await.expect("put");
            store.pool().close().await;
        }

        let reopened = SqliteKvStore::connect(&path).await.expect("reconnect");
        assert_eq!(
            reopened.get("tones").await.expect("get"),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn memory_store_clones_share_entries() {
        let store = MemoryKvStore::new();
        let handle = store.clone();

        store.put("k", "v").await.expect("put");
        assert_eq!(handle.get("k").await.expect("get"), Some("v".to_string()));
    }
}
