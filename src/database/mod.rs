use std::future::Future;

use thiserror::Error;

pub mod connection;
pub mod memory;

use connection::Connection;
use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Snapshot storage for string lists, partitioned by `scope` (the chat id).
///
/// `get` never fails: a missing or unreadable entry reads as an empty list.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, scope: i64, key: &str) -> impl Future<Output = Vec<String>> + Send;

    fn set(
        &self,
        scope: i64,
        key: &str,
        values: &[String],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The store picked at startup.
#[derive(Debug)]
pub enum Storage {
    Postgres(Connection),
    Memory(MemoryStore),
}

impl KeyValueStore for Storage {
    async fn get(&self, scope: i64, key: &str) -> Vec<String> {
        match self {
            Storage::Postgres(connection) => connection.get(scope, key).await,
            Storage::Memory(memory) => memory.get(scope, key).await,
        }
    }

    async fn set(&self, scope: i64, key: &str, values: &[String]) -> Result<(), StoreError> {
        match self {
            Storage::Postgres(connection) => connection.set(scope, key, values).await,
            Storage::Memory(memory) => memory.set(scope, key, values).await,
        }
    }
}

pub(crate) fn decode_list(scope: i64, key: &str, raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(scope, key, error = %e, "Stored list is corrupt, reading it as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_list_reads_json_arrays() {
        assert_eq!(
            decode_list(1, "k", r#"["Glycine","Valine"]"#),
            vec!["Glycine".to_owned(), "Valine".to_owned()]
        );
    }

    #[test]
    fn decode_list_treats_garbage_as_empty() {
        assert!(decode_list(1, "k", "not json").is_empty());
        assert!(decode_list(1, "k", r#"{"Glycine":true}"#).is_empty());
        assert!(decode_list(1, "k", "").is_empty());
    }

    #[tokio::test]
    async fn storage_delegates_to_the_memory_store() {
        let storage = Storage::Memory(MemoryStore::default());
        assert!(storage.get(5, "completed").await.is_empty());
        storage
            .set(5, "completed", &["Serine".to_owned()])
            .await
            .unwrap();
        assert_eq!(storage.get(5, "completed").await, vec!["Serine".to_owned()]);
    }
}
