use crate::database::{KeyValueStore, StoreError};

pub const COMPLETED_AMINO_ACIDS_KEY: &str = "completedAminoAcids";

/// Names of amino acids a learner has solved in practice mode.
///
/// Loaded once when a question starts and written back whole when a name is added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionTracker {
    scope: i64,
    completed: Vec<String>,
}

impl CompletionTracker {
    pub async fn load<Store: KeyValueStore>(store: &Store, scope: i64) -> Self {
        let completed = store.get(scope, COMPLETED_AMINO_ACIDS_KEY).await;
        tracing::debug!(scope, count = completed.len(), "Loaded completed amino acids");
        Self { scope, completed }
    }

    pub fn scope(&self) -> i64 {
        self.scope
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.completed.iter().any(|done| done == name)
    }

    /// Returns `false` without touching the store when `name` is already recorded.
    /// On a failed write the tracker is left as it was.
    pub async fn mark_completed<Store: KeyValueStore>(
        &mut self,
        store: &Store,
        name: &str,
    ) -> Result<bool, StoreError> {
        if self.contains(name) {
            return Ok(false);
        }
        let mut updated = self.completed.clone();
        updated.push(name.to_owned());
        store
            .set(self.scope, COMPLETED_AMINO_ACIDS_KEY, &updated)
            .await?;
        self.completed = updated;
        tracing::info!(scope = self.scope, name, "Marked amino acid as completed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    /// Reads nothing and refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, _scope: i64, _key: &str) -> Vec<String> {
            Vec::new()
        }

        async fn set(&self, _scope: i64, _key: &str, _values: &[String]) -> Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn load_from_an_empty_store_is_empty() {
        let store = MemoryStore::default();
        let tracker = CompletionTracker::load(&store, 10).await;
        assert!(tracker.completed().is_empty());
        assert_eq!(tracker.scope(), 10);
    }

    #[tokio::test]
    async fn mark_completed_appends_once_and_flushes() {
        let store = MemoryStore::default();
        let mut tracker = CompletionTracker::load(&store, 10).await;

        assert!(tracker.mark_completed(&store, "Glycine").await.unwrap());
        assert!(tracker.mark_completed(&store, "Valine").await.unwrap());
        assert!(!tracker.mark_completed(&store, "Glycine").await.unwrap());

        assert_eq!(tracker.completed(), ["Glycine", "Valine"]);
        assert_eq!(
            store.get(10, COMPLETED_AMINO_ACIDS_KEY).await,
            vec!["Glycine".to_owned(), "Valine".to_owned()]
        );

        let reloaded = CompletionTracker::load(&store, 10).await;
        assert_eq!(reloaded, tracker);
        assert!(reloaded.contains("Valine"));
        assert!(!reloaded.contains("Serine"));
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_replaced_on_next_completion() {
        let store = MemoryStore::default();
        store.insert_raw(3, COMPLETED_AMINO_ACIDS_KEY, "{oops");

        let mut tracker = CompletionTracker::load(&store, 3).await;
        assert!(tracker.completed().is_empty());
        tracker.mark_completed(&store, "Lysine").await.unwrap();
        assert_eq!(
            store.get(3, COMPLETED_AMINO_ACIDS_KEY).await,
            vec!["Lysine".to_owned()]
        );
    }

    #[tokio::test]
    async fn failed_write_leaves_the_tracker_unchanged() {
        let mut tracker = CompletionTracker::load(&ReadOnlyStore, 4).await;

        assert!(tracker.mark_completed(&ReadOnlyStore, "Proline").await.is_err());
        assert!(tracker.completed().is_empty());
        assert!(!tracker.contains("Proline"));

        let store = MemoryStore::default();
        assert!(tracker.mark_completed(&store, "Proline").await.unwrap());
        assert_eq!(
            store.get(4, COMPLETED_AMINO_ACIDS_KEY).await,
            vec!["Proline".to_owned()]
        );
    }
}
