use std::{collections::HashMap, sync::Mutex};

use super::{decode_list, KeyValueStore, StoreError};

/// Process-local store. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(i64, String), String>>,
}

impl MemoryStore {
    /// Stores `raw` as-is, bypassing encoding.
    pub(crate) fn insert_raw(&self, scope: i64, key: &str, raw: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((scope, key.to_owned()), raw.into());
    }

    fn read_raw(&self, scope: i64, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&(scope, key.to_owned()))
            .cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, scope: i64, key: &str) -> Vec<String> {
        self.read_raw(scope, key)
            .map(|raw| decode_list(scope, key, &raw))
            .unwrap_or_default()
    }

    async fn set(&self, scope: i64, key: &str, values: &[String]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(values)?;
        self.insert_raw(scope, key, raw);
        Ok(())
    }
}
