use std::borrow::Cow;

use sqlx::{postgres::PgPool, Row};

use super::{decode_list, KeyValueStore, StoreError};

#[derive(Debug)]
pub struct Connection {
    pool: PgPool,
}

impl Connection {
    pub async fn connect(connection_string: Cow<'_, str>) -> Result<Self, StoreError> {
        let pool = PgPool::connect(&connection_string).await?;
        Ok(Self { pool })
    }

    pub async fn perform_migrations(&self) -> Result<(), StoreError> {
        tracing::debug!("Running migrations");
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

impl KeyValueStore for Connection {
    async fn get(&self, scope: i64, key: &str) -> Vec<String> {
        let record = sqlx::query("SELECT value FROM kv_store WHERE scope = $1 AND key = $2")
            .bind(scope)
            .bind(key)
            .fetch_optional(&self.pool)
            .await;

        match record {
            Ok(Some(row)) => match row.try_get::<String, _>("value") {
                Ok(raw) => decode_list(scope, key, &raw),
                Err(e) => {
                    tracing::warn!(scope, key, error = %e, "Unreadable kv_store row");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(scope, key, error = %e, "Database error while reading kv_store");
                Vec::new()
            }
        }
    }

    async fn set(&self, scope: i64, key: &str, values: &[String]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(values)?;
        tracing::debug!(scope, key, count = values.len(), "Writing list");
        sqlx::query(
            "INSERT INTO kv_store (scope, key, value) VALUES ($1, $2, $3) \
             ON CONFLICT (scope, key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(scope)
        .bind(key)
        .bind(raw)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
