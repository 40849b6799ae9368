use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::StoreError;
use crate::entities::{prelude::*, records};

/// Opaque key-value contract the engine persists through.
///
/// Implementations are expected to answer quickly or fail fast; callers do
/// not retry.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store. State is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(key);
        Ok(())
    }
}

/// Store backed by the `records` table.
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StateStore for SqlStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let record = Records::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(record.map(|model| model.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let record = records::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        Records::insert(record)
            .on_conflict(
                OnConflict::column(records::Column::Key)
                    .update_columns([records::Column::Value, records::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        Records::delete_by_id(key.to_string()).exec(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_sql_store() -> SqlStore {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SqlStore::new(db)
    }

    async fn exercise_store(store: &dyn StateStore) {
        assert_eq!(store.get("room:ABCDE").await.unwrap(), None);

        store.set("room:ABCDE", "[]".to_string()).await.unwrap();
        assert_eq!(
            store.get("room:ABCDE").await.unwrap().as_deref(),
            Some("[]")
        );

        // Overwrite replaces the value
        store
            .set("room:ABCDE", "[{\"x\":1}]".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("room:ABCDE").await.unwrap().as_deref(),
            Some("[{\"x\":1}]")
        );

        // Keys are independent
        store.set("game:ABCDE", "{}".to_string()).await.unwrap();
        store.delete("room:ABCDE").await.unwrap();
        assert_eq!(store.get("room:ABCDE").await.unwrap(), None);
        assert!(store.get("game:ABCDE").await.unwrap().is_some());

        // Deleting a missing key is not an error
        store.delete("room:missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        let store = MemoryStore::new();
        exercise_store(&store).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sql_store_contract() {
        let store = setup_sql_store().await;
        exercise_store(&store).await;
    }
}
