//! Record store: append-only creation plus read and delete by identifier.
//!
//! One facade, three backends selected by configuration. The relational
//! variant (sqlite) assigns sequential integer ids and lists in insertion
//! order; the document variant (redis) assigns opaque UUIDs and lists in
//! whatever order the index set yields. The in-memory variant backs tests
//! and local development and behaves like the relational one.
//!
//! Writes rely on each backend's default durability guarantee; there is no
//! transaction or write-concern tuning here. Listing is unbounded.

use bb8_redis::bb8::Pool as RedisPool;
use bb8_redis::RedisConnectionManager;
use sqlx::SqlitePool;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::{NewPatientRecord, PatientRecord, RecordId};

mod memory;
mod redis_store;
mod sqlite;

pub use memory::MemoryStore;

enum Backend {
    Sqlite(SqlitePool),
    Redis(RedisPool<RedisConnectionManager>),
    Memory(MemoryStore),
}

pub struct RecordStore {
    backend: Backend,
}

impl RecordStore {
    /// Connect the configured backend. Fatal at startup on failure.
    pub async fn connect(config: &StoreConfig) -> anyhow::Result<Self> {
        let backend = match config.backend.as_str() {
            "sqlite" => {
                let pool = sqlite::connect(&config.url).await?;
                info!(url = %config.url, "sqlite record store ready");
                Backend::Sqlite(pool)
            }
            "redis" => {
                let pool = redis_store::connect(&config.url).await?;
                info!(url = %config.url, "redis record store ready");
                Backend::Redis(pool)
            }
            "memory" => Backend::Memory(MemoryStore::new()),
            other => anyhow::bail!("unsupported store backend: {other}"),
        };
        Ok(Self { backend })
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
        }
    }

    /// Persist a new record and return the store-assigned identifier.
    pub async fn create(&self, record: &NewPatientRecord) -> Result<RecordId> {
        match &self.backend {
            Backend::Sqlite(pool) => sqlite::create(pool, record).await,
            Backend::Redis(pool) => redis_store::create(pool, record).await,
            Backend::Memory(store) => store.create(record),
        }
    }

    /// All records, store-native order, no pagination.
    pub async fn list(&self) -> Result<Vec<PatientRecord>> {
        match &self.backend {
            Backend::Sqlite(pool) => sqlite::list(pool).await,
            Backend::Redis(pool) => redis_store::list(pool).await,
            Backend::Memory(store) => store.list(),
        }
    }

    /// Fetch one record by its raw identifier string.
    pub async fn get(&self, raw_id: &str) -> Result<PatientRecord> {
        match &self.backend {
            Backend::Sqlite(pool) => sqlite::get(pool, raw_id).await,
            Backend::Redis(pool) => redis_store::get(pool, raw_id).await,
            Backend::Memory(store) => store.get(raw_id),
        }
    }

    /// Delete one record; deleting the same id twice yields NotFound.
    pub async fn delete(&self, raw_id: &str) -> Result<()> {
        match &self.backend {
            Backend::Sqlite(pool) => sqlite::delete(pool, raw_id).await,
            Backend::Redis(pool) => redis_store::delete(pool, raw_id).await,
            Backend::Memory(store) => store.delete(raw_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::error::Error;

    fn sample_record(result: &str) -> NewPatientRecord {
        NewPatientRecord {
            gender: "Female".into(),
            age: 45,
            hypertension: 1,
            heart_disease: 0,
            smoking_history: "never".into(),
            bmi: 27.5,
            hba1c_level: 6.1,
            blood_glucose_level: 140,
            result: result.into(),
        }
    }

    // A single-connection pool keeps every operation on the same in-memory
    // database.
    async fn sqlite_store() -> RecordStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlite::init_schema(&pool).await.unwrap();
        RecordStore {
            backend: Backend::Sqlite(pool),
        }
    }

    async fn store_round_trip(store: RecordStore) {
        let record = sample_record("Diabetic");
        let id = store.create(&record).await.unwrap();

        let fetched = store.get(&id.to_string()).await.unwrap();
        assert_eq!(fetched, PatientRecord::with_id(id, &record));
    }

    async fn store_delete_then_get(store: RecordStore) {
        let id = store.create(&sample_record("NotDiabetic")).await.unwrap();
        let raw = id.to_string();

        store.delete(&raw).await.unwrap();
        assert!(matches!(store.get(&raw).await, Err(Error::NotFound(_))));
        // Second delete is NotFound, not success.
        assert!(matches!(store.delete(&raw).await, Err(Error::NotFound(_))));
    }

    async fn store_list_counts(store: RecordStore) {
        let mut ids = Vec::new();
        for _ in 0..4 {
            ids.push(store.create(&sample_record("Diabetic")).await.unwrap());
        }
        store.delete(&ids[1].to_string()).await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 3);
    }

    async fn store_rejects_malformed_id(store: RecordStore) {
        assert!(matches!(
            store.get("not-an-id").await,
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(matches!(
            store.delete("not-an-id").await,
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn memory_round_trip() {
        store_round_trip(RecordStore::in_memory()).await;
    }

    #[tokio::test]
    async fn memory_delete_then_get() {
        store_delete_then_get(RecordStore::in_memory()).await;
    }

    #[tokio::test]
    async fn memory_list_counts() {
        store_list_counts(RecordStore::in_memory()).await;
    }

    #[tokio::test]
    async fn memory_rejects_malformed_id() {
        store_rejects_malformed_id(RecordStore::in_memory()).await;
    }

    #[tokio::test]
    async fn memory_lists_in_insertion_order() {
        let store = RecordStore::in_memory();
        for _ in 0..3 {
            store.create(&sample_record("Diabetic")).await.unwrap();
        }
        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn sqlite_round_trip() {
        store_round_trip(sqlite_store().await).await;
    }

    #[tokio::test]
    async fn sqlite_delete_then_get() {
        store_delete_then_get(sqlite_store().await).await;
    }

    #[tokio::test]
    async fn sqlite_list_counts() {
        store_list_counts(sqlite_store().await).await;
    }

    #[tokio::test]
    async fn sqlite_rejects_malformed_id() {
        store_rejects_malformed_id(sqlite_store().await).await;
    }

    #[tokio::test]
    async fn sqlite_assigns_sequential_ids() {
        let store = sqlite_store().await;
        let first = store.create(&sample_record("Diabetic")).await.unwrap();
        let second = store.create(&sample_record("Diabetic")).await.unwrap();
        assert_eq!(first.to_string(), "1");
        assert_eq!(second.to_string(), "2");
    }
}
