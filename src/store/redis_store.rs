//! Document backend: one JSON document per record under `patients:{uuid}`,
//! plus a set of ids at `patients:index` for listing.
//!
//! Listing order is whatever SMEMBERS yields; callers must not rely on it.

use bb8_redis::bb8::Pool as RedisPool;
use bb8_redis::RedisConnectionManager;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{NewPatientRecord, PatientRecord, RecordId};

const KEY_PREFIX: &str = "patients:";
const INDEX_KEY: &str = "patients:index";

pub async fn connect(url: &str) -> anyhow::Result<RedisPool<RedisConnectionManager>> {
    let manager = RedisConnectionManager::new(url)?;
    let pool = RedisPool::builder().max_size(15).build(manager).await?;
    Ok(pool)
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| Error::InvalidIdentifier(raw.to_owned()))
}

fn record_key(id: Uuid) -> String {
    format!("{KEY_PREFIX}{id}")
}

pub async fn create(
    pool: &RedisPool<RedisConnectionManager>,
    record: &NewPatientRecord,
) -> Result<RecordId> {
    let id = Uuid::new_v4();
    let stored = PatientRecord::with_id(RecordId::Doc(id), record);
    let payload = serde_json::to_string(&stored)?;

    let mut conn = pool.get().await?;
    redis::pipe()
        .atomic()
        .cmd("SET")
        .arg(record_key(id))
        .arg(payload)
        .ignore()
        .cmd("SADD")
        .arg(INDEX_KEY)
        .arg(id.to_string())
        .ignore()
        .query_async::<_, ()>(&mut *conn)
        .await?;

    Ok(RecordId::Doc(id))
}

pub async fn list(pool: &RedisPool<RedisConnectionManager>) -> Result<Vec<PatientRecord>> {
    let mut conn = pool.get().await?;
    let ids: Vec<String> = redis::cmd("SMEMBERS")
        .arg(INDEX_KEY)
        .query_async(&mut *conn)
        .await?;

    let mut records = Vec::with_capacity(ids.len());
    for raw_id in ids {
        let id = match Uuid::parse_str(&raw_id) {
            Ok(id) => id,
            // Foreign entries in the index set are skipped, not fatal.
            Err(_) => continue,
        };
        let payload: Option<String> = redis::cmd("GET")
            .arg(record_key(id))
            .query_async(&mut *conn)
            .await?;
        if let Some(payload) = payload {
            records.push(serde_json::from_str(&payload)?);
        }
    }
    Ok(records)
}

pub async fn get(
    pool: &RedisPool<RedisConnectionManager>,
    raw_id: &str,
) -> Result<PatientRecord> {
    let id = parse_id(raw_id)?;
    let mut conn = pool.get().await?;
    let payload: Option<String> = redis::cmd("GET")
        .arg(record_key(id))
        .query_async(&mut *conn)
        .await?;
    match payload {
        Some(payload) => Ok(serde_json::from_str(&payload)?),
        None => Err(Error::NotFound(raw_id.to_owned())),
    }
}

pub async fn delete(pool: &RedisPool<RedisConnectionManager>, raw_id: &str) -> Result<()> {
    let id = parse_id(raw_id)?;
    let mut conn = pool.get().await?;
    let removed: i64 = redis::cmd("DEL")
        .arg(record_key(id))
        .query_async(&mut *conn)
        .await?;
    if removed == 0 {
        return Err(Error::NotFound(raw_id.to_owned()));
    }
    redis::cmd("SREM")
        .arg(INDEX_KEY)
        .arg(id.to_string())
        .query_async::<_, i64>(&mut *conn)
        .await?;
    Ok(())
}
