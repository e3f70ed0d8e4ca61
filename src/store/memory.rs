//! In-process backend for tests and local development. Sequential integer
//! ids and insertion-order listing, like the relational variant.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use crate::error::{Error, Result};
use crate::models::{NewPatientRecord, PatientRecord, RecordId};

pub struct MemoryStore {
    records: DashMap<i64, PatientRecord>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn parse_id(raw: &str) -> Result<i64> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidIdentifier(raw.to_owned()))
    }

    pub fn create(&self, record: &NewPatientRecord) -> Result<RecordId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records
            .insert(id, PatientRecord::with_id(RecordId::Seq(id), record));
        Ok(RecordId::Seq(id))
    }

    pub fn list(&self) -> Result<Vec<PatientRecord>> {
        let mut records: Vec<PatientRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration is unordered; sort to match insertion order.
        records.sort_by_key(|r| match r.id {
            RecordId::Seq(id) => id,
            RecordId::Doc(_) => i64::MAX,
        });
        Ok(records)
    }

    pub fn get(&self, raw_id: &str) -> Result<PatientRecord> {
        let id = Self::parse_id(raw_id)?;
        self.records
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NotFound(raw_id.to_owned()))
    }

    pub fn delete(&self, raw_id: &str) -> Result<()> {
        let id = Self::parse_id(raw_id)?;
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(raw_id.to_owned()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
