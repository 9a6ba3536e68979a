use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::record::{InvestmentRecord, StoredRecord};

use super::traits::RecordStore;

/// Record store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing records (e.g., fixtures or an import).
    pub fn with_records(records: Vec<StoredRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> CoreError {
    CoreError::Storage("memory store lock poisoned".into())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecordStore for MemoryRecordStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_all(&self) -> Result<Vec<StoredRecord>, CoreError> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    async fn find_by_asset(&self, asset: &str) -> Result<Vec<StoredRecord>, CoreError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.record.asset.as_deref() == Some(asset))
            .cloned()
            .collect())
    }

    async fn insert(&self, record: InvestmentRecord) -> Result<StoredRecord, CoreError> {
        let stored = StoredRecord::new(record);
        self.records.write().map_err(poisoned)?.push(stored.clone());
        Ok(stored)
    }
}
