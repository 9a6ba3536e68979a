use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::record::{InvestmentRecord, StoredRecord};

/// Gateway to wherever investment records are kept.
///
/// The aggregation services never touch a store; the [`crate::InvestmentTracker`]
/// facade fetches through this trait and hands plain records over. Swapping the
/// backend (memory, encrypted file, ...) leaves the rest of the crate untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RecordStore: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Every stored record, in insertion order.
    async fn find_all(&self) -> Result<Vec<StoredRecord>, CoreError>;

    /// Records whose `asset` equals `asset` exactly (case-sensitive),
    /// in insertion order.
    async fn find_by_asset(&self, asset: &str) -> Result<Vec<StoredRecord>, CoreError>;

    /// Store a new record and return it with its assigned identifier.
    async fn insert(&self, record: InvestmentRecord) -> Result<StoredRecord, CoreError>;
}
