pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use models::{
    record::{InvestmentRecord, StoredRecord},
    summary::{AssetView, RecordsOverview, RecordsSummary},
    totals::CurrencyTotals,
};
use services::{
    aggregation_service::AggregationService, validation_service::ValidationService,
};
use storage::traits::RecordStore;

use errors::CoreError;

/// Main entry point for the Invest Tracker core library.
///
/// Fetches raw records through a [`RecordStore`] and turns them into the
/// views clients see. Each method does exactly one fetch, so every view is
/// consistent with itself even if the store changes between calls.
#[must_use]
pub struct InvestmentTracker {
    store: Arc<dyn RecordStore>,
    aggregation_service: AggregationService,
    validation_service: ValidationService,
}

impl std::fmt::Debug for InvestmentTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestmentTracker")
            .field("store", &self.store.name())
            .finish()
    }
}

impl InvestmentTracker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            aggregation_service: AggregationService::new(),
            validation_service: ValidationService::new(),
        }
    }

    /// Name of the backing record store.
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    // ── Records ─────────────────────────────────────────────────────

    /// Validate and store a new record. Returns it with its storage id.
    pub async fn add_record(&self, record: InvestmentRecord) -> Result<StoredRecord, CoreError> {
        self.validation_service.validate_new_record(&record)?;
        self.store.insert(record).await
    }

    /// Every record, with totals per (lowercased) asset.
    pub async fn records(&self) -> Result<RecordsOverview, CoreError> {
        let records = self.fetch_all().await?;
        self.aggregation_service.build_overview(&records)
    }

    /// Records of one asset (exact name) with their flat currency totals.
    pub async fn asset_records(&self, asset: &str) -> Result<AssetView, CoreError> {
        let records = self.fetch_asset(asset).await?;
        Ok(self.aggregation_service.build_asset_view(&records))
    }

    /// Flat currency totals of one asset (exact name).
    pub async fn asset_expenses(&self, asset: &str) -> Result<CurrencyTotals, CoreError> {
        Ok(self.asset_records(asset).await?.total)
    }

    /// Every record, the most-recent-investment summary per asset and the
    /// per-asset totals.
    pub async fn records_summary(&self) -> Result<RecordsSummary, CoreError> {
        let records = self.fetch_all().await?;
        self.aggregation_service.build_summary(&records)
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn fetch_all(&self) -> Result<Vec<InvestmentRecord>, CoreError> {
        Ok(self
            .store
            .find_all()
            .await?
            .into_iter()
            .map(StoredRecord::into_record)
            .collect())
    }

    async fn fetch_asset(&self, asset: &str) -> Result<Vec<InvestmentRecord>, CoreError> {
        Ok(self
            .store
            .find_by_asset(asset)
            .await?
            .into_iter()
            .map(StoredRecord::into_record)
            .collect())
    }
}
