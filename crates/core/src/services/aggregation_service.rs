use crate::errors::CoreError;
use crate::models::record::InvestmentRecord;
use crate::models::summary::{AssetView, RecordsOverview, RecordsSummary};
use crate::services::expense_service::ExpenseService;
use crate::services::projection_service::{ExpenseFlattening, ProjectionService};
use crate::services::summary_service::SummaryService;

/// Composes projection, accumulation and summarizing into the views the
/// host serves.
///
/// Stateless: every call works only on the records it is given, so calls
/// can run concurrently without coordination.
pub struct AggregationService {
    projection_service: ProjectionService,
    expense_service: ExpenseService,
    summary_service: SummaryService,
}

impl AggregationService {
    pub fn new() -> Self {
        Self {
            projection_service: ProjectionService::new(),
            expense_service: ExpenseService::new(),
            summary_service: SummaryService::new(),
        }
    }

    /// View of records already narrowed to one asset by the caller:
    /// projected records plus their flat currency totals.
    pub fn build_asset_view(&self, records: &[InvestmentRecord]) -> AssetView {
        let projection = self
            .projection_service
            .project(records, ExpenseFlattening::Include);
        let total = self.expense_service.accumulate(&projection.expenses);

        AssetView {
            records: projection.records,
            total,
        }
    }

    /// All records with totals per (lowercased) asset.
    pub fn build_overview(&self, records: &[InvestmentRecord]) -> Result<RecordsOverview, CoreError> {
        let projection = self
            .projection_service
            .project(records, ExpenseFlattening::Skip);
        let by_asset = self
            .expense_service
            .accumulate_by_asset(&projection.records)?;

        Ok(RecordsOverview {
            records: projection.records,
            expenses: by_asset.expenses,
            assets: by_asset.assets,
        })
    }

    /// All records, the latest-investment summary per asset and the
    /// per-asset totals.
    pub fn build_summary(&self, records: &[InvestmentRecord]) -> Result<RecordsSummary, CoreError> {
        let overview = self.build_overview(records)?;
        let summary = self.summary_service.summarize(
            &overview.records,
            &overview.expenses,
            &overview.assets,
        )?;

        Ok(RecordsSummary {
            records: overview.records,
            summary,
            expenses: overview.expenses,
        })
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
