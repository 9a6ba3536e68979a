use serde::{Deserialize, Serialize};

use super::record::ProjectedRecord;
use super::totals::{CurrencyTotals, ExpensesByAsset};

/// Snapshot of the most recent investment in one asset plus everything
/// spent on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    /// Asset name as stored (case preserved)
    pub asset: String,

    /// Display date of the most recent record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_invested: Option<String>,

    /// Raw date of the most recent record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Totals per currency for this asset (merged case-insensitively)
    pub expenses: CurrencyTotals,
}

/// Result of per-asset accumulation: the nested totals and the distinct
/// assets (case-sensitive, order of first appearance).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetExpenses {
    pub expenses: ExpensesByAsset,
    pub assets: Vec<String>,
}

/// Records of a single asset with their combined totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetView {
    pub records: Vec<ProjectedRecord>,
    pub total: CurrencyTotals,
}

/// Every record with the per-asset totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsOverview {
    pub records: Vec<ProjectedRecord>,
    pub expenses: ExpensesByAsset,
    pub assets: Vec<String>,
}

/// Every record, the per-asset summaries and the per-asset totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsSummary {
    pub records: Vec<ProjectedRecord>,
    pub summary: Vec<AssetSummary>,
    pub expenses: ExpensesByAsset,
}
