use crate::errors::CoreError;
use crate::models::record::ProjectedRecord;
use crate::models::summary::AssetSummary;
use crate::models::totals::{CurrencyTotals, ExpensesByAsset};

/// Builds the per-asset "most recent investment" summaries.
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// One summary per asset, in the order of `assets`.
    ///
    /// Records are grouped by exact (case-sensitive) asset name; expenses are
    /// looked up by the lowercased name. The most recent record is the one
    /// with the latest parsed `date`; on equal dates the earlier record in
    /// `records` wins, and records whose date cannot be parsed rank below
    /// every dated record.
    pub fn summarize(
        &self,
        records: &[ProjectedRecord],
        expenses: &ExpensesByAsset,
        assets: &[String],
    ) -> Result<Vec<AssetSummary>, CoreError> {
        if let Some(index) = records.iter().position(|r| r.asset.is_none()) {
            return Err(CoreError::MalformedRecord {
                index,
                field: "asset",
            });
        }

        assets
            .iter()
            .map(|asset| {
                let latest = Self::most_recent(records, asset)
                    .ok_or_else(|| CoreError::EmptyAssetGroup(asset.clone()))?;

                Ok(AssetSummary {
                    asset: asset.clone(),
                    last_invested: latest.formatted_date.clone(),
                    date: latest.date.clone(),
                    expenses: expenses.get(asset).cloned().unwrap_or_else(CurrencyTotals::new),
                })
            })
            .collect()
    }

    /// Latest record of `asset`, first-seen on ties. `None` for an empty group.
    fn most_recent<'a>(records: &'a [ProjectedRecord], asset: &str) -> Option<&'a ProjectedRecord> {
        let mut latest: Option<(&ProjectedRecord, _)> = None;
        for record in records.iter().filter(|r| r.asset.as_deref() == Some(asset)) {
            let ts = record.timestamp();
            match latest {
                Some((_, best)) if ts <= best => {}
                _ => latest = Some((record, ts)),
            }
        }
        latest.map(|(record, _)| record)
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}
