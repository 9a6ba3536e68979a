use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::expense::ExpenseLine;
use crate::models::record::ProjectedRecord;
use crate::models::summary::AssetExpenses;
use crate::models::totals::{CurrencyTotals, ExpensesByAsset};

/// Sums expense lines per currency, globally or per asset.
///
/// Amounts that cannot be read as numbers count as zero; nothing here fails
/// on bad amounts.
pub struct ExpenseService;

impl ExpenseService {
    pub fn new() -> Self {
        Self
    }

    /// Flat totals: one entry per currency seen, in order of first occurrence.
    pub fn accumulate<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a ExpenseLine>,
    ) -> CurrencyTotals {
        let mut totals = CurrencyTotals::new();
        for line in lines {
            totals.add(&line.currency, line.value.amount());
        }
        totals
    }

    /// Nested totals keyed by `(asset.to_lowercase(), currency)` in a single
    /// pass, plus the distinct case-sensitive assets in first-seen order.
    ///
    /// Assets whose records carry no expense lines are listed in `assets`
    /// but get no entry in the nested totals.
    pub fn accumulate_by_asset(
        &self,
        records: &[ProjectedRecord],
    ) -> Result<AssetExpenses, CoreError> {
        let mut expenses = ExpensesByAsset::new();
        let mut assets = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            let asset = record.asset.as_deref().ok_or(CoreError::MalformedRecord {
                index,
                field: "asset",
            })?;

            if seen.insert(asset) {
                assets.push(asset.to_string());
            }

            for line in &record.spending_details {
                expenses.add(asset, &line.currency, line.value.amount());
            }
        }

        Ok(AssetExpenses { expenses, assets })
    }
}

impl Default for ExpenseService {
    fn default() -> Self {
        Self::new()
    }
}
