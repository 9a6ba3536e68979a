use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use invest_tracker_core::models::{
    record::{InvestmentRecord, ProjectedRecord},
    summary::{AssetView, RecordsSummary},
    totals::{CurrencyTotals, ExpensesByAsset},
};
use serde::Serialize;

use super::ApiJson;
use crate::{error::ApiResult, AppState};

/// Success body: the payload's fields plus `"message": "success"`.
#[derive(Serialize)]
pub struct Envelope<T> {
    #[serde(flatten)]
    body: T,
    message: &'static str,
}

impl<T> Envelope<T> {
    fn success(body: T) -> Json<Self> {
        Json(Self {
            body,
            message: "success",
        })
    }
}

#[derive(Serialize)]
pub struct RecordsBody {
    records: Vec<ProjectedRecord>,
    expenses: ExpensesByAsset,
}

/// Adds the requested asset to a flattened payload.
#[derive(Serialize)]
pub struct ForAsset<T> {
    #[serde(flatten)]
    body: T,
    asset: String,
}

async fn new_record(
    State(state): State<Arc<AppState>>,
    ApiJson(record): ApiJson<InvestmentRecord>,
) -> ApiResult<Json<Envelope<InvestmentRecord>>> {
    let stored = state.tracker.add_record(record).await?;
    tracing::info!(id = %stored.id, asset = ?stored.record.asset, "Stored new record");
    Ok(Envelope::success(stored.into_record()))
}

async fn list_records(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<RecordsBody>>> {
    let overview = state.tracker.records().await?;
    Ok(Envelope::success(RecordsBody {
        records: overview.records,
        expenses: overview.expenses,
    }))
}

async fn asset_records(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
) -> ApiResult<Json<Envelope<ForAsset<AssetView>>>> {
    let view = state.tracker.asset_records(&asset).await?;
    Ok(Envelope::success(ForAsset { body: view, asset }))
}

async fn records_summary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<RecordsSummary>>> {
    Ok(Envelope::success(state.tracker.records_summary().await?))
}

async fn asset_expenses(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
) -> ApiResult<Json<Envelope<ForAsset<CurrencyTotals>>>> {
    let totals = state.tracker.asset_expenses(&asset).await?;
    Ok(Envelope::success(ForAsset {
        body: totals,
        asset,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/newRecord", post(new_record))
        .route("/records", get(list_records))
        .route("/records/{asset}", get(asset_records))
        .route("/records-summary", get(records_summary))
        .route("/expenses/{asset}", get(asset_expenses))
}
