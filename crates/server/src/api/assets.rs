use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

/// Display metadata of the asset a new record is for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub icon: &'static str,
    pub icon_height: u32,
    pub icon_width: u32,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyDefault {
    pub currency: &'static str,
    pub item: Value,
    pub value: &'static str,
}

/// Template clients start a new record from.
#[derive(Debug, Clone, Serialize)]
pub struct RecordTemplate {
    pub asset: AssetInfo,
    pub date: DateTime<Utc>,
    pub details: Vec<CurrencyDefault>,
}

fn currency(code: &'static str, icon: &str, position: u32, value: &'static str) -> CurrencyDefault {
    CurrencyDefault {
        currency: code,
        item: json!({ "icon": icon, "label": code, "value": position }),
        value,
    }
}

pub fn record_template(now: DateTime<Utc>) -> RecordTemplate {
    RecordTemplate {
        asset: AssetInfo {
            icon: "eth",
            icon_height: 30,
            icon_width: 15,
            name: "Ethereum",
        },
        date: now,
        details: vec![
            currency("EUR", "europe.svg", 1, "60"),
            currency("RON", "romania.svg", 2, "40"),
            currency("USD", "usa.svg", 3, "111"),
        ],
    }
}

async fn get_assets() -> Json<RecordTemplate> {
    Json(record_template(Utc::now()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/assets", get(get_assets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_shape() {
        let now = Utc::now();
        let value = serde_json::to_value(record_template(now)).unwrap();
        assert_eq!(value["asset"]["iconHeight"], 30);
        assert_eq!(value["asset"]["name"], "Ethereum");
        let currencies: Vec<_> = value["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["currency"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(currencies, ["EUR", "RON", "USD"]);
        assert_eq!(value["details"][2]["value"], "111");
        assert_eq!(value["details"][0]["item"]["label"], "EUR");
    }
}
