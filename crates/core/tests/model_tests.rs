use chrono::{TimeZone, Utc};
use serde_json::json;

use invest_tracker_core::models::expense::{ExpenseLine, ExpenseValue};
use invest_tracker_core::models::record::{
    parse_timestamp, InvestmentRecord, ProjectedRecord, StoredRecord,
};
use invest_tracker_core::models::summary::AssetSummary;
use invest_tracker_core::models::totals::{CurrencyTotals, ExpensesByAsset};

// ═══════════════════════════════════════════════════════════════════
//  ExpenseValue
// ═══════════════════════════════════════════════════════════════════

mod expense_value {
    use super::*;

    #[test]
    fn number_is_taken_as_is() {
        assert_eq!(ExpenseValue::from(12.5).amount(), 12.5);
        assert_eq!(ExpenseValue::from(100_i64).amount(), 100.0);
    }

    #[test]
    fn numeric_text() {
        assert_eq!(ExpenseValue::from("111").amount(), 111.0);
        assert_eq!(ExpenseValue::from("0.25").amount(), 0.25);
    }

    #[test]
    fn non_numeric_text_is_zero() {
        assert_eq!(ExpenseValue::from("abc").amount(), 0.0);
        assert_eq!(ExpenseValue::from("").as_f64(), None);
    }

    #[test]
    fn other_json_is_zero() {
        assert_eq!(ExpenseValue::Other(json!(true)).amount(), 0.0);
        assert_eq!(ExpenseValue::default().amount(), 0.0);
    }

    #[test]
    fn overflowing_text_is_zero() {
        assert_eq!(ExpenseValue::from("1e400").as_f64(), None);
    }

    #[test]
    fn deserializes_number_text_and_other() {
        let v: ExpenseValue = serde_json::from_value(json!(60)).unwrap();
        assert_eq!(v, ExpenseValue::from(60_i64));

        let v: ExpenseValue = serde_json::from_value(json!("60")).unwrap();
        assert_eq!(v, ExpenseValue::Text("60".into()));

        let v: ExpenseValue = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(v, ExpenseValue::Other(json!(null)));

        let v: ExpenseValue = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(v, ExpenseValue::Other(json!([1, 2])));
    }

    #[test]
    fn numbers_serialize_back_unchanged() {
        for raw in [json!(100), json!(-3), json!(12.5)] {
            let v: ExpenseValue = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(serde_json::to_string(&v).unwrap(), raw.to_string());
        }
    }

    #[test]
    fn non_finite_number_becomes_null() {
        assert_eq!(ExpenseValue::from(f64::NAN), ExpenseValue::default());
        assert_eq!(ExpenseValue::from(f64::INFINITY).amount(), 0.0);
    }

    #[test]
    fn text_serializes_back_unchanged() {
        let v = ExpenseValue::from("40");
        assert_eq!(serde_json::to_value(&v).unwrap(), json!("40"));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ExpenseLine
// ═══════════════════════════════════════════════════════════════════

mod expense_line {
    use super::*;

    #[test]
    fn deserializes_wire_shape() {
        let line: ExpenseLine = serde_json::from_value(json!({
            "currency": "EUR",
            "item": {"icon": "europe.svg", "label": "EUR", "value": 1},
            "value": "60"
        }))
        .unwrap();
        assert_eq!(line.currency, "EUR");
        assert_eq!(line.value, ExpenseValue::Text("60".into()));
        assert_eq!(line.item.unwrap()["icon"], "europe.svg");
    }

    #[test]
    fn missing_value_defaults_to_null() {
        let line: ExpenseLine = serde_json::from_value(json!({"currency": "USD"})).unwrap();
        assert_eq!(line.value, ExpenseValue::default());
        assert_eq!(line.value.amount(), 0.0);
    }

    #[test]
    fn item_omitted_when_absent() {
        let json = serde_json::to_value(ExpenseLine::new("USD", "5")).unwrap();
        assert_eq!(json, json!({"currency": "USD", "value": "5"}));
    }

    #[test]
    fn with_item() {
        let line = ExpenseLine::new("RON", "40").with_item(json!({"label": "RON"}));
        assert_eq!(line.item, Some(json!({"label": "RON"})));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Records
// ═══════════════════════════════════════════════════════════════════

mod records {
    use super::*;

    fn wire_record() -> serde_json::Value {
        json!({
            "asset": "ETH",
            "date": "2023-06-01T10:00:00.000Z",
            "formattedDate": "Jun 1",
            "spendingDetails": [{"currency": "USD", "value": "50"}],
            "assetDetails": {"icon": "eth", "iconHeight": 30}
        })
    }

    #[test]
    fn deserializes_camel_case() {
        let r: InvestmentRecord = serde_json::from_value(wire_record()).unwrap();
        assert_eq!(r.asset.as_deref(), Some("ETH"));
        assert_eq!(r.formatted_date.as_deref(), Some("Jun 1"));
        assert_eq!(r.spending_details.len(), 1);
        assert_eq!(r.asset_details.unwrap()["iconHeight"], 30);
    }

    #[test]
    fn missing_fields_default() {
        let r: InvestmentRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(r, InvestmentRecord::default());
        assert!(r.spending_details.is_empty());
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let r = InvestmentRecord {
            asset: Some("BTC".into()),
            ..InvestmentRecord::default()
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"asset": "BTC", "spendingDetails": []})
        );
    }

    #[test]
    fn timestamp_of_record() {
        let r: InvestmentRecord = serde_json::from_value(wire_record()).unwrap();
        assert_eq!(
            r.timestamp(),
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn stored_record_uses_underscore_id() {
        let stored = StoredRecord::new(InvestmentRecord::new("ETH", "2023-01-01"));
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["_id"], stored.id.to_string());
        assert_eq!(json["asset"], "ETH");

        let back: StoredRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn stored_record_into_record_drops_id() {
        let record = InvestmentRecord::new("ETH", "2023-01-01");
        let stored = StoredRecord::new(record.clone());
        assert_eq!(stored.into_record(), record);
    }

    #[test]
    fn projection_has_no_storage_id() {
        let stored = StoredRecord::new(serde_json::from_value(wire_record()).unwrap());
        let projected = ProjectedRecord::from(&stored.record);
        let json = serde_json::to_value(&projected).unwrap();
        assert!(json.get("_id").is_none());
        assert_eq!(json, wire_record());
    }

    #[test]
    fn distinct_ids() {
        let a = StoredRecord::new(InvestmentRecord::default());
        let b = StoredRecord::new(InvestmentRecord::default());
        assert_ne!(a.id, b.id);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  parse_timestamp
// ═══════════════════════════════════════════════════════════════════

mod timestamps {
    use super::*;

    #[test]
    fn rfc3339_with_offset() {
        assert_eq!(
            parse_timestamp("2023-06-01T12:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn naive_date_time_is_utc() {
        assert_eq!(
            parse_timestamp("2023-06-01T08:30:00"),
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn plain_date_is_midnight() {
        assert_eq!(
            parse_timestamp("2023-01-01"),
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("Jun 1"), None);
        assert_eq!(parse_timestamp("2023-13-01"), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CurrencyTotals / ExpensesByAsset
// ═══════════════════════════════════════════════════════════════════

mod totals {
    use super::*;

    #[test]
    fn absent_currency_is_none_not_zero() {
        let totals = CurrencyTotals::new();
        assert_eq!(totals.get("USD"), None);
        assert!(totals.is_empty());
    }

    #[test]
    fn serializes_in_first_occurrence_order() {
        let mut totals = CurrencyTotals::new();
        totals.add("USD", 1.0);
        totals.add("EUR", 2.0);
        totals.add("USD", 3.0);
        assert_eq!(serde_json::to_string(&totals).unwrap(), r#"{"USD":4.0,"EUR":2.0}"#);
    }

    #[test]
    fn deserializes_from_object() {
        let totals: CurrencyTotals = serde_json::from_str(r#"{"RON":40,"EUR":60.5}"#).unwrap();
        let keys: Vec<_> = totals.currencies().collect();
        assert_eq!(keys, vec!["RON", "EUR"]);
        assert_eq!(totals.get("EUR"), Some(60.5));
    }

    #[test]
    fn merge_adds_and_appends() {
        let mut a = CurrencyTotals::new();
        a.add("USD", 1.0);
        let mut b = CurrencyTotals::new();
        b.add("EUR", 2.0);
        b.add("USD", 4.0);
        a.merge(&b);
        assert_eq!(a.get("USD"), Some(5.0));
        assert_eq!(a.get("EUR"), Some(2.0));
        assert_eq!(a.currencies().collect::<Vec<_>>(), vec!["USD", "EUR"]);
    }

    #[test]
    fn by_asset_lowercases_keys_and_lookups() {
        let mut by_asset = ExpensesByAsset::new();
        by_asset.add("ETH", "USD", 10.0);
        by_asset.add("Eth", "USD", 5.0);
        assert_eq!(by_asset.len(), 1);
        assert_eq!(by_asset.get("eTh").unwrap().get("USD"), Some(15.0));
        assert_eq!(
            serde_json::to_value(&by_asset).unwrap(),
            json!({"eth": {"USD": 15.0}})
        );
    }

    #[test]
    fn asset_summary_omits_missing_dates() {
        let summary = AssetSummary {
            asset: "ETH".into(),
            last_invested: None,
            date: None,
            expenses: CurrencyTotals::new(),
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"asset": "ETH", "expenses": {}})
        );
    }
}
