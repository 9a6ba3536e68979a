use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expense::ExpenseLine;

/// A single investment: which asset, when, and what was spent in each currency.
///
/// Every field is optional at the type level because stored data is not
/// guaranteed to be complete. Operations that group by asset reject records
/// without one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    /// Asset identifier, case-sensitive as stored (e.g., "ETH")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,

    /// Raw date of the investment (RFC 3339 date-time or `YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Pre-formatted display date, never interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,

    /// Per-currency expense lines, in entry order
    #[serde(default)]
    pub spending_details: Vec<ExpenseLine>,

    /// Opaque asset metadata (icon, name, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_details: Option<serde_json::Value>,
}

impl InvestmentRecord {
    pub fn new(asset: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            asset: Some(asset.into()),
            date: Some(date.into()),
            ..Self::default()
        }
    }

    pub fn with_formatted_date(mut self, formatted_date: impl Into<String>) -> Self {
        self.formatted_date = Some(formatted_date.into());
        self
    }

    pub fn with_expense(mut self, line: ExpenseLine) -> Self {
        self.spending_details.push(line);
        self
    }

    pub fn with_asset_details(mut self, details: serde_json::Value) -> Self {
        self.asset_details = Some(details);
        self
    }

    /// The record's date as a UTC timestamp, if it can be parsed.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// A record as held by a record store, with its storage-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,

    #[serde(flatten)]
    pub record: InvestmentRecord,
}

impl StoredRecord {
    pub fn new(record: InvestmentRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
        }
    }

    /// Drop the storage identifier.
    pub fn into_record(self) -> InvestmentRecord {
        self.record
    }
}

/// The client-facing shape of a record: only the whitelisted fields,
/// storage identifiers stripped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,

    #[serde(default)]
    pub spending_details: Vec<ExpenseLine>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_details: Option<serde_json::Value>,
}

impl ProjectedRecord {
    /// The record's date as a UTC timestamp, if it can be parsed.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

impl From<&InvestmentRecord> for ProjectedRecord {
    fn from(record: &InvestmentRecord) -> Self {
        Self {
            date: record.date.clone(),
            formatted_date: record.formatted_date.clone(),
            spending_details: record.spending_details.clone(),
            asset: record.asset.clone(),
            asset_details: record.asset_details.clone(),
        }
    }
}

/// Parse a stored record date.
///
/// Accepts, in order: RFC 3339 (`2023-06-01T10:00:00Z`, any offset),
/// a naive date-time (`2023-06-01T10:00:00[.fff]`, read as UTC) and a plain
/// date (`2023-06-01`, midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
