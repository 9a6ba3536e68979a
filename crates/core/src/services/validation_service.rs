use crate::errors::CoreError;
use crate::models::record::InvestmentRecord;

/// Field names that sit next to currency totals in flattened response bodies.
pub const RESERVED_CURRENCIES: [&str; 2] = ["asset", "message"];

/// Checks new records before they reach a record store.
///
/// Stored data is aggregated leniently; this is the one place where a bad
/// record is refused, so that the problem goes back to the client that sent it.
pub struct ValidationService;

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Rules:
    /// - `asset` is present and not blank
    /// - `date` is present and parses as a date or date-time
    /// - every expense line names a currency, other than `asset` or `message`
    ///   in any case
    /// - no expense amount reads as a negative number
    ///
    /// Amounts that are not numeric at all are accepted; they count as zero.
    pub fn validate_new_record(&self, record: &InvestmentRecord) -> Result<(), CoreError> {
        match record.asset.as_deref() {
            Some(asset) if !asset.trim().is_empty() => {}
            _ => {
                return Err(CoreError::ValidationError(
                    "asset must not be empty".into(),
                ))
            }
        }

        let date = record
            .date
            .as_deref()
            .ok_or_else(|| CoreError::ValidationError("date is required".into()))?;
        if record.timestamp().is_none() {
            return Err(CoreError::ValidationError(format!(
                "date is not a valid date or date-time: {date}"
            )));
        }

        for (i, line) in record.spending_details.iter().enumerate() {
            if line.currency.trim().is_empty() {
                return Err(CoreError::ValidationError(format!(
                    "spending line {i}: currency must not be empty"
                )));
            }
            let currency = line.currency.trim();
            if RESERVED_CURRENCIES
                .iter()
                .any(|reserved| currency.eq_ignore_ascii_case(reserved))
            {
                return Err(CoreError::ValidationError(format!(
                    "spending line {i}: currency `{currency}` is a reserved name"
                )));
            }
            if line.value.as_f64().is_some_and(|v| v < 0.0) {
                return Err(CoreError::ValidationError(format!(
                    "spending line {i}: value must not be negative"
                )));
            }
        }

        Ok(())
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}
