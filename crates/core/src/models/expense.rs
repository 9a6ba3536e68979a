use serde::{Deserialize, Serialize};

/// Amount of an expense line, exactly as it was stored.
///
/// Clients send amounts either as JSON numbers or as decimal text
/// (`"60"`, `"12.50"`). Anything else is kept verbatim so the record can be
/// echoed back unchanged; it simply contributes nothing to totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpenseValue {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl Default for ExpenseValue {
    fn default() -> Self {
        ExpenseValue::Other(serde_json::Value::Null)
    }
}

impl ExpenseValue {
    /// The numeric value, if the stored amount can be read as one.
    ///
    /// Text is read the lenient way: leading whitespace is skipped and the
    /// longest decimal prefix is taken (`"7abc"` → 7). Non-finite results
    /// are rejected.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            ExpenseValue::Number(n) => n.as_f64(),
            ExpenseValue::Text(text) => parse_leading_decimal(text),
            ExpenseValue::Other(_) => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Contribution of this amount to a currency total: the numeric value,
    /// or `0.0` when it cannot be read.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.as_f64().unwrap_or(0.0)
    }
}

impl From<f64> for ExpenseValue {
    /// NaN and infinities have no JSON form and become `null`.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(ExpenseValue::Number)
            .unwrap_or_default()
    }
}

impl From<i64> for ExpenseValue {
    fn from(n: i64) -> Self {
        ExpenseValue::Number(n.into())
    }
}

impl From<&str> for ExpenseValue {
    fn from(s: &str) -> Self {
        ExpenseValue::Text(s.to_string())
    }
}

impl From<String> for ExpenseValue {
    fn from(s: String) -> Self {
        ExpenseValue::Text(s)
    }
}

/// One currency-denominated cost entry attached to an investment record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseLine {
    /// Currency code (e.g., "EUR", "RON"). Used as-is as a grouping key.
    #[serde(default)]
    pub currency: String,

    /// Amount spent in `currency`
    #[serde(default)]
    pub value: ExpenseValue,

    /// Display metadata (icon, label, ...), passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<serde_json::Value>,
}

impl ExpenseLine {
    pub fn new(currency: impl Into<String>, value: impl Into<ExpenseValue>) -> Self {
        Self {
            currency: currency.into(),
            value: value.into(),
            item: None,
        }
    }

    /// Attach display metadata to the line.
    pub fn with_item(mut self, item: serde_json::Value) -> Self {
        self.item = Some(item);
        self
    }
}

/// Read the longest decimal number at the start of `text`.
///
/// Grammar: optional sign, digits with an optional fractional part (at least
/// one digit overall), optional exponent. Returns `None` when no digits lead.
fn parse_leading_decimal(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_count = frac_end - (end + 1);
        if digit_count > 0 || frac_count > 0 {
            digit_count += frac_count;
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_decimal_prefixes() {
        assert_eq!(parse_leading_decimal("100"), Some(100.0));
        assert_eq!(parse_leading_decimal("  12.5"), Some(12.5));
        assert_eq!(parse_leading_decimal("7abc"), Some(7.0));
        assert_eq!(parse_leading_decimal("-3"), Some(-3.0));
        assert_eq!(parse_leading_decimal(".5"), Some(0.5));
        assert_eq!(parse_leading_decimal("5."), Some(5.0));
        assert_eq!(parse_leading_decimal("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_decimal("2e"), Some(2.0));
        assert_eq!(parse_leading_decimal("1,000"), Some(1.0));
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        assert_eq!(parse_leading_decimal(""), None);
        assert_eq!(parse_leading_decimal("abc"), None);
        assert_eq!(parse_leading_decimal("."), None);
        assert_eq!(parse_leading_decimal("-"), None);
        assert_eq!(parse_leading_decimal("Infinity"), None);
    }
}
