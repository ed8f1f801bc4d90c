//! Transaction record model.
//!
//! Records arrive from a document store whose entries were written by
//! several generations of the entry form, so decoding is lenient: a
//! malformed amount reads as zero and an unreadable timestamp reads as
//! absent instead of failing the whole snapshot.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{TransactionId, TransactionKind};

/// A single income or expense entry.
///
/// Records are never mutated by the engine; filtering only collects
/// references to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTransactionRecord")]
pub struct TransactionRecord {
    /// Unique identifier.
    pub id: TransactionId,
    /// Non-negative magnitude of the transaction.
    pub amount: f64,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Expense category label. Legacy entries may carry the kind label
    /// (`"income"` / `"expense"`) here instead of a real category.
    pub category: Option<String>,
    /// Free-form description.
    pub description: String,
    /// When the transaction happened, if known.
    pub occurred_at: Option<DateTime<Utc>>,
}

impl TransactionRecord {
    /// Returns the amount used in sums: non-finite values count as zero.
    #[inline]
    #[must_use]
    pub const fn effective_amount(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount
        } else {
            0.0
        }
    }

    /// Returns the category when it names a real expense category, i.e.
    /// it is present, non-empty, and not one of the kind labels.
    #[inline]
    #[must_use]
    pub fn expense_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|label| !label.is_empty() && TransactionKind::from_label(label).is_none())
    }
}

/// Wire shape accepted when decoding a [`TransactionRecord`].
///
/// Also accepts the legacy document field names (`type_id`,
/// `category_id`, `transaction_date`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransactionRecord {
    /// Document identifier.
    id: TransactionId,
    /// Number, numeric string, or garbage.
    #[serde(default)]
    amount: Option<Value>,
    /// Kind label, possibly missing on legacy entries.
    #[serde(default, rename = "type", alias = "type_id")]
    kind: Option<Value>,
    /// Category label.
    #[serde(default, alias = "category_id")]
    category: Option<String>,
    /// Description text.
    #[serde(default)]
    description: Option<String>,
    /// RFC 3339 text, bare date, Unix milliseconds, or a
    /// `{seconds, nanoseconds}` timestamp object.
    #[serde(default, alias = "transaction_date")]
    occurred_at: Option<Value>,
}

impl From<RawTransactionRecord> for TransactionRecord {
    fn from(raw: RawTransactionRecord) -> Self {
        let amount = coerce_amount(raw.amount.as_ref()).unwrap_or_else(|| {
            tracing::warn!(id = %raw.id, "unreadable amount, counting it as zero");
            0.0
        });
        let category = raw.category;
        let kind = raw
            .kind
            .as_ref()
            .and_then(Value::as_str)
            .and_then(TransactionKind::from_label)
            .or_else(|| category.as_deref().and_then(TransactionKind::from_label))
            .unwrap_or_default();
        let occurred_at = raw.occurred_at.as_ref().and_then(coerce_timestamp);
        if occurred_at.is_none() {
            tracing::debug!(id = %raw.id, "transaction has no usable timestamp");
        }
        Self {
            id: raw.id,
            amount,
            kind,
            category,
            description: raw.description.unwrap_or_default(),
            occurred_at,
        }
    }
}

/// Reads an amount from a JSON number or numeric string.
///
/// Returns `None` when the value is missing or cannot be read as a finite
/// number. Negative values are taken as their magnitude.
fn coerce_amount(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|amount| amount.is_finite()).map(f64::abs)
}

/// Reads a timestamp from any of the accepted encodings.
fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_text(text.trim()),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(fields) => {
            let seconds = fields
                .get("seconds")
                .or_else(|| fields.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = fields
                .get("nanoseconds")
                .or_else(|| fields.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|nanos| u32::try_from(nanos).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos)
        }
        Value::Null | Value::Bool(_) | Value::Array(_) => None,
    }
}

/// Parses RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC),
/// or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
