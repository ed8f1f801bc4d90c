//! Totals and chart buckets over a set of transactions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{TransactionKind, TransactionRecord};

/// `strftime` pattern for bucket labels, e.g. `Mar 2025`.
pub const BUCKET_LABEL_FORMAT: &str = "%b %Y";

/// Income and expense sums for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTotals {
    /// Month label in [`BUCKET_LABEL_FORMAT`].
    pub label: String,
    /// Sum of income amounts.
    pub income: f64,
    /// Sum of expense amounts.
    pub expense: f64,
}

impl BucketTotals {
    /// Returns `income - expense` for the bucket.
    #[inline]
    #[must_use]
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Total spent in one expense category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// Category label.
    pub category: String,
    /// Sum of expense amounts.
    pub amount: f64,
}

/// Derived totals over a set of transactions.
///
/// `buckets` and `category_breakdown` are in first-encounter order, so a
/// date-descending input yields newest-first buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Sum of all income amounts.
    pub total_income: f64,
    /// Sum of all expense amounts.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub net: f64,
    /// Per-month sums. Undated records are counted in the totals only.
    pub buckets: Vec<BucketTotals>,
    /// Per-category expense sums, excluding uncategorised entries.
    pub category_breakdown: Vec<CategoryTotal>,
}

impl AggregateResult {
    /// Looks up a bucket by its label.
    #[inline]
    #[must_use]
    pub fn bucket(&self, label: &str) -> Option<&BucketTotals> {
        self.buckets.iter().find(|bucket| bucket.label == label)
    }

    /// Looks up the expense total of a category.
    #[inline]
    #[must_use]
    pub fn category_total(&self, category: &str) -> Option<f64> {
        self.category_breakdown
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.amount)
    }
}

/// Formats the bucket label of an instant.
#[inline]
#[must_use]
pub fn bucket_label(instant: DateTime<Utc>) -> String {
    instant.format(BUCKET_LABEL_FORMAT).to_string()
}

/// Sums the given records in a single pass.
///
/// Malformed amounts count as zero (see
/// [`TransactionRecord::effective_amount`]).
#[must_use]
pub fn aggregate<'rec, I>(records: I) -> AggregateResult
where
    I: IntoIterator<Item = &'rec TransactionRecord>,
{
    let mut result = AggregateResult::default();
    let mut count = 0_usize;
    for record in records {
        count += 1;
        let amount = record.effective_amount();
        match record.kind {
            TransactionKind::Income => result.total_income += amount,
            TransactionKind::Expense => result.total_expense += amount,
        }
        if let Some(at) = record.occurred_at {
            add_to_bucket(&mut result.buckets, bucket_label(at), record.kind, amount);
        }
        if record.kind == TransactionKind::Expense
            && let Some(category) = record.expense_category()
        {
            add_to_category(&mut result.category_breakdown, category, amount);
        }
    }
    result.net = result.total_income - result.total_expense;
    tracing::debug!(
        records = count,
        buckets = result.buckets.len(),
        categories = result.category_breakdown.len(),
        "aggregated transactions"
    );
    result
}

/// Adds `amount` to the bucket named `label`, appending it if new.
fn add_to_bucket(
    buckets: &mut Vec<BucketTotals>,
    label: String,
    kind: TransactionKind,
    amount: f64,
) {
    let bucket = match buckets.iter().position(|bucket| bucket.label == label) {
        Some(index) => buckets.get_mut(index),
        None => {
            buckets.push(BucketTotals {
                label,
                income: 0.0,
                expense: 0.0,
            });
            buckets.last_mut()
        }
    };
    if let Some(bucket) = bucket {
        match kind {
            TransactionKind::Income => bucket.income += amount,
            TransactionKind::Expense => bucket.expense += amount,
        }
    }
}

/// Adds `amount` to `category`, appending it if new.
fn add_to_category(breakdown: &mut Vec<CategoryTotal>, category: &str, amount: f64) {
    let existing = breakdown
        .iter()
        .position(|entry| entry.category == category)
        .and_then(|index| breakdown.get_mut(index));
    match existing {
        Some(entry) => entry.amount += amount,
        None => breakdown.push(CategoryTotal {
            category: category.to_owned(),
            amount,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone as _};

    use crate::filter::{FilterSpec, filter};
    use crate::models::TransactionId;
    use crate::period::Period;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap()
    }

    /// Creates a test record.
    fn record(
        id: &str,
        kind: TransactionKind,
        amount: f64,
        category: Option<&str>,
        occurred_at: Option<DateTime<Utc>>,
    ) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId::from(id),
            amount,
            kind,
            category: category.map(ToOwned::to_owned),
            description: format!("{id} entry"),
            occurred_at,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn june_scenario() {
        let records = vec![
            record(
                "pay",
                TransactionKind::Income,
                1000.0,
                None,
                Some(at(2025, 6, 1)),
            ),
            record(
                "shop",
                TransactionKind::Expense,
                300.0,
                Some("Groceries"),
                Some(at(2025, 6, 2)),
            ),
            record(
                "old-shop",
                TransactionKind::Expense,
                50.0,
                Some("Groceries"),
                Some(at(2025, 5, 15)),
            ),
        ];
        let spec = FilterSpec::for_period(Period::Monthly, at(2025, 6, 18));
        let matched = filter(&records, &spec);
        let matched_ids: Vec<&str> = matched.iter().map(|r| r.id.as_inner()).collect();
        assert_eq!(matched_ids, ["pay", "shop"]);

        let result = aggregate(matched);
        assert_close(result.total_income, 1000.0);
        assert_close(result.total_expense, 300.0);
        assert_close(result.net, 700.0);
        assert_eq!(result.category_breakdown.len(), 1);
        assert_close(result.category_total("Groceries").unwrap(), 300.0);
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let records: Vec<TransactionRecord> = Vec::new();
        let result = aggregate(&records);
        assert_eq!(result, AggregateResult::default());
    }

    #[test]
    fn net_is_income_minus_expense() {
        let records = vec![
            record("a", TransactionKind::Income, 12.25, None, None),
            record("b", TransactionKind::Expense, 40.5, Some("Bills"), None),
            record("c", TransactionKind::Income, 3.0, None, Some(at(2024, 1, 2))),
        ];
        let result = aggregate(&records);
        assert_close(result.net, result.total_income - result.total_expense);
        assert_close(result.net, -25.25);
    }

    #[test]
    fn buckets_follow_first_encounter_order() {
        let records = vec![
            record("1", TransactionKind::Expense, 5.0, None, Some(at(2025, 3, 20))),
            record("2", TransactionKind::Income, 7.0, None, Some(at(2025, 1, 5))),
            record("3", TransactionKind::Expense, 1.0, None, Some(at(2025, 3, 1))),
            record("4", TransactionKind::Income, 2.0, None, Some(at(2024, 12, 31))),
            record("5", TransactionKind::Expense, 4.0, None, Some(at(2025, 2, 14))),
        ];
        let result = aggregate(&records);
        let labels: Vec<&str> = result.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Mar 2025", "Jan 2025", "Dec 2024", "Feb 2025"]);

        let march = result.bucket("Mar 2025").unwrap();
        assert_close(march.expense, 6.0);
        assert_close(march.income, 0.0);
        assert_close(march.net(), -6.0);
    }

    #[test]
    fn same_month_in_different_years_are_separate_buckets() {
        let records = vec![
            record("a", TransactionKind::Income, 1.0, None, Some(at(2025, 4, 1))),
            record("b", TransactionKind::Income, 1.0, None, Some(at(2024, 4, 1))),
        ];
        assert_eq!(aggregate(&records).buckets.len(), 2);
    }

    #[test]
    fn undated_records_count_in_totals_only() {
        let records = vec![record("a", TransactionKind::Income, 9.0, None, None)];
        let result = aggregate(&records);
        assert_close(result.total_income, 9.0);
        assert!(result.buckets.is_empty());
    }

    #[test]
    fn breakdown_skips_income_and_placeholder_categories() {
        let records = vec![
            record("a", TransactionKind::Expense, 10.0, Some("Pets"), None),
            record("b", TransactionKind::Expense, 20.0, Some("expense"), None),
            record("c", TransactionKind::Expense, 30.0, Some("income"), None),
            record("d", TransactionKind::Expense, 40.0, None, None),
            record("e", TransactionKind::Income, 50.0, Some("Pets"), None),
            record("f", TransactionKind::Expense, 5.0, Some("Tech"), None),
            record("g", TransactionKind::Expense, 1.0, Some("Pets"), None),
        ];
        let result = aggregate(&records);
        let categories: Vec<&str> = result
            .category_breakdown
            .iter()
            .map(|entry| entry.category.as_str())
            .collect();
        assert_eq!(categories, ["Pets", "Tech"]);
        assert_close(result.category_total("Pets").unwrap(), 11.0);
        assert_close(result.total_expense, 106.0);
    }

    #[test]
    fn non_finite_amounts_count_as_zero() {
        let records = vec![
            record("a", TransactionKind::Income, f64::NAN, None, Some(at(2025, 1, 1))),
            record("b", TransactionKind::Expense, f64::INFINITY, Some("Bills"), None),
            record("c", TransactionKind::Income, 4.0, None, None),
        ];
        let result = aggregate(&records);
        assert_close(result.total_income, 4.0);
        assert_close(result.total_expense, 0.0);
        assert_close(result.category_total("Bills").unwrap(), 0.0);
    }

    #[test]
    fn bucket_label_format() {
        let instant = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap()
            .and_utc();
        assert_eq!(bucket_label(instant), "Mar 2025");
    }

    #[test]
    fn result_serializes_for_charting() {
        let records = vec![record(
            "a",
            TransactionKind::Expense,
            2.5,
            Some("Gifts"),
            Some(at(2025, 12, 24)),
        )];
        let json = serde_json::to_value(aggregate(&records)).unwrap();
        assert_eq!(json["buckets"][0]["label"], "Dec 2025");
        assert_eq!(json["category_breakdown"][0]["category"], "Gifts");
    }
}
