//! Multi-predicate transaction filtering.
//!
//! A [`FilterSpec`] carries the current selection of the transaction view
//! (period, date bounds, category selector and search text) as an explicit
//! value. [`filter`] applies it to a snapshot of records and returns the
//! matching records in their original order.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{TransactionKind, TransactionRecord};
use crate::period::{self, Period};

/// Category selector with two modes.
///
/// The kind labels select by transaction kind; any other label selects by
/// exact category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Matches every record of the given kind.
    Kind(TransactionKind),
    /// Matches records whose category equals the label exactly.
    Label(String),
}

impl CategoryFilter {
    /// Parses a selector value. An empty value means "all categories" and
    /// yields `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Some(
            TransactionKind::from_label(text)
                .map_or_else(|| Self::Label(text.to_owned()), Self::Kind),
        )
    }

    /// Returns the selector value as shown to the user.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kind(kind) => kind.label(),
            Self::Label(label) => label,
        }
    }

    /// Returns `true` if the record passes this selector.
    #[inline]
    #[must_use]
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            Self::Kind(kind) => record.kind == *kind,
            Self::Label(label) => record.category.as_deref() == Some(label.as_str()),
        }
    }
}

impl core::fmt::Display for CategoryFilter {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composable selection for a transaction view.
///
/// All set criteria are combined; an unset criterion always passes.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone as _, Utc};
/// use pocket_ledger::filter::FilterSpec;
/// use pocket_ledger::period::Period;
///
/// let today = Utc.with_ymd_and_hms(2025, 6, 18, 12, 0, 0).unwrap();
/// let spec = FilterSpec::for_period(Period::Monthly, today)
///     .category("Groceries")
///     .search("market");
///
/// assert_eq!(spec.period, Period::Monthly);
/// assert!(spec.start.is_some());
/// assert!(!spec.is_unconstrained());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Active period. Informational once `start`/`end` are set.
    pub period: Period,
    /// First day to include (from its first millisecond).
    pub start: Option<NaiveDate>,
    /// Last day to include (through its last millisecond).
    pub end: Option<NaiveDate>,
    /// Kind or category selector.
    pub category: Option<CategoryFilter>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
}

impl FilterSpec {
    /// Creates an empty filter that matches all transactions.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter scoped to `period` around `reference`.
    #[inline]
    #[must_use]
    pub fn for_period(period: Period, reference: DateTime<Utc>) -> Self {
        Self::new().period(period, reference)
    }

    /// Returns the default view: today's transactions, all categories, no
    /// search text.
    #[inline]
    #[must_use]
    pub fn reset(reference: DateTime<Utc>) -> Self {
        Self::for_period(Period::Daily, reference)
    }

    /// Switches to `period`, re-resolving the date bounds from
    /// `reference`. Switching to [`Period::Custom`] keeps the current
    /// bounds.
    #[must_use]
    pub fn period(mut self, period: Period, reference: DateTime<Utc>) -> Self {
        self.period = period;
        if let Some(range) = period::resolve(period, reference) {
            self.start = Some(range.start);
            self.end = Some(range.end);
        }
        self
    }

    /// Restricts to the given days (inclusive) and marks the period as
    /// custom.
    #[inline]
    #[must_use]
    pub const fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.period = Period::Custom;
        self.start = Some(from);
        self.end = Some(to);
        self
    }

    /// Sets the first included day and marks the period as custom.
    #[inline]
    #[must_use]
    pub const fn start_date(mut self, from: NaiveDate) -> Self {
        self.period = Period::Custom;
        self.start = Some(from);
        self
    }

    /// Sets the last included day and marks the period as custom.
    #[inline]
    #[must_use]
    pub const fn end_date(mut self, to: NaiveDate) -> Self {
        self.period = Period::Custom;
        self.end = Some(to);
        self
    }

    /// Sets the category selector from its textual value. An empty value
    /// clears it.
    #[inline]
    #[must_use]
    pub fn category(mut self, selector: &str) -> Self {
        self.category = CategoryFilter::parse(selector);
        self
    }

    /// Sets the description search text. An empty value clears it.
    #[inline]
    #[must_use]
    pub fn search<T: Into<String>>(mut self, text: T) -> Self {
        let text = text.into();
        self.search = (!text.is_empty()).then_some(text);
        self
    }

    /// Returns `true` when no date bound, category or search text is set.
    #[inline]
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.category.is_none()
            && self.search.is_none()
    }

    /// Returns `true` if the record satisfies all set criteria.
    #[inline]
    #[must_use]
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        Matcher::new(self).matches(record)
    }

    /// Describes a filtered view of `count` records, or `None` when
    /// nothing is filtered.
    #[inline]
    #[must_use]
    pub const fn summary(&self, count: usize) -> Option<FilterSummary<'_>> {
        if self.is_unconstrained() {
            None
        } else {
            Some(FilterSummary { count, spec: self })
        }
    }
}

/// Predicates of a [`FilterSpec`] prepared for repeated evaluation.
struct Matcher<'spec> {
    /// Lower bound, floored to the start of the day.
    from: Option<DateTime<Utc>>,
    /// Upper bound, raised to the end of the day.
    to: Option<DateTime<Utc>>,
    /// Category selector.
    category: Option<&'spec CategoryFilter>,
    /// Lowercased search text.
    needle: Option<String>,
}

impl<'spec> Matcher<'spec> {
    /// Prepares the predicates of `spec`.
    fn new(spec: &'spec FilterSpec) -> Self {
        Self {
            from: spec.start.map(period::start_of_day),
            to: spec.end.map(period::end_of_day),
            category: spec.category.as_ref(),
            needle: spec.search.as_deref().map(str::to_lowercase),
        }
    }

    /// Checks every predicate.
    fn matches(&self, record: &TransactionRecord) -> bool {
        self.matches_date(record) && self.matches_category(record) && self.matches_search(record)
    }

    /// Checks date bounds. Undated records never pass a bounded range.
    fn matches_date(&self, record: &TransactionRecord) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        record.occurred_at.is_some_and(|at| {
            self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
        })
    }

    /// Checks the category selector.
    fn matches_category(&self, record: &TransactionRecord) -> bool {
        self.category
            .is_none_or(|selector| selector.matches(record))
    }

    /// Checks the description search.
    fn matches_search(&self, record: &TransactionRecord) -> bool {
        self.needle
            .as_deref()
            .is_none_or(|needle| record.description.to_lowercase().contains(needle))
    }
}

/// Returns the records matching `spec`, in input order.
///
/// An unconstrained filter returns every record.
#[must_use]
pub fn filter<'rec>(
    records: &'rec [TransactionRecord],
    spec: &FilterSpec,
) -> Vec<&'rec TransactionRecord> {
    if spec.is_unconstrained() {
        return records.iter().collect();
    }
    let matcher = Matcher::new(spec);
    let matched: Vec<&TransactionRecord> = records
        .iter()
        .filter(|record| matcher.matches(record))
        .collect();
    tracing::debug!(
        input = records.len(),
        matched = matched.len(),
        period = %spec.period,
        "filtered transactions"
    );
    matched
}

/// One-line description of a filtered view, e.g.
/// `Showing 3 transactions (monthly) in category: Groceries matching: "market"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary<'spec> {
    /// Number of records shown.
    count: usize,
    /// Selection that produced them.
    spec: &'spec FilterSpec,
}

impl FilterSummary<'_> {
    /// Returns the number of records shown.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

impl core::fmt::Display for FilterSummary<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Showing {} transactions", self.count)?;
        if self.spec.period != Period::Custom {
            write!(f, " ({})", self.spec.period)?;
        }
        if let Some(category) = self.spec.category.as_ref() {
            write!(f, " in category: {category}")?;
        }
        if let Some(search) = self.spec.search.as_deref() {
            write!(f, " matching: \"{search}\"")?;
        }
        Ok(())
    }
}
