//! Named date periods and the calendar ranges they resolve to.
//!
//! All calendar arithmetic happens on UTC days: a reference instant is
//! reduced to its UTC date before any range is computed, and the range
//! bounds are widened to whole UTC days when compared against record
//! timestamps.

use chrono::{DateTime, Datelike as _, Days, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Milliseconds in one calendar day.
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Named date-range shorthand used to scope a transaction view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    /// The reference day.
    #[default]
    Daily,
    /// The Sunday-based week containing the reference day.
    Weekly,
    /// The calendar month containing the reference day.
    Monthly,
    /// The calendar year containing the reference day.
    Yearly,
    /// Caller-supplied bounds; never resolved.
    Custom,
}

impl Period {
    /// Every period, in selector order.
    pub const ALL: [Self; 5] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Custom,
    ];

    /// Parses a period token (case-insensitive).
    ///
    /// Unrecognised tokens resolve to [`Period::Daily`], matching the
    /// selector's default.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|period| period.as_token().eq_ignore_ascii_case(token))
            .unwrap_or_else(|| {
                tracing::debug!(token = %token, "unrecognised period, using daily");
                Self::Daily
            })
    }

    /// Returns the canonical lowercase token.
    #[inline]
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }
}

impl core::fmt::Display for Period {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_token())
    }
}

impl Serialize for Period {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for Period {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}

/// A pair of calendar-day bounds.
///
/// When used to scope records, `start` counts from its first millisecond
/// and `end` through its last millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last bounding day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range from its two bounding days.
    #[inline]
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `instant` lies between the start of `start` and
    /// the end of `end`, both inclusive.
    #[inline]
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= start_of_day(self.start) && instant <= end_of_day(self.end)
    }
}

/// Returns 00:00:00.000 UTC of `date`.
#[inline]
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Returns 23:59:59.999 UTC of `date`.
#[inline]
#[must_use]
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + TimeDelta::milliseconds(MILLIS_PER_DAY - 1)
}

/// Resolves a named period against a reference instant.
///
/// - `Daily`: the reference day to the following day.
/// - `Weekly`: the Sunday on or before the reference day to seven days
///   later.
/// - `Monthly`: the first of the month to the first of the next month.
/// - `Yearly`: January 1 to January 1 of the next year.
///
/// Returns `None` for [`Period::Custom`], whose bounds come from the
/// caller, and when the range would leave the representable calendar.
#[must_use]
pub fn resolve(period: Period, reference: DateTime<Utc>) -> Option<DateRange> {
    let today = reference.date_naive();
    let start = match period {
        Period::Custom => return None,
        Period::Daily => today,
        Period::Weekly => {
            today.checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))?
        }
        Period::Monthly => today.with_day(1)?,
        Period::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
    };
    let end = match period {
        Period::Daily => start.checked_add_days(Days::new(1)),
        Period::Weekly => start.checked_add_days(Days::new(7)),
        Period::Monthly => start.checked_add_months(Months::new(1)),
        Period::Yearly => start.checked_add_months(Months::new(12)),
        Period::Custom => None,
    }?;
    Some(DateRange::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone as _;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn daily_covers_reference_day_to_next_day() {
        let range = resolve(Period::Daily, at(2025, 6, 18, 15)).unwrap();
        assert_eq!(range, DateRange::new(date(2025, 6, 18), date(2025, 6, 19)));
    }

    #[test]
    fn daily_rolls_over_month_and_year_end() {
        let range = resolve(Period::Daily, at(2024, 12, 31, 23)).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 12, 31), date(2025, 1, 1)));
    }

    #[test]
    fn weekly_starts_on_sunday() {
        // 2025-06-18 is a Wednesday.
        let range = resolve(Period::Weekly, at(2025, 6, 18, 9)).unwrap();
        assert_eq!(range, DateRange::new(date(2025, 6, 15), date(2025, 6, 22)));
    }

    #[test]
    fn weekly_on_sunday_starts_same_day() {
        let range = resolve(Period::Weekly, at(2025, 6, 15, 0)).unwrap();
        assert_eq!(range.start, date(2025, 6, 15));
    }

    #[test]
    fn weekly_on_saturday_crosses_month_boundary() {
        let range = resolve(Period::Weekly, at(2025, 3, 1, 12)).unwrap();
        assert_eq!(range, DateRange::new(date(2025, 2, 23), date(2025, 3, 2)));
    }

    #[test]
    fn monthly_spans_to_first_of_next_month() {
        let range = resolve(Period::Monthly, at(2025, 6, 18, 1)).unwrap();
        assert_eq!(range, DateRange::new(date(2025, 6, 1), date(2025, 7, 1)));

        let december = resolve(Period::Monthly, at(2025, 12, 31, 1)).unwrap();
        assert_eq!(december, DateRange::new(date(2025, 12, 1), date(2026, 1, 1)));
    }

    #[test]
    fn yearly_spans_to_next_new_year() {
        let range = resolve(Period::Yearly, at(2024, 2, 29, 1)).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 1, 1), date(2025, 1, 1)));
    }

    #[test]
    fn custom_is_not_resolved() {
        assert!(resolve(Period::Custom, at(2025, 6, 18, 1)).is_none());
    }

    #[test]
    fn unknown_token_falls_back_to_daily() {
        assert_eq!(Period::from_token("fortnightly"), Period::Daily);
        assert_eq!(Period::from_token(""), Period::Daily);
    }

    #[test]
    fn tokens_parse_case_insensitively() {
        assert_eq!(Period::from_token("Weekly"), Period::Weekly);
        assert_eq!(Period::from_token(" YEARLY "), Period::Yearly);
        for period in Period::ALL {
            assert_eq!(Period::from_token(period.as_token()), period);
        }
    }

    #[test]
    fn period_serde_uses_tokens_with_fallback() {
        let json = serde_json::to_string(&Period::Monthly).unwrap();
        assert_eq!(json, r#""monthly""#);
        let fallback: Period = serde_json::from_str(r#""hourly""#).unwrap();
        assert_eq!(fallback, Period::Daily);
    }

    #[test]
    fn range_contains_whole_bounding_days() {
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 30));
        assert!(range.contains(start_of_day(date(2025, 6, 1))));
        assert!(range.contains(end_of_day(date(2025, 6, 30))));
        assert!(!range.contains(start_of_day(date(2025, 6, 1)) - TimeDelta::milliseconds(1)));
        assert!(!range.contains(end_of_day(date(2025, 6, 30)) + TimeDelta::milliseconds(1)));
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let end = end_of_day(date(2025, 6, 30));
        assert_eq!(end + TimeDelta::milliseconds(1), start_of_day(date(2025, 7, 1)));
    }
}
