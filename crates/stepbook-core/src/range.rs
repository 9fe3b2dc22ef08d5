//! Reporting range resolution
//!
//! Maps a symbolic range selector to a calendar-aligned reporting
//! window relative to a caller-supplied "now".

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Symbolic reporting range picked in the analysis view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeSelector {
    Week,
    Month,
    LastMonth,
    Year,
}

impl Default for RangeSelector {
    /// Month is the defensive default for anything unrecognized.
    fn default() -> Self {
        RangeSelector::Month
    }
}

impl RangeSelector {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "week" | "this-week" | "thisweek" => Some(RangeSelector::Week),
            "month" | "this-month" | "thismonth" => Some(RangeSelector::Month),
            "last-month" | "lastmonth" | "last_month" => Some(RangeSelector::LastMonth),
            "year" | "this-year" | "thisyear" => Some(RangeSelector::Year),
            _ => None,
        }
    }

    /// Human-readable period label, used in headings and coach prompts
    pub fn label(&self) -> &'static str {
        match self {
            RangeSelector::Week => "This Week",
            RangeSelector::Month => "This Month",
            RangeSelector::LastMonth => "Last Month",
            RangeSelector::Year => "This Year",
        }
    }

    /// Resolve the reporting window containing (or, for LastMonth,
    /// preceding) the calendar date of `now`.
    pub fn resolve(self, now: NaiveDateTime) -> ReportingWindow {
        let today = now.date();

        let (first, last) = match self {
            RangeSelector::Week => {
                // Week starts Monday regardless of locale
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (monday, monday + Duration::days(6))
            }
            RangeSelector::Month => (month_first(today), month_last(today)),
            RangeSelector::LastMonth => {
                // Last day of the previous month, rolling back across
                // the year boundary when now is in January
                let prev = month_first(today).pred_opt().unwrap();
                (month_first(prev), prev)
            }
            RangeSelector::Year => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap(),
            ),
        };

        ReportingWindow {
            start: day_start(first),
            end: day_end(last),
            selector: self,
        }
    }
}

/// Resolved reporting window, inclusive at both ends
///
/// Carries its selector because trend bucket granularity depends on
/// the selected range, not on record density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub selector: RangeSelector,
}

impl ReportingWindow {
    /// Whether an instant falls inside the window (boundaries included)
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }
}

pub(crate) fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub(crate) fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap()
}

pub(crate) fn month_first(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap()
}

pub(crate) fn month_last(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn week_starts_monday_ends_sunday() {
        // 2024-06-14 is a Friday
        let window = RangeSelector::Week.resolve(at(2024, 6, 14, 15, 30));
        assert_eq!(window.start, at(2024, 6, 10, 0, 0));
        assert_eq!(window.end, day_end(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()));
    }

    #[test]
    fn week_on_sunday_stays_in_same_week() {
        // 2024-06-16 is a Sunday; its week began Monday the 10th
        let window = RangeSelector::Week.resolve(at(2024, 6, 16, 9, 0));
        assert_eq!(window.start_date(), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(window.end_date(), NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
    }

    #[test]
    fn month_covers_full_calendar_month() {
        let window = RangeSelector::Month.resolve(at(2024, 2, 10, 12, 0));
        assert_eq!(window.start, at(2024, 2, 1, 0, 0));
        // 2024 is a leap year
        assert_eq!(window.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(window.end.time(), chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn last_month_rolls_back_across_year_boundary() {
        let window = RangeSelector::LastMonth.resolve(at(2024, 1, 15, 8, 0));
        assert_eq!(window.start, at(2023, 12, 1, 0, 0));
        assert_eq!(window.end_date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(window.end.time(), chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn year_covers_jan_through_dec() {
        let window = RangeSelector::Year.resolve(at(2024, 7, 4, 18, 0));
        assert_eq!(window.start, at(2024, 1, 1, 0, 0));
        assert_eq!(window.end_date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn windows_contain_now_and_are_non_empty() {
        let now = at(2024, 6, 14, 15, 30);
        for selector in [RangeSelector::Week, RangeSelector::Month, RangeSelector::Year] {
            let window = selector.resolve(now);
            assert!(window.start < window.end, "{selector:?}");
            assert!(window.contains(now), "{selector:?}");
        }
        // LastMonth never contains now, but is still non-empty
        let window = RangeSelector::LastMonth.resolve(now);
        assert!(window.start < window.end);
        assert!(!window.contains(now));
    }

    #[test]
    fn contains_is_inclusive_at_both_ends() {
        let window = RangeSelector::Month.resolve(at(2024, 3, 15, 0, 0));
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(window.start - Duration::seconds(1)));
        assert!(!window.contains(window.end + Duration::seconds(1)));
    }

    #[test]
    fn unknown_selector_string_falls_back_to_month() {
        assert_eq!(RangeSelector::parse("fortnight"), None);
        assert_eq!(
            RangeSelector::parse("fortnight").unwrap_or_default(),
            RangeSelector::Month
        );
        assert_eq!(RangeSelector::parse("LAST_MONTH"), Some(RangeSelector::LastMonth));
    }

    #[test]
    fn month_last_handles_december() {
        assert_eq!(
            month_last(NaiveDate::from_ymd_opt(2023, 12, 5).unwrap()),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }
}
