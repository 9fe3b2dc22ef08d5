//! Aggregation analytics
//!
//! Pure computation over an in-memory snapshot of practice records:
//! window filtering, summary statistics, and the time-bucketed trend
//! series behind the analysis view. No I/O, no hidden state; calling
//! [`aggregate`] twice with the same inputs yields identical results.

use crate::range::{day_end, day_start, month_last, RangeSelector, ReportingWindow};
use crate::PracticeRecord;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel name reported when a category has no entries
pub const NO_CATEGORY: &str = "-";

/// A category label with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

impl CategoryCount {
    fn none() -> Self {
        Self {
            name: NO_CATEGORY.to_string(),
            count: 0,
        }
    }
}

/// Summary statistics over the filtered records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_minutes: u64,
    /// Total practice time in hours, rounded to one decimal place
    pub total_hours: f64,
    pub session_count: usize,
    /// Styles ranked by session count, descending; equal counts keep
    /// first-encountered order from the input collection
    pub style_breakdown: Vec<CategoryCount>,
    pub top_instructor: CategoryCount,
    pub top_studio: CategoryCount,
}

/// One contiguous sub-interval of the reporting window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Practiced time in unrounded hours; rounding is a display concern
    pub hours: f64,
}

/// Output of [`aggregate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub window: ReportingWindow,
    /// Records inside the window, ascending by `occurred_at`
    pub filtered: Vec<PracticeRecord>,
    pub stats: SummaryStats,
    pub trend: Vec<TrendBucket>,
}

/// Aggregate a record snapshot over a resolved reporting window.
///
/// Input order does not affect the result beyond the documented
/// tie-break: categories with equal counts rank in the order they were
/// first encountered in `records`.
pub fn aggregate(records: &[PracticeRecord], window: &ReportingWindow) -> AnalysisReport {
    let mut filtered: Vec<PracticeRecord> = records
        .iter()
        .filter(|r| window.contains(r.occurred_at))
        .cloned()
        .collect();

    // Summarize before sorting: the ranking tie-break is defined on
    // input collection order, not occurrence order
    let stats = summarize(&filtered);
    let trend = trend_series(&filtered, window);

    // Stable sort: per-day consumers enumerate ascending by time
    filtered.sort_by_key(|r| r.occurred_at);

    AnalysisReport {
        window: *window,
        filtered,
        stats,
        trend,
    }
}

fn summarize(filtered: &[PracticeRecord]) -> SummaryStats {
    let total_minutes: u64 = filtered.iter().map(|r| r.duration_minutes as u64).sum();
    let total_hours = (total_minutes as f64 / 60.0 * 10.0).round() / 10.0;

    let style_breakdown = rank_categories(filtered.iter().map(|r| r.style.as_str()));
    let top_instructor = top_category(filtered.iter().map(|r| r.instructor.as_str()));
    let top_studio = top_category(filtered.iter().map(|r| r.studio.as_str()));

    SummaryStats {
        total_minutes,
        total_hours,
        session_count: filtered.len(),
        style_breakdown,
        top_instructor,
        top_studio,
    }
}

/// Group labels by occurrence count, descending.
///
/// Counting keeps insertion order and the descending sort is stable,
/// so equal counts rank first-encountered first.
fn rank_categories<'a>(names: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for name in names {
        match index.get(name) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(name.to_string(), counts.len());
                counts.push(CategoryCount {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn top_category<'a>(names: impl Iterator<Item = &'a str>) -> CategoryCount {
    rank_categories(names)
        .into_iter()
        .next()
        .unwrap_or_else(CategoryCount::none)
}

/// Build the trend series for the window. Bucket granularity follows
/// the selector; buckets exist even when empty.
fn trend_series(filtered: &[PracticeRecord], window: &ReportingWindow) -> Vec<TrendBucket> {
    match window.selector {
        RangeSelector::Week => daily_buckets(filtered, window),
        RangeSelector::Month | RangeSelector::LastMonth => seven_day_buckets(filtered, window),
        RangeSelector::Year => monthly_buckets(filtered, window),
    }
}

/// One bucket per calendar day, Mon..Sun
fn daily_buckets(filtered: &[PracticeRecord], window: &ReportingWindow) -> Vec<TrendBucket> {
    let mut buckets = Vec::with_capacity(7);
    let mut day = window.start_date();
    while day <= window.end_date() {
        buckets.push(TrendBucket {
            label: day.format("%a").to_string(),
            start: day,
            end: day,
            hours: span_hours(filtered, day, day),
        });
        day += Duration::days(1);
    }
    buckets
}

/// Fixed 7-day chunks from the window start (day 1-7, 8-14, ...);
/// the final bucket is truncated to the window end
fn seven_day_buckets(filtered: &[PracticeRecord], window: &ReportingWindow) -> Vec<TrendBucket> {
    let mut buckets = Vec::new();
    let mut bucket_start = window.start_date();
    while bucket_start <= window.end_date() {
        let bucket_end = (bucket_start + Duration::days(6)).min(window.end_date());
        buckets.push(TrendBucket {
            label: format!(
                "{}/{}-{}/{}",
                bucket_start.month(),
                bucket_start.day(),
                bucket_end.month(),
                bucket_end.day()
            ),
            start: bucket_start,
            end: bucket_end,
            hours: span_hours(filtered, bucket_start, bucket_end),
        });
        bucket_start += Duration::days(7);
    }
    buckets
}

/// One bucket per calendar month, Jan..Dec
fn monthly_buckets(filtered: &[PracticeRecord], window: &ReportingWindow) -> Vec<TrendBucket> {
    let year = window.start_date().year();
    (1..=12)
        .map(|month| {
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let last = month_last(first);
            TrendBucket {
                label: first.format("%b").to_string(),
                start: first,
                end: last,
                hours: span_hours(filtered, first, last),
            }
        })
        .collect()
}

/// Sum of record hours within [start of `from`, end of `to`], unrounded
fn span_hours(filtered: &[PracticeRecord], from: NaiveDate, to: NaiveDate) -> f64 {
    let lo: NaiveDateTime = day_start(from);
    let hi: NaiveDateTime = day_end(to);
    let minutes: u64 = filtered
        .iter()
        .filter(|r| lo <= r.occurred_at && r.occurred_at <= hi)
        .map(|r| r.duration_minutes as u64)
        .sum();
    minutes as f64 / 60.0
}
