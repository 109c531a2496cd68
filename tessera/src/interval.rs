use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest span (in days) bucketed per day.
const DAY_MAX_SPAN: i64 = 31;
/// Widest span bucketed per week (about six months).
const WEEK_MAX_SPAN: i64 = 183;
/// Widest span bucketed per month (three years).
const MONTH_MAX_SPAN: i64 = 3 * 366;
/// Widest span bucketed per quarter (ten years).
const QUARTER_MAX_SPAN: i64 = 10 * 366;

/// Bucketing unit for date histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    /// Name understood by the search backend's `interval` option.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Day => "day",
            IntervalUnit::Week => "week",
            IntervalUnit::Month => "month",
            IntervalUnit::Quarter => "quarter",
            IntervalUnit::Year => "year",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick a histogram interval for the inclusive range `[from, to]`.
///
/// Wider spans never yield a finer unit. A reversed range degrades to
/// [`IntervalUnit::Year`].
pub fn compute_interval(from: NaiveDate, to: NaiveDate) -> IntervalUnit {
    let span = (to - from).num_days();

    if span < 0 {
        IntervalUnit::Year
    } else if span <= DAY_MAX_SPAN {
        IntervalUnit::Day
    } else if span <= WEEK_MAX_SPAN {
        IntervalUnit::Week
    } else if span <= MONTH_MAX_SPAN {
        IntervalUnit::Month
    } else if span <= QUARTER_MAX_SPAN {
        IntervalUnit::Quarter
    } else {
        IntervalUnit::Year
    }
}
