//! Pure aggregation over snapshots of expense and todo records.
//!
//! Every function here is deterministic given the input records and a
//! reference instant. Nothing in this module touches the database, so the
//! same engine backs the stats, trend, and summary endpoints, and could back
//! any client that needs the derived views.
//!
//! Totals use plain `f64` addition with no rounding; rounding is a display
//! concern. Category keys are the literal strings stored on the records, so
//! "Food" and "food" are distinct buckets.

use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Month, OffsetDateTime, Time, UtcOffset, macros::time};

use crate::{expense::Expense, todo::Todo};

/// The last instant of a day at the millisecond resolution stored for records.
const END_OF_DAY: Time = time!(23:59:59.999);

/// An inclusive timestamp interval used to bucket records for totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    /// The first instant inside the range.
    pub start: OffsetDateTime,
    /// The last instant inside the range.
    pub end: OffsetDateTime,
}

impl DateRange {
    /// Whether `datetime` falls within the range (both ends inclusive).
    pub fn contains(&self, datetime: OffsetDateTime) -> bool {
        datetime >= self.start && datetime <= self.end
    }
}

/// Totals for a set of expenses: the summed amount, the record count, and the
/// summed amount per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseAggregate {
    /// The sum of the amounts of all matching expenses.
    pub total: f64,
    /// The number of matching expenses.
    pub count: usize,
    /// The summed amount for each category label.
    pub by_category: HashMap<String, f64>,
}

/// One month in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Human readable month and year, e.g. "Mar 2024".
    pub label: String,
    /// The sum of expense amounts attributed to this calendar month.
    pub total: f64,
}

/// The aggregate view for a single day combining expenses and todos.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    /// The day being summarized as "YYYY-MM-DD".
    pub date: String,
    /// The sum of the amounts of the day's expenses.
    pub total_expenses: f64,
    /// The day's expense records in the order they were given.
    pub expenses: Vec<Expense>,
    /// The number of todos that are not done, over all todos regardless of date.
    pub pending_todos: usize,
}

/// Sum the expenses whose date falls within `range`.
///
/// An empty input (or a range matching nothing) yields a zero total, a zero
/// count, and an empty category map.
pub fn range_total(expenses: &[Expense], range: &DateRange) -> ExpenseAggregate {
    let mut total = 0.0;
    let mut count = 0;
    let mut by_category = HashMap::new();

    for expense in expenses {
        if range.contains(expense.date) {
            total += expense.amount;
            count += 1;
            *by_category.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
        }
    }

    ExpenseAggregate {
        total,
        count,
        by_category,
    }
}

/// Sum the expenses dated on `day` in the timezone given by `offset`.
pub fn daily_total(expenses: &[Expense], day: Date, offset: UtcOffset) -> ExpenseAggregate {
    range_total(expenses, &day_range(day, offset))
}

/// The inclusive range covering `day` from midnight to 23:59:59.999.
pub fn day_range(day: Date, offset: UtcOffset) -> DateRange {
    DateRange {
        start: day.with_time(Time::MIDNIGHT).assume_offset(offset),
        end: day.with_time(END_OF_DAY).assume_offset(offset),
    }
}

/// The inclusive range covering a calendar month from the first of the month
/// at midnight to the last day at 23:59:59.999.
pub fn month_range(year: i32, month: Month, offset: UtcOffset) -> Option<DateRange> {
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let last = Date::from_calendar_date(year, month, time::util::days_in_month(month, year)).ok()?;

    Some(DateRange {
        start: first.with_time(Time::MIDNIGHT).assume_offset(offset),
        end: last.with_time(END_OF_DAY).assume_offset(offset),
    })
}

/// The inclusive range covering a calendar year from January 1 at midnight to
/// December 31 at 23:59:59.999.
pub fn year_range(year: i32, offset: UtcOffset) -> Option<DateRange> {
    let first = Date::from_calendar_date(year, Month::January, 1).ok()?;
    let last = Date::from_calendar_date(year, Month::December, 31).ok()?;

    Some(DateRange {
        start: first.with_time(Time::MIDNIGHT).assume_offset(offset),
        end: last.with_time(END_OF_DAY).assume_offset(offset),
    })
}

/// Filter expenses down to a calendar month or year, capped at `limit` records.
///
/// With both `year` and `month`, keeps expenses within the calendar month.
/// With only `year`, keeps expenses within the full year. Without `year`, no
/// filtering is applied (the cap still is). A month outside 1-12 falls back
/// to the full-year range. Input order is preserved.
pub fn filter_by_year_month(
    expenses: &[Expense],
    year: Option<i32>,
    month: Option<u8>,
    limit: usize,
    offset: UtcOffset,
) -> Vec<Expense> {
    let range = match year {
        Some(year) => match month.and_then(|number| Month::try_from(number).ok()) {
            Some(month) => month_range(year, month, offset),
            None => year_range(year, offset),
        },
        None => None,
    };

    expenses
        .iter()
        .filter(|expense| {
            range
                .as_ref()
                .is_none_or(|range| range.contains(expense.date))
        })
        .take(limit)
        .cloned()
        .collect()
}

/// Total expenses for each of the trailing `months_back` calendar months
/// including the month containing `now`, oldest first.
///
/// Always returns exactly `months_back` entries; months with no expenses
/// report a total of 0. An expense is attributed to the bucket matching its
/// date's local calendar year and month exactly.
pub fn monthly_trend(
    expenses: &[Expense],
    months_back: usize,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Vec<TrendPoint> {
    let local_now = now.to_offset(offset);

    let mut months = Vec::with_capacity(months_back);
    let mut year = local_now.year();
    let mut month = local_now.month();

    for _ in 0..months_back {
        months.push((year, month));
        month = month.previous();
        if month == Month::December {
            year -= 1;
        }
    }
    months.reverse();

    let mut totals = vec![0.0; months.len()];

    for expense in expenses {
        let local_date = expense.date.to_offset(offset);
        let bucket = (local_date.year(), local_date.month());

        if let Some(index) = months.iter().position(|&entry| entry == bucket) {
            totals[index] += expense.amount;
        }
    }

    months
        .into_iter()
        .zip(totals)
        .map(|((year, month), total)| TrendPoint {
            label: format!("{} {}", month_abbreviation(month), year),
            total,
        })
        .collect()
}

/// Summarize the local day containing `now`: that day's expenses and total,
/// plus the global count of pending todos.
pub fn today_summary(
    expenses: &[Expense],
    todos: &[Todo],
    now: OffsetDateTime,
    offset: UtcOffset,
) -> TodaySummary {
    let today = now.to_offset(offset).date();
    let range = day_range(today, offset);

    let todays_expenses: Vec<Expense> = expenses
        .iter()
        .filter(|expense| range.contains(expense.date))
        .cloned()
        .collect();

    let total_expenses = todays_expenses.iter().map(|expense| expense.amount).sum();

    // The pending count is intentionally global; todos have no date filter.
    let pending_todos = todos.iter().filter(|todo| !todo.done).count();

    TodaySummary {
        date: format!(
            "{:04}-{:02}-{:02}",
            today.year(),
            u8::from(today.month()),
            today.day()
        ),
        total_expenses,
        expenses: todays_expenses,
        pending_todos,
    }
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
