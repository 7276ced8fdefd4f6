//! Pure aggregate arithmetic behind the dashboard charts and stat cards.
//!
//! Rates are percentages in `0..=100` rounded to two decimals. Money leaves
//! this module in major currency units (the store keeps cents).

use chrono::{Duration, NaiveDate};

use super::chart::{DataPoint, WeekdaySales};
use crate::models::analytics::{GroupCount, SalesTotals, WeekdayAmount};

/// Short weekday labels indexed by `EXTRACT(DOW)`: 0 = Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a minor-unit amount to major units.
pub fn cents_to_units(cents: i64) -> f64 {
    round2(cents as f64 / 100.0)
}

/// Each group's share of the total count, as a percentage.
///
/// Returns an empty series when the total is zero.
pub fn percentage_shares(groups: &[GroupCount]) -> Vec<DataPoint> {
    let total: i64 = groups.iter().map(|g| g.count).sum();
    if total <= 0 {
        return Vec::new();
    }
    groups
        .iter()
        .map(|g| DataPoint {
            name: g.name.clone(),
            value: round2(100.0 * g.count as f64 / total as f64),
        })
        .collect()
}

/// Raw counts per group, in the order the store returned them.
pub fn raw_counts(groups: &[GroupCount]) -> Vec<DataPoint> {
    groups
        .iter()
        .map(|g| DataPoint {
            name: g.name.clone(),
            value: g.count as f64,
        })
        .collect()
}

/// `100 * converted / total`; zero when there is nobody to convert.
pub fn conversion_rate(converted: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(100.0 * converted as f64 / total as f64)
}

/// Share of users that never converted, as a percentage.
pub fn churn_rate(converted: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let not_converted = (total - converted).max(0);
    round2(100.0 * not_converted as f64 / total as f64)
}

/// Period-over-period growth in percent.
///
/// A previous period of zero yields 100 when anything was earned since,
/// and 0 otherwise.
pub fn growth_rate(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    round2(100.0 * (current - previous) as f64 / previous as f64)
}

/// Mean order amount in major units; zero without orders.
pub fn average_order_value(totals: SalesTotals) -> f64 {
    if totals.order_count <= 0 {
        return 0.0;
    }
    round2(totals.revenue_cents as f64 / totals.order_count as f64 / 100.0)
}

/// Accumulate weekday/category sums into a fixed Sun..Sat array.
///
/// Fails with the offending value if a row's weekday is outside `0..=6`.
pub fn weekday_buckets(rows: &[WeekdayAmount]) -> Result<Vec<WeekdaySales>, i32> {
    let mut cents = [0i64; 7];
    for row in rows {
        let idx = usize::try_from(row.weekday)
            .ok()
            .filter(|idx| *idx < cents.len())
            .ok_or(row.weekday)?;
        cents[idx] += row.amount_cents;
    }
    Ok(WEEKDAY_LABELS
        .iter()
        .zip(cents)
        .map(|(label, total)| WeekdaySales {
            name: (*label).to_string(),
            sales: cents_to_units(total),
        })
        .collect())
}

/// First day of a window of `days` calendar days ending on `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(i64::from(days.saturating_sub(1)))
}

/// Contiguous per-day totals for the `days` days ending on `today`.
///
/// Days missing from `rows` are zero; rows outside the window are ignored.
/// A zero-day window is empty.
pub fn daily_series<I>(rows: I, today: NaiveDate, days: u32) -> Vec<(NaiveDate, i64)>
where
    I: IntoIterator<Item = (NaiveDate, i64)>,
{
    if days == 0 {
        return Vec::new();
    }
    let start = window_start(today, days);
    let mut series: Vec<(NaiveDate, i64)> = (0..i64::from(days))
        .map(|offset| (start + Duration::days(offset), 0))
        .collect();
    for (day, value) in rows {
        if day < start || day > today {
            continue;
        }
        let idx = (day - start).num_days() as usize;
        series[idx].1 += value;
    }
    series
}
