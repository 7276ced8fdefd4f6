//! Row shapes returned by the aggregate queries behind the dashboard.
//!
//! Monetary columns are minor currency units (cents) exactly as stored.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// Row count for one group of a `GROUP BY` query.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct GroupCount {
    pub name: String,
    pub count: i64,
}

/// Summed amount for one group of a `GROUP BY` query.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct GroupAmount {
    pub name: String,
    pub amount_cents: i64,
}

/// Revenue grouped by day of week (0 = Sunday .. 6 = Saturday) and category.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WeekdayAmount {
    pub weekday: i32,
    pub category: String,
    pub amount_cents: i64,
}

/// Number of rows created on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Summed amount for a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DailyAmount {
    pub day: NaiveDate,
    pub amount_cents: i64,
}

/// Revenue and order count across all sales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, FromRow)]
pub struct SalesTotals {
    pub revenue_cents: i64,
    pub order_count: i64,
}
