//! Read-only aggregate query interface consumed by the dashboard engine.
//!
//! Each method is one aggregate shape (group-by count, joined group-by sum,
//! weekday extraction, windowed sum, distinct count or plain projection).
//! Implementations never mutate the store.

pub mod deadline;
pub mod postgres;

#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::models::analytics::{
    DailyAmount, DailyCount, GroupAmount, GroupCount, SalesTotals, WeekdayAmount,
};

pub use deadline::DeadlineStore;
pub use postgres::PgStore;

/// Failure while executing an aggregate query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query {query} timed out after {after_ms}ms")]
    Timeout { query: &'static str, after_ms: u128 },

    #[error("Query {query} returned malformed data: {detail}")]
    Malformed { query: &'static str, detail: String },
}

/// Aggregate queries backing every dashboard chart and stat card.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Course count per category name.
    async fn courses_by_category(&self) -> Result<Vec<GroupCount>, QueryError>;

    /// Courses with the most sales, highest first.
    async fn top_courses_by_sales(&self, limit: i64) -> Result<Vec<GroupCount>, QueryError>;

    /// Every course row as an opaque JSON object.
    async fn course_rows(&self) -> Result<Vec<Value>, QueryError>;

    /// User count per role.
    async fn users_by_role(&self) -> Result<Vec<GroupCount>, QueryError>;

    /// Registrations per day for days on or after `since`. Days without
    /// registrations are absent.
    async fn registrations_since(&self, since: NaiveDate) -> Result<Vec<DailyCount>, QueryError>;

    /// Every user row as an opaque JSON object.
    async fn user_rows(&self) -> Result<Vec<Value>, QueryError>;

    /// Summed sale amount per course category.
    async fn revenue_by_category(&self) -> Result<Vec<GroupAmount>, QueryError>;

    /// Summed sale amount grouped by day of week and category.
    async fn revenue_by_weekday_and_category(&self) -> Result<Vec<WeekdayAmount>, QueryError>;

    /// Summed sale amount per day for days on or after `since`.
    async fn revenue_by_day_since(&self, since: NaiveDate) -> Result<Vec<DailyAmount>, QueryError>;

    async fn count_sales(&self) -> Result<i64, QueryError>;

    async fn count_courses(&self) -> Result<i64, QueryError>;

    async fn count_users(&self) -> Result<i64, QueryError>;

    /// Users registered at or after `since`.
    async fn count_users_since(&self, since: DateTime<Utc>) -> Result<i64, QueryError>;

    /// Distinct users with at least one purchase.
    async fn count_converted_users(&self) -> Result<i64, QueryError>;

    /// Users whose last activity is at or after `since`.
    async fn count_active_users_since(&self, since: DateTime<Utc>) -> Result<i64, QueryError>;

    /// Summed sale amount in the half-open window `[from, to)`.
    async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, QueryError>;

    async fn sales_totals(&self) -> Result<SalesTotals, QueryError>;
}
