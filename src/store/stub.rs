//! In-memory store with canned aggregate results for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{AnalyticsStore, QueryError};
use crate::models::analytics::{
    DailyAmount, DailyCount, GroupAmount, GroupCount, SalesTotals, WeekdayAmount,
};

/// Canned answers for every aggregate query. Queries named in `failing`
/// return a database error instead; queries named in `slow` sleep for their
/// own delay, all others for `delay`.
#[derive(Debug, Default)]
pub struct StubStore {
    pub courses_by_category: Vec<GroupCount>,
    pub top_courses: Vec<GroupCount>,
    pub course_rows: Vec<Value>,
    pub users_by_role: Vec<GroupCount>,
    pub registrations: Vec<DailyCount>,
    pub user_rows: Vec<Value>,
    pub revenue_by_category: Vec<GroupAmount>,
    pub revenue_by_weekday: Vec<WeekdayAmount>,
    pub revenue_by_day: Vec<DailyAmount>,
    pub sales: i64,
    pub courses: i64,
    pub users: i64,
    pub new_users: i64,
    pub converted_users: i64,
    pub active_users: i64,
    pub current_window_revenue: i64,
    pub previous_window_revenue: i64,
    pub now: DateTime<Utc>,
    pub totals: Option<SalesTotals>,
    pub delay: Option<Duration>,
    pub slow: HashMap<&'static str, Duration>,
    pub failing: HashSet<&'static str>,
    pub calls: AtomicUsize,
}

impl StubStore {
    pub fn failing(mut self, query: &'static str) -> Self {
        self.failing.insert(query);
        self
    }

    pub fn slow(mut self, query: &'static str, delay: Duration) -> Self {
        self.slow.insert(query, delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond<T: Send>(&self, query: &'static str, value: T) -> Result<T, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.slow.get(query).copied().or(self.delay) {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(query) {
            return Err(QueryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(value)
    }
}

#[async_trait]
impl AnalyticsStore for StubStore {
    async fn courses_by_category(&self) -> Result<Vec<GroupCount>, QueryError> {
        self.respond("courses_by_category", self.courses_by_category.clone())
            .await
    }

    async fn top_courses_by_sales(&self, limit: i64) -> Result<Vec<GroupCount>, QueryError> {
        let rows = self
            .top_courses
            .iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect();
        self.respond("top_courses_by_sales", rows).await
    }

    async fn course_rows(&self) -> Result<Vec<Value>, QueryError> {
        self.respond("course_rows", self.course_rows.clone()).await
    }

    async fn users_by_role(&self) -> Result<Vec<GroupCount>, QueryError> {
        self.respond("users_by_role", self.users_by_role.clone()).await
    }

    async fn registrations_since(&self, since: NaiveDate) -> Result<Vec<DailyCount>, QueryError> {
        let rows = self
            .registrations
            .iter()
            .filter(|row| row.day >= since)
            .cloned()
            .collect();
        self.respond("registrations_since", rows).await
    }

    async fn user_rows(&self) -> Result<Vec<Value>, QueryError> {
        self.respond("user_rows", self.user_rows.clone()).await
    }

    async fn revenue_by_category(&self) -> Result<Vec<GroupAmount>, QueryError> {
        self.respond("revenue_by_category", self.revenue_by_category.clone())
            .await
    }

    async fn revenue_by_weekday_and_category(&self) -> Result<Vec<WeekdayAmount>, QueryError> {
        self.respond(
            "revenue_by_weekday_and_category",
            self.revenue_by_weekday.clone(),
        )
        .await
    }

    async fn revenue_by_day_since(&self, since: NaiveDate) -> Result<Vec<DailyAmount>, QueryError> {
        let rows = self
            .revenue_by_day
            .iter()
            .filter(|row| row.day >= since)
            .cloned()
            .collect();
        self.respond("revenue_by_day_since", rows).await
    }

    async fn count_sales(&self) -> Result<i64, QueryError> {
        self.respond("count_sales", self.sales).await
    }

    async fn count_courses(&self) -> Result<i64, QueryError> {
        self.respond("count_courses", self.courses).await
    }

    async fn count_users(&self) -> Result<i64, QueryError> {
        self.respond("count_users", self.users).await
    }

    async fn count_users_since(&self, _since: DateTime<Utc>) -> Result<i64, QueryError> {
        self.respond("count_users_since", self.new_users).await
    }

    async fn count_converted_users(&self) -> Result<i64, QueryError> {
        self.respond("count_converted_users", self.converted_users)
            .await
    }

    async fn count_active_users_since(&self, _since: DateTime<Utc>) -> Result<i64, QueryError> {
        self.respond("count_active_users_since", self.active_users)
            .await
    }

    async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, QueryError> {
        // A window ending at `now` is the current one; anything earlier is
        // the previous window.
        debug_assert!(from < to);
        let value = if to >= self.now {
            self.current_window_revenue
        } else {
            self.previous_window_revenue
        };
        self.respond("revenue_between", value).await
    }

    async fn sales_totals(&self) -> Result<SalesTotals, QueryError> {
        let totals = self.totals.unwrap_or(SalesTotals {
            revenue_cents: 0,
            order_count: 0,
        });
        self.respond("sales_totals", totals).await
    }
}
