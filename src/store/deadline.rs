//! Per-query deadline enforcement for any aggregate store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{AnalyticsStore, QueryError};
use crate::models::analytics::{
    DailyAmount, DailyCount, GroupAmount, GroupCount, SalesTotals, WeekdayAmount,
};

/// Wraps a store so that every query fails with `QueryError::Timeout` once
/// the deadline elapses. The in-flight query future is dropped on expiry.
#[derive(Debug, Clone)]
pub struct DeadlineStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: AnalyticsStore> DeadlineStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn guard<T, F>(&self, query: &'static str, fut: F) -> Result<T, QueryError>
    where
        F: Future<Output = Result<T, QueryError>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let after_ms = self.timeout.as_millis();
                tracing::warn!(query, after_ms, "Aggregate query exceeded deadline");
                Err(QueryError::Timeout { query, after_ms })
            }
        }
    }
}

#[async_trait]
impl<S: AnalyticsStore> AnalyticsStore for DeadlineStore<S> {
    async fn courses_by_category(&self) -> Result<Vec<GroupCount>, QueryError> {
        self.guard("courses_by_category", self.inner.courses_by_category())
            .await
    }

    async fn top_courses_by_sales(&self, limit: i64) -> Result<Vec<GroupCount>, QueryError> {
        self.guard("top_courses_by_sales", self.inner.top_courses_by_sales(limit))
            .await
    }

    async fn course_rows(&self) -> Result<Vec<Value>, QueryError> {
        self.guard("course_rows", self.inner.course_rows()).await
    }

    async fn users_by_role(&self) -> Result<Vec<GroupCount>, QueryError> {
        self.guard("users_by_role", self.inner.users_by_role()).await
    }

    async fn registrations_since(&self, since: NaiveDate) -> Result<Vec<DailyCount>, QueryError> {
        self.guard("registrations_since", self.inner.registrations_since(since))
            .await
    }

    async fn user_rows(&self) -> Result<Vec<Value>, QueryError> {
        self.guard("user_rows", self.inner.user_rows()).await
    }

    async fn revenue_by_category(&self) -> Result<Vec<GroupAmount>, QueryError> {
        self.guard("revenue_by_category", self.inner.revenue_by_category())
            .await
    }

    async fn revenue_by_weekday_and_category(&self) -> Result<Vec<WeekdayAmount>, QueryError> {
        self.guard(
            "revenue_by_weekday_and_category",
            self.inner.revenue_by_weekday_and_category(),
        )
        .await
    }

    async fn revenue_by_day_since(&self, since: NaiveDate) -> Result<Vec<DailyAmount>, QueryError> {
        self.guard("revenue_by_day_since", self.inner.revenue_by_day_since(since))
            .await
    }

    async fn count_sales(&self) -> Result<i64, QueryError> {
        self.guard("count_sales", self.inner.count_sales()).await
    }

    async fn count_courses(&self) -> Result<i64, QueryError> {
        self.guard("count_courses", self.inner.count_courses()).await
    }

    async fn count_users(&self) -> Result<i64, QueryError> {
        self.guard("count_users", self.inner.count_users()).await
    }

    async fn count_users_since(&self, since: DateTime<Utc>) -> Result<i64, QueryError> {
        self.guard("count_users_since", self.inner.count_users_since(since))
            .await
    }

    async fn count_converted_users(&self) -> Result<i64, QueryError> {
        self.guard("count_converted_users", self.inner.count_converted_users())
            .await
    }

    async fn count_active_users_since(&self, since: DateTime<Utc>) -> Result<i64, QueryError> {
        self.guard(
            "count_active_users_since",
            self.inner.count_active_users_since(since),
        )
        .await
    }

    async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, QueryError> {
        self.guard("revenue_between", self.inner.revenue_between(from, to))
            .await
    }

    async fn sales_totals(&self) -> Result<SalesTotals, QueryError> {
        self.guard("sales_totals", self.inner.sales_totals()).await
    }
}
