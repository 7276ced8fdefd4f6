//! PostgreSQL implementation of the aggregate query interface.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;

use super::{AnalyticsStore, QueryError};
use crate::models::analytics::{
    DailyAmount, DailyCount, GroupAmount, GroupCount, SalesTotals, WeekdayAmount,
};

/// Aggregate queries issued against the platform's PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &'static str) -> Result<i64, QueryError> {
        let count = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn courses_by_category(&self) -> Result<Vec<GroupCount>, QueryError> {
        let rows = sqlx::query_as::<_, GroupCount>(
            r#"
            SELECT cat.name, COUNT(c.id) AS count
            FROM courses c
            INNER JOIN categories cat ON cat.id = c.category_id
            GROUP BY cat.name
            ORDER BY cat.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn top_courses_by_sales(&self, limit: i64) -> Result<Vec<GroupCount>, QueryError> {
        let rows = sqlx::query_as::<_, GroupCount>(
            r#"
            SELECT c.title AS name, COUNT(s.id) AS count
            FROM sales s
            INNER JOIN courses c ON c.id = s.course_id
            GROUP BY c.id, c.title
            ORDER BY COUNT(s.id) DESC, c.title
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn course_rows(&self) -> Result<Vec<Value>, QueryError> {
        let rows = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT to_jsonb(t)
            FROM (
                SELECT c.id, c.title, cat.name AS category, c.price_cents, c.published, c.created_at
                FROM courses c
                LEFT JOIN categories cat ON cat.id = c.category_id
            ) t
            ORDER BY t.created_at DESC, t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn users_by_role(&self) -> Result<Vec<GroupCount>, QueryError> {
        let rows = sqlx::query_as::<_, GroupCount>(
            "SELECT role AS name, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn registrations_since(&self, since: NaiveDate) -> Result<Vec<DailyCount>, QueryError> {
        let rows = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count
            FROM users
            WHERE (created_at AT TIME ZONE 'UTC')::date >= $1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn user_rows(&self) -> Result<Vec<Value>, QueryError> {
        let rows = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT to_jsonb(t)
            FROM (
                SELECT id, username, email, role, created_at, last_active_at
                FROM users
            ) t
            ORDER BY t.created_at DESC, t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn revenue_by_category(&self) -> Result<Vec<GroupAmount>, QueryError> {
        let rows = sqlx::query_as::<_, GroupAmount>(
            r#"
            SELECT cat.name, SUM(s.amount_cents)::BIGINT AS amount_cents
            FROM sales s
            INNER JOIN courses c ON c.id = s.course_id
            INNER JOIN categories cat ON cat.id = c.category_id
            GROUP BY cat.name
            ORDER BY cat.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn revenue_by_weekday_and_category(&self) -> Result<Vec<WeekdayAmount>, QueryError> {
        let rows = sqlx::query_as::<_, WeekdayAmount>(
            r#"
            SELECT
                EXTRACT(DOW FROM s.created_at AT TIME ZONE 'UTC')::INT AS weekday,
                cat.name AS category,
                SUM(s.amount_cents)::BIGINT AS amount_cents
            FROM sales s
            INNER JOIN courses c ON c.id = s.course_id
            INNER JOIN categories cat ON cat.id = c.category_id
            GROUP BY weekday, cat.name
            ORDER BY weekday, cat.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn revenue_by_day_since(&self, since: NaiveDate) -> Result<Vec<DailyAmount>, QueryError> {
        let rows = sqlx::query_as::<_, DailyAmount>(
            r#"
            SELECT
                (created_at AT TIME ZONE 'UTC')::date AS day,
                SUM(amount_cents)::BIGINT AS amount_cents
            FROM sales
            WHERE (created_at AT TIME ZONE 'UTC')::date >= $1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_sales(&self) -> Result<i64, QueryError> {
        self.count("SELECT COUNT(*) FROM sales").await
    }

    async fn count_courses(&self) -> Result<i64, QueryError> {
        self.count("SELECT COUNT(*) FROM courses").await
    }

    async fn count_users(&self) -> Result<i64, QueryError> {
        self.count("SELECT COUNT(*) FROM users").await
    }

    async fn count_users_since(&self, since: DateTime<Utc>) -> Result<i64, QueryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE created_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn count_converted_users(&self) -> Result<i64, QueryError> {
        self.count("SELECT COUNT(DISTINCT user_id) FROM sales").await
    }

    async fn count_active_users_since(&self, since: DateTime<Utc>) -> Result<i64, QueryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE last_active_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, QueryError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)::BIGINT
            FROM sales
            WHERE created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn sales_totals(&self) -> Result<SalesTotals, QueryError> {
        let totals = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT
                COALESCE(SUM(amount_cents), 0)::BIGINT AS revenue_cents,
                COUNT(*) AS order_count
            FROM sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }
}
