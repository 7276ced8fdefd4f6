//! Users section: role mix, recent registrations and retention figures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use super::chart::{
    build_charts, Chart, ChartData, ChartFactory, ChartKind, ChartMap, DataPoint,
};
use super::metrics;
use super::section::{QueryContext, Section, StatCard, UserStats};
use super::{EngineError, TRAILING_WINDOW_DAYS};
use crate::store::QueryError;

pub const NAME: &str = "users";

/// Days covered by the registrations series.
const REGISTRATION_WINDOW_DAYS: u32 = 7;

/// Registrations per day for the last week, oldest first, ending today.
async fn registration_series(ctx: &QueryContext) -> Result<Vec<(NaiveDate, i64)>, QueryError> {
    let today = ctx.now().date_naive();
    let since = metrics::window_start(today, REGISTRATION_WINDOW_DAYS);
    let rows = ctx.store.registrations_since(since).await?;
    Ok(metrics::daily_series(
        rows.into_iter().map(|row| (row.day, row.count)),
        today,
        REGISTRATION_WINDOW_DAYS,
    ))
}

/// User count per role, as raw counts.
pub struct RolePie {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for RolePie {
    fn kind(&self) -> ChartKind {
        ChartKind::Pie
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        let groups = self.ctx.store.users_by_role().await?;
        Ok(ChartData::Series(metrics::raw_counts(&groups)))
    }
}

/// Daily registrations over the last week, labelled by weekday.
pub struct RegistrationsLine {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for RegistrationsLine {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        let series = registration_series(&self.ctx).await?;
        Ok(ChartData::Series(
            series
                .into_iter()
                .map(|(day, count)| DataPoint {
                    name: day.format("%a").to_string(),
                    value: count as f64,
                })
                .collect(),
        ))
    }
}

pub struct UserTable {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for UserTable {
    fn kind(&self) -> ChartKind {
        ChartKind::Table
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        Ok(ChartData::Rows(self.ctx.store.user_rows().await?))
    }
}

pub struct UsersChartFactory {
    ctx: QueryContext,
}

impl ChartFactory for UsersChartFactory {
    fn section(&self) -> &'static str {
        NAME
    }

    fn create_pie_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(RolePie {
            ctx: self.ctx.clone(),
        }))
    }

    fn create_line_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(RegistrationsLine {
            ctx: self.ctx.clone(),
        }))
    }

    fn create_table(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(UserTable {
            ctx: self.ctx.clone(),
        }))
    }
}

pub struct UsersSection {
    ctx: QueryContext,
    charts: ChartMap,
}

impl UsersSection {
    pub fn new(ctx: QueryContext) -> Result<Self, EngineError> {
        let factory = UsersChartFactory { ctx: ctx.clone() };
        let charts = build_charts(
            &factory,
            &[ChartKind::Pie, ChartKind::Line, ChartKind::Table],
        )?;
        Ok(Self { ctx, charts })
    }
}

#[async_trait]
impl Section for UsersSection {
    fn name(&self) -> &'static str {
        NAME
    }

    fn charts(&self) -> &ChartMap {
        &self.charts
    }

    fn has_stat_card(&self) -> bool {
        true
    }

    async fn stat_card(&self) -> Result<StatCard, EngineError> {
        let store = self.ctx.store.as_ref();
        let active_since = self.ctx.now() - Duration::days(TRAILING_WINDOW_DAYS);

        let (total_users, series, active_users, converted) = tokio::try_join!(
            store.count_users(),
            registration_series(&self.ctx),
            store.count_active_users_since(active_since),
            store.count_converted_users(),
        )?;

        // The series is contiguous and ends on the current date, so its last
        // bucket is today even when nobody registered.
        let today_new_users = series.last().map_or(0, |(_, count)| *count);

        Ok(StatCard::Users(UserStats {
            total_users,
            today_new_users,
            active_users,
            churn_rate: metrics::churn_rate(converted, total_users),
        }))
    }
}
