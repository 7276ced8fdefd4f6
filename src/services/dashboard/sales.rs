//! Sales section: revenue by category, weekday and day, plus growth figures.
//!
//! Every monetary value is reported in major currency units.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use super::chart::{
    build_charts, Chart, ChartData, ChartFactory, ChartKind, ChartMap, DataPoint,
};
use super::metrics;
use super::section::{QueryContext, SalesStats, Section, StatCard};
use super::{EngineError, TRAILING_WINDOW_DAYS};
use crate::store::QueryError;

pub const NAME: &str = "sales";

/// Revenue per course category. Categories without sales are omitted.
pub struct CategoryRevenuePie {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for CategoryRevenuePie {
    fn kind(&self) -> ChartKind {
        ChartKind::Pie
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        let groups = self.ctx.store.revenue_by_category().await?;
        Ok(ChartData::Series(
            groups
                .into_iter()
                .map(|g| DataPoint {
                    name: g.name,
                    value: metrics::cents_to_units(g.amount_cents),
                })
                .collect(),
        ))
    }
}

/// Revenue per day of week, always Sun..Sat.
pub struct WeekdayRevenueBar {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for WeekdayRevenueBar {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        let rows = self.ctx.store.revenue_by_weekday_and_category().await?;
        let buckets = metrics::weekday_buckets(&rows).map_err(|weekday| QueryError::Malformed {
            query: "revenue_by_weekday_and_category",
            detail: format!("day of week {weekday} is outside 0..=6"),
        })?;
        Ok(ChartData::Weekdays(buckets))
    }
}

/// Revenue per day over the trailing window, labelled with ISO dates.
pub struct DailyRevenueLine {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for DailyRevenueLine {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        let today = self.ctx.now().date_naive();
        let days = TRAILING_WINDOW_DAYS as u32;
        let since = metrics::window_start(today, days);
        let rows = self.ctx.store.revenue_by_day_since(since).await?;
        let series = metrics::daily_series(
            rows.into_iter().map(|row| (row.day, row.amount_cents)),
            today,
            days,
        );
        Ok(ChartData::Series(
            series
                .into_iter()
                .map(|(day, cents)| DataPoint {
                    name: day.format("%Y-%m-%d").to_string(),
                    value: metrics::cents_to_units(cents),
                })
                .collect(),
        ))
    }
}

pub struct SalesChartFactory {
    ctx: QueryContext,
}

impl ChartFactory for SalesChartFactory {
    fn section(&self) -> &'static str {
        NAME
    }

    fn create_pie_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(CategoryRevenuePie {
            ctx: self.ctx.clone(),
        }))
    }

    fn create_bar_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(WeekdayRevenueBar {
            ctx: self.ctx.clone(),
        }))
    }

    fn create_line_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(DailyRevenueLine {
            ctx: self.ctx.clone(),
        }))
    }
}

pub struct SalesSection {
    ctx: QueryContext,
    charts: ChartMap,
}

impl SalesSection {
    pub fn new(ctx: QueryContext) -> Result<Self, EngineError> {
        let factory = SalesChartFactory { ctx: ctx.clone() };
        let charts = build_charts(&factory, &[ChartKind::Pie, ChartKind::Bar, ChartKind::Line])?;
        Ok(Self { ctx, charts })
    }
}

#[async_trait]
impl Section for SalesSection {
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
        let now = self.ctx.now();
        let window = Duration::days(TRAILING_WINDOW_DAYS);
        let current_start = now - window;
        let previous_start = current_start - window;

        let (totals, converted, total_users, current, previous) = tokio::try_join!(
            store.sales_totals(),
            store.count_converted_users(),
            store.count_users(),
            store.revenue_between(current_start, now),
            store.revenue_between(previous_start, current_start),
        )?;

        Ok(StatCard::Sales(SalesStats {
            total_revenue: metrics::cents_to_units(totals.revenue_cents),
            avg_order_value: metrics::average_order_value(totals),
            conversion_rate: metrics::conversion_rate(converted, total_users),
            sales_growth: metrics::growth_rate(current, previous),
        }))
    }
}
