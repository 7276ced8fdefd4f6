//! Overview section: platform-wide course mix and headline figures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use super::chart::{build_charts, Chart, ChartData, ChartFactory, ChartKind, ChartMap};
use super::metrics;
use super::section::{OverviewStats, QueryContext, Section, StatCard};
use super::{EngineError, TRAILING_WINDOW_DAYS};

pub const NAME: &str = "overview";

/// Number of courses shown in the best-sellers bar chart.
const TOP_COURSES_LIMIT: i64 = 5;

/// Share of courses per category, in percent.
pub struct CategorySharePie {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for CategorySharePie {
    fn kind(&self) -> ChartKind {
        ChartKind::Pie
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        let groups = self.ctx.store.courses_by_category().await?;
        Ok(ChartData::Series(metrics::percentage_shares(&groups)))
    }
}

/// Best-selling courses by number of sales.
pub struct TopCoursesBar {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for TopCoursesBar {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        let rows = self.ctx.store.top_courses_by_sales(TOP_COURSES_LIMIT).await?;
        Ok(ChartData::Series(metrics::raw_counts(&rows)))
    }
}

pub struct OverviewChartFactory {
    ctx: QueryContext,
}

impl ChartFactory for OverviewChartFactory {
    fn section(&self) -> &'static str {
        NAME
    }

    fn create_pie_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(CategorySharePie {
            ctx: self.ctx.clone(),
        }))
    }

    fn create_bar_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(TopCoursesBar {
            ctx: self.ctx.clone(),
        }))
    }
}

pub struct OverviewSection {
    ctx: QueryContext,
    charts: ChartMap,
}

impl OverviewSection {
    pub fn new(ctx: QueryContext) -> Result<Self, EngineError> {
        let factory = OverviewChartFactory { ctx: ctx.clone() };
        let charts = build_charts(&factory, &[ChartKind::Pie, ChartKind::Bar])?;
        Ok(Self { ctx, charts })
    }
}

#[async_trait]
impl Section for OverviewSection {
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
        let since = self.ctx.now() - Duration::days(TRAILING_WINDOW_DAYS);

        let (total_sales, new_users, total_courses, converted, total_users) = tokio::try_join!(
            store.count_sales(),
            store.count_users_since(since),
            store.count_courses(),
            store.count_converted_users(),
            store.count_users(),
        )?;

        Ok(StatCard::Overview(OverviewStats {
            total_sales,
            new_users,
            total_courses,
            conversion_rate: metrics::conversion_rate(converted, total_users),
        }))
    }
}
