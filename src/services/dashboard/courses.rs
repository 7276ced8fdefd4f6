//! Courses section: the course catalogue as a table.

use std::sync::Arc;

use async_trait::async_trait;

use super::chart::{build_charts, Chart, ChartData, ChartFactory, ChartKind, ChartMap};
use super::section::{QueryContext, Section};
use super::EngineError;

pub const NAME: &str = "courses";

pub struct CourseTable {
    ctx: QueryContext,
}

#[async_trait]
impl Chart for CourseTable {
    fn kind(&self) -> ChartKind {
        ChartKind::Table
    }

    async fn fetch_data(&self) -> Result<ChartData, EngineError> {
        Ok(ChartData::Rows(self.ctx.store.course_rows().await?))
    }
}

pub struct CoursesChartFactory {
    ctx: QueryContext,
}

impl ChartFactory for CoursesChartFactory {
    fn section(&self) -> &'static str {
        NAME
    }

    fn create_table(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Ok(Arc::new(CourseTable {
            ctx: self.ctx.clone(),
        }))
    }
}

/// Catalogue section. It has no stat card.
pub struct CoursesSection {
    charts: ChartMap,
}

impl CoursesSection {
    pub fn new(ctx: QueryContext) -> Result<Self, EngineError> {
        let factory = CoursesChartFactory { ctx };
        let charts = build_charts(&factory, &[ChartKind::Table])?;
        Ok(Self { charts })
    }
}

#[async_trait]
impl Section for CoursesSection {
    fn name(&self) -> &'static str {
        NAME
    }

    fn charts(&self) -> &ChartMap {
        &self.charts
    }
}
