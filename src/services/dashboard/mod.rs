//! Dashboard analytics engine.
//!
//! A [`Registry`] maps section names to [`Section`]s. Each section builds its
//! charts through its own [`ChartFactory`] and may expose a stat card whose
//! fields are queried concurrently. Everything is recomputed per request from
//! the [`AnalyticsStore`]; nothing is cached here.

pub mod chart;
pub mod courses;
pub mod metrics;
pub mod overview;
pub mod registry;
pub mod sales;
pub mod section;
pub mod users;

use std::sync::Arc;

use chrono::Utc;

use crate::store::{AnalyticsStore, QueryError};

pub use chart::{Chart, ChartData, ChartFactory, ChartKind, ChartMap};
pub use registry::{Registry, SectionSummary};
pub use section::{Clock, QueryContext, Section, StatCard};

/// Chart name that routes to a section's stat card instead of its chart map.
pub const STAT_CARD: &str = "statcard";

/// Length in days of the trailing windows (new users, activity, growth).
pub const TRAILING_WINDOW_DAYS: i64 = 30;

/// Errors raised by the dashboard engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Chart {chart} not found in section {section}")]
    ChartNotFound { section: String, chart: String },

    #[error("Section {0} has no stat card")]
    StatCardUnavailable(String),

    #[error("{section} section cannot build a {kind} chart")]
    UnsupportedChart {
        section: &'static str,
        kind: ChartKind,
    },

    #[error("Section {0} is already registered")]
    DuplicateSection(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Build the registry with every dashboard section, using the wall clock.
pub fn build_registry(store: Arc<dyn AnalyticsStore>) -> Result<Registry, EngineError> {
    build_registry_with_clock(store, Utc::now)
}

/// Build the registry with every dashboard section.
///
/// Fails if any section asks its factory for a chart kind it cannot build
/// or if two sections share a name.
pub fn build_registry_with_clock(
    store: Arc<dyn AnalyticsStore>,
    clock: Clock,
) -> Result<Registry, EngineError> {
    let ctx = QueryContext::new(store, clock);
    let mut registry = Registry::new();

    registry.register(overview::NAME, Arc::new(overview::OverviewSection::new(ctx.clone())?))?;
    registry.register(courses::NAME, Arc::new(courses::CoursesSection::new(ctx.clone())?))?;
    registry.register(users::NAME, Arc::new(users::UsersSection::new(ctx.clone())?))?;
    registry.register(sales::NAME, Arc::new(sales::SalesSection::new(ctx)?))?;

    tracing::info!(sections = ?registry.names(), "Dashboard registry built");
    Ok(registry)
}

/// Compute a chart or, for [`STAT_CARD`], the stat card of a section.
///
/// Lookup failures come back as `SectionNotFound`, `ChartNotFound` or
/// `StatCardUnavailable`; query failures are returned unchanged.
pub async fn fetch(
    registry: &Registry,
    section_name: &str,
    chart_name: &str,
) -> Result<DashboardPayload, EngineError> {
    let section = registry
        .get(section_name)
        .ok_or_else(|| EngineError::SectionNotFound(section_name.to_string()))?;

    if chart_name == STAT_CARD {
        if !section.has_stat_card() {
            return Err(EngineError::StatCardUnavailable(section_name.to_string()));
        }
        return Ok(DashboardPayload::StatCard(section.stat_card().await?));
    }

    let chart = section
        .chart(chart_name)
        .ok_or_else(|| EngineError::ChartNotFound {
            section: section_name.to_string(),
            chart: chart_name.to_string(),
        })?;
    Ok(DashboardPayload::Chart(chart.fetch_data().await?))
}

/// Result of a dashboard request: a chart dataset or a stat-card bundle.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum DashboardPayload {
    Chart(ChartData),
    StatCard(StatCard),
}
