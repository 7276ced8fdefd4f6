//! Reporting sections and their stat-card bundles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::chart::{Chart, ChartMap};
use super::EngineError;
use crate::store::AnalyticsStore;

/// Source of the current instant used for trailing windows.
pub type Clock = fn() -> DateTime<Utc>;

/// Store handle and clock shared by every chart of a section.
#[derive(Clone)]
pub struct QueryContext {
    pub store: Arc<dyn AnalyticsStore>,
    pub clock: Clock,
}

impl QueryContext {
    pub fn new(store: Arc<dyn AnalyticsStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Headline figures for the overview section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_sales: i64,
    pub new_users: i64,
    pub total_courses: i64,
    pub conversion_rate: f64,
}

/// Headline figures for the users section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    pub today_new_users: i64,
    pub active_users: i64,
    pub churn_rate: f64,
}

/// Headline figures for the sales section. Money is in major units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub conversion_rate: f64,
    pub sales_growth: f64,
}

/// Stat-card bundle, serialized as the section's flat record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatCard {
    Overview(OverviewStats),
    Users(UserStats),
    Sales(SalesStats),
}

/// A named reporting domain exposing charts and, optionally, a stat card.
#[async_trait]
pub trait Section: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every chart this section serves, keyed by chart name.
    fn charts(&self) -> &ChartMap;

    fn chart(&self, name: &str) -> Option<Arc<dyn Chart>> {
        self.charts().get(name).cloned()
    }

    fn has_stat_card(&self) -> bool {
        false
    }

    /// Compute the stat card. Every field is queried concurrently and the
    /// bundle is returned only if all of them succeed.
    async fn stat_card(&self) -> Result<StatCard, EngineError> {
        Err(EngineError::StatCardUnavailable(self.name().to_string()))
    }
}
