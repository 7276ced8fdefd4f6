//! Chart abstraction: what a chart produces and how factories build them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::EngineError;

/// One `{name, value}` entry of a category or time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub name: String,
    pub value: f64,
}

/// Sales total for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySales {
    pub name: String,
    pub sales: f64,
}

/// Dataset returned by a chart, serialized as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Series(Vec<DataPoint>),
    Weekdays(Vec<WeekdaySales>),
    Rows(Vec<Value>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            Self::Series(points) => points.len(),
            Self::Weekdays(days) => days.len(),
            Self::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chart kinds a factory may be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
    Table,
}

impl ChartKind {
    /// Chart name used in section chart maps and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dataset computed on demand from the aggregate store.
///
/// Implementations are read-only: repeated calls against an unchanged store
/// return the same dataset.
#[async_trait]
pub trait Chart: Send + Sync {
    fn kind(&self) -> ChartKind;

    async fn fetch_data(&self) -> Result<ChartData, EngineError>;
}

/// Chart name to chart, ordered by name.
pub type ChartMap = BTreeMap<&'static str, Arc<dyn Chart>>;

/// Builds the concrete charts of one section.
///
/// Every kind defaults to `UnsupportedChart`; factories override the kinds
/// their section can compute.
pub trait ChartFactory: Send + Sync {
    /// Name of the section this factory builds charts for.
    fn section(&self) -> &'static str;

    fn create_pie_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Err(unsupported(self.section(), ChartKind::Pie))
    }

    fn create_bar_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Err(unsupported(self.section(), ChartKind::Bar))
    }

    fn create_line_chart(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Err(unsupported(self.section(), ChartKind::Line))
    }

    fn create_table(&self) -> Result<Arc<dyn Chart>, EngineError> {
        Err(unsupported(self.section(), ChartKind::Table))
    }

    fn create(&self, kind: ChartKind) -> Result<Arc<dyn Chart>, EngineError> {
        match kind {
            ChartKind::Pie => self.create_pie_chart(),
            ChartKind::Bar => self.create_bar_chart(),
            ChartKind::Line => self.create_line_chart(),
            ChartKind::Table => self.create_table(),
        }
    }
}

fn unsupported(section: &'static str, kind: ChartKind) -> EngineError {
    EngineError::UnsupportedChart { section, kind }
}

/// Build a section's chart map, failing on the first kind the factory
/// cannot produce.
pub fn build_charts(
    factory: &dyn ChartFactory,
    kinds: &[ChartKind],
) -> Result<ChartMap, EngineError> {
    let mut charts = ChartMap::new();
    for &kind in kinds {
        let chart = factory.create(kind)?;
        if chart.kind() != kind {
            return Err(EngineError::Internal(format!(
                "{} factory returned a {} chart for {kind}",
                factory.section(),
                chart.kind()
            )));
        }
        charts.insert(kind.as_str(), chart);
    }
    Ok(charts)
}
