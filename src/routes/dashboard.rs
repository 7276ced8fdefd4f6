//! Dashboard routes: section charts and stat cards.
//!
//! Bodies are the bare dataset or stat card; failures are `{"error": ...}`.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::DashboardError;
use crate::services::dashboard::{self, DashboardPayload, SectionSummary};
use crate::AppState;

/// GET /dashboard — sections with their chart names and stat-card flag.
pub async fn index(State(state): State<AppState>) -> Json<Vec<SectionSummary>> {
    Json(state.registry.summaries())
}

/// GET /dashboard/{section}/{chart} — chart dataset, or the stat card when
/// `chart` is `statcard`.
pub async fn show(
    State(state): State<AppState>,
    Path((section, chart)): Path<(String, String)>,
) -> Result<Json<DashboardPayload>, DashboardError> {
    tracing::debug!(%section, %chart, "Dashboard request");
    let payload = dashboard::fetch(&state.registry, &section, &chart).await?;
    Ok(Json(payload))
}
