//! Route definitions for the dashboard API.

pub mod dashboard;
pub mod health;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router with all routes mounted.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET]),
        Err(e) => {
            tracing::warn!(
                error = %e,
                url = %state.config.frontend_url,
                "Invalid FRONTEND_URL, CORS disabled"
            );
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/dashboard", get(dashboard::index))
        .route("/dashboard/{section}/{chart}", get(dashboard::show))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
