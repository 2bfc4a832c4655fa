//! Route definitions for the Food Production Planning Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - production planning
        .nest("/planning/production", production_routes())
        // Protected routes - raw-material analysis
        .nest("/planning/raw-materials", raw_material_routes())
}

/// Production planning routes (protected)
fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/compute", post(handlers::compute_production_plan))
        .route("/runs", get(handlers::list_production_runs))
        .route("/runs/:run_id", get(handlers::get_production_run))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Raw-material analysis routes (protected)
fn raw_material_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(handlers::analyze_raw_materials))
        .route_layer(middleware::from_fn(auth_middleware))
}
