//! HTTP handlers for production planning endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::production::ProductionPlanningService;
use crate::AppState;
use crate::models::{ComputePlanRequest, ProductionRun, ProductionRunDetail};

/// Compute a production plan and persist it as a labeled run
pub async fn compute_production_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ComputePlanRequest>,
) -> AppResult<Json<ProductionRunDetail>> {
    let service = ProductionPlanningService::new(state.db, state.config.planning.clone());
    let run = service
        .compute_and_persist(current_user.0.user_id, request)
        .await?;
    Ok(Json(run))
}

/// List persisted production runs, newest first
pub async fn list_production_runs(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductionRun>>> {
    let service = ProductionPlanningService::new(state.db, state.config.planning.clone());
    let runs = service.list_runs().await?;
    Ok(Json(runs))
}

/// Get one production run with its line items
pub async fn get_production_run(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(run_id): Path<Uuid>,
) -> AppResult<Json<ProductionRunDetail>> {
    let service = ProductionPlanningService::new(state.db, state.config.planning.clone());
    let run = service.get_run(run_id).await?;
    Ok(Json(run))
}
