//! HTTP handlers for raw-material analysis endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reorder::ReorderAnalysisService;
use crate::AppState;
use crate::models::{AnalyzeRequest, ReorderAnalysis};

/// Analyze the raw-material stock snapshot against consumption history
pub async fn analyze_raw_materials(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<ReorderAnalysis>> {
    let service = ReorderAnalysisService::new(state.db);
    let analysis = service.analyze(request).await?;
    Ok(Json(analysis))
}
