//! Report archive endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::{ApiResponse, ReportListItem, SavedReport};

use crate::{error::AppError, state::AppState};

/// List saved reports, newest first
/// GET /api/reports
pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ReportListItem>>>, AppError> {
    let items = state.reports.list_reports().await?;
    Ok(Json(ApiResponse::ok(items)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReportRequest {
    pub name: String,
    pub room_code: String,
    #[serde(default)]
    pub saved_by: Option<String>,
}

/// Archive a room snapshot as a named report
/// POST /api/reports
pub async fn save_report(
    State(state): State<AppState>,
    Json(req): Json<SaveReportRequest>,
) -> Result<Json<ApiResponse<SavedReport>>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Report name is required".to_string(),
        ));
    }
    if req.room_code.trim().is_empty() {
        return Err(AppError::Validation("Room code is required".to_string()));
    }
    let saved_by = req.saved_by.as_deref().unwrap_or("Admin");
    let report = state
        .reports
        .save_report(&req.room_code, req.name.trim(), saved_by)
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// Fetch one report with per-ticket detail
/// GET /api/reports/:id
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SavedReport>>, AppError> {
    let report = state.reports.get_report(&id).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// Delete a report; deleting an unknown id succeeds quietly
/// DELETE /api/reports/:id
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, AppError> {
    state.reports.delete_report(&id).await?;
    Ok(Json(ApiResponse::ok(true)))
}
