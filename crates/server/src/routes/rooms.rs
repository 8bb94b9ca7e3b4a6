//! Room endpoints. Wire-level validation happens here; the services assume
//! well-formed input and enforce state preconditions themselves.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::{ApiResponse, Room, SessionSummary, TicketUpload};

use crate::{error::AppError, state::AppState};

/// Vote values a participant may cast.
const VOTE_SCALE: [u32; 4] = [2, 4, 8, 16];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub admin_id: String,
    pub admin_name: String,
}

/// Create a new room
/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    if req.admin_id.is_empty() || req.admin_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Admin id and name are required".to_string(),
        ));
    }
    let room = state
        .rooms
        .create_room(&req.admin_id, req.admin_name.trim())
        .await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Fetch current room state (the polling endpoint)
/// GET /api/rooms/:code
pub async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.get_room(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    pub id: String,
    pub name: String,
}

/// Join a room, matching returning participants by name
/// POST /api/rooms/:code/join
pub async fn join_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    if req.id.is_empty() || req.name.trim().is_empty() {
        return Err(AppError::Validation(
            "User id and name are required".to_string(),
        ));
    }
    let room = state.rooms.join_room(&code, &req.id, &req.name).await?;
    Ok(Json(ApiResponse::ok(room)))
}

#[derive(Debug, Deserialize)]
pub struct UploadTicketsRequest {
    pub tickets: Vec<TicketUpload>,
}

/// Replace the room's ticket list
/// POST /api/rooms/:code/tickets
pub async fn upload_tickets(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<UploadTicketsRequest>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    if req.tickets.is_empty() {
        return Err(AppError::Validation(
            "At least one ticket is required".to_string(),
        ));
    }
    let room = state.rooms.upload_tickets(&code, req.tickets).await?;
    Ok(Json(ApiResponse::ok(room)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTicketsRequest {
    pub ticket_ids: Vec<String>,
}

/// Re-sequence tickets before planning starts
/// POST /api/rooms/:code/reorder
pub async fn reorder_tickets(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<ReorderTicketsRequest>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    if req.ticket_ids.is_empty() {
        return Err(AppError::Validation(
            "Ticket ids are required".to_string(),
        ));
    }
    let room = state
        .rooms
        .reorder_tickets(&code, &req.ticket_ids)
        .await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Freeze ticket order and begin voting
/// POST /api/rooms/:code/start
pub async fn start_planning(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.start_planning(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Advance to the next ticket
/// POST /api/rooms/:code/next
pub async fn next_ticket(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.next_ticket(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Step back to the previous ticket
/// POST /api/rooms/:code/prev
pub async fn prev_ticket(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.prev_ticket(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Pause the session
/// POST /api/rooms/:code/pause
pub async fn pause_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.pause(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Resume a paused session
/// POST /api/rooms/:code/resume
pub async fn resume_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.resume(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Complete the session
/// POST /api/rooms/:code/end
pub async fn end_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.end(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub voter_id: String,
    pub voter_name: String,
    pub value: u32,
}

/// Submit a vote on the current ticket
/// POST /api/rooms/:code/vote
pub async fn vote(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    if req.voter_id.is_empty() || req.voter_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Voter id and name are required".to_string(),
        ));
    }
    if !VOTE_SCALE.contains(&req.value) {
        return Err(AppError::Validation(
            "Vote value must be 2, 4, 8, or 16".to_string(),
        ));
    }
    let room = state
        .rooms
        .vote(&code, &req.voter_id, req.voter_name.trim(), req.value)
        .await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Reveal votes on the current ticket
/// POST /api/rooms/:code/reveal
pub async fn reveal(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.reveal(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Restart the current voting round
/// POST /api/rooms/:code/reset
pub async fn reset_votes(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.reset_votes(&code).await?;
    Ok(Json(ApiResponse::ok(room)))
}

#[derive(Debug, Deserialize)]
pub struct SetAgreedPointsRequest {
    pub points: f64,
}

/// Record the agreed estimate for the current ticket
/// POST /api/rooms/:code/agree
pub async fn set_agreed_points(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<SetAgreedPointsRequest>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    if !req.points.is_finite() || req.points < 0.0 {
        return Err(AppError::Validation(
            "Points must be a non-negative number".to_string(),
        ));
    }
    let room = state.rooms.set_agreed_points(&code, req.points).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// Grouped session summary with estimation totals
/// GET /api/rooms/:code/summary
pub async fn session_summary(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<SessionSummary>>, AppError> {
    let summary = state.rooms.session_summary(&code).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
