use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ApiResponse;
use thiserror::Error;

use crate::store::StoreError;

/// Failure kinds surfaced by the room and report services.
///
/// Every operation returns one of these as a value; a failed operation
/// never persists a partially mutated room.
#[derive(Debug, Error)]
pub enum AppError {
    /// Room code or report id does not resolve in the store.
    #[error("{0}")]
    NotFound(String),

    /// The operation is not applicable to the current state.
    #[error("{0}")]
    PreconditionFailed(String),

    /// The request was malformed; nothing was changed.
    #[error("{0}")]
    Validation(String),

    /// The persistence backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PreconditionFailed(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Store(err) => {
                tracing::error!("store failure: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ApiResponse::<()>::err(self.to_string()));
        (status, body).into_response()
    }
}
