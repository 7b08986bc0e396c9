//! Mapping of diagram errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use ngdiagram_core::DiagramError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Diagram(#[from] DiagramError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Diagram(DiagramError::GraphNotBuilt) => StatusCode::CONFLICT,
            ApiError::Diagram(DiagramError::UnknownNode(_)) => StatusCode::NOT_FOUND,
            ApiError::Diagram(
                DiagramError::InvalidEntityModel(_) | DiagramError::CyclicDependencyDetected { .. },
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Diagram(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
