pub mod dashboard;
pub mod manage;
pub mod query;
pub mod system;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use srb_common::SrbError;
use srb_engine::present::Notice;

/// Error returned by handlers: the notice as JSON with a matching status.
#[derive(Debug)]
pub struct ApiError(pub SrbError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(&self.0)
    }
}

pub fn status_for(err: &SrbError) -> StatusCode {
    match err {
        SrbError::Validation(_) => StatusCode::BAD_REQUEST,
        SrbError::NotFound { .. } => StatusCode::NOT_FOUND,
        SrbError::RemoteCall(_) | SrbError::Load(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SrbError> for ApiError {
    fn from(err: SrbError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if !self.0.is_validation() {
            tracing::warn!(error = %self.0, "Request failed");
        }
        (self.status(), Json(Notice::from_error(&self.0))).into_response()
    }
}
