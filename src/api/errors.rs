use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::VigilError;

impl IntoResponse for VigilError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            VigilError::BatchInFlight => StatusCode::CONFLICT,
            VigilError::AgentNotFound(_) => StatusCode::NOT_FOUND,
            VigilError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
