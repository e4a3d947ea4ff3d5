//! Mapping of domain errors to JSON error responses.
//!
//! Every error body has the shape `{"error": CODE, "message": text}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use expensa_core::user::UserError;
use expensa_core::workflow::ApprovalError;
use expensa_shared::AppError;
use serde_json::json;

/// Builds an error response from a numeric status, code, and message.
pub fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Response for an approval or submission failure.
pub fn approval_error_response(e: &ApprovalError) -> Response {
    error_response(e.status_code(), e.error_code(), &e.to_string())
}

/// Response for an onboarding or user lookup failure.
pub fn user_error_response(e: &UserError) -> Response {
    error_response(e.status_code(), e.error_code(), &e.to_string())
}

/// Response for a transport-level failure.
pub fn app_error_response(e: &AppError) -> Response {
    error_response(e.status_code(), e.error_code(), &e.to_string())
}
