//! User onboarding and directory routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use expensa_core::user::NewUser;
use expensa_shared::AppError;
use serde_json::json;
use tracing::{error, info};

use crate::error::{app_error_response, user_error_response};
use crate::routes::expenses::PageQuery;
use crate::{AppState, middleware::AuthUser};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/onboard-user", post(onboard_user))
        .route("/auth/users", get(list_users))
}

/// POST /auth/onboard-user
///
/// Creates the user and returns an access token carrying their roles.
async fn onboard_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<NewUser>,
) -> Response {
    if let Err(response) = auth.require_admin() {
        return response;
    }

    let user = match state.users.onboard(request) {
        Ok(user) => user,
        Err(e) => return user_error_response(&e),
    };

    let token = match state.jwt_service.generate_access_token(
        user.id.into_inner(),
        &user.name,
        &user.role_names(),
    ) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "Failed to issue access token");
            return app_error_response(&AppError::from(e));
        }
    };

    info!(user_id = %user.id, onboarded_by = %auth.user_id(), "User onboarded via API");
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "User onboarded successfully",
            "user": user,
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

/// GET /auth/users
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Response {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    Json(state.users.list(query.request())).into_response()
}
