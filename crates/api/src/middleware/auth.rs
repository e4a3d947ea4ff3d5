//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use expensa_core::workflow::{Actor, Role, parse_roles};
use expensa_shared::types::UserId;
use expensa_shared::{AppError, Claims, JwtError};
use serde_json::json;

use crate::AppState;
use crate::error::app_error_response;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "MISSING_TOKEN",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("TOKEN_EXPIRED", "Token has expired"),
                _ => ("INVALID_TOKEN", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated user.
///
/// Parses the role names in the claims into an [`Actor`]; a token naming an
/// unknown role is rejected rather than silently downgraded.
#[derive(Debug, Clone)]
pub struct AuthUser {
    actor: Actor,
}

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.actor.user_id
    }

    /// Returns the acting identity.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Requires at least one approver role (MANAGER or above).
    ///
    /// # Errors
    ///
    /// Returns a 403 response otherwise.
    pub fn require_approver(&self) -> Result<(), Response> {
        if self.actor.level() > 0 {
            Ok(())
        } else {
            Err(app_error_response(&AppError::Forbidden(
                "manager, accountant, or admin role required".to_string(),
            )))
        }
    }

    /// Requires the ADMIN role.
    ///
    /// # Errors
    ///
    /// Returns a 403 response otherwise.
    pub fn require_admin(&self) -> Result<(), Response> {
        if self.actor.has_role(Role::Admin) {
            Ok(())
        } else {
            Err(app_error_response(&AppError::Forbidden(
                "admin role required".to_string(),
            )))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(claims) = parts.extensions.get::<Claims>().cloned() else {
            return Err(app_error_response(&AppError::Unauthorized(
                "authentication required".to_string(),
            )));
        };

        let roles = parse_roles(claims.roles.as_slice()).map_err(|role| {
            app_error_response(&AppError::Unauthorized(format!(
                "token carries unknown role '{role}'"
            )))
        })?;
        let actor = Actor::new(UserId::from_uuid(claims.user_id()), &claims.name, roles);

        Ok(Self { actor })
    }
}
