//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for expenses, approvals, analytics, and users
//! - Authentication middleware and the `AuthUser` extractor
//! - The broadcast notifier behind the notification websocket

pub mod error;
pub mod middleware;
pub mod notifier;
pub mod routes;

use axum::Router;
use expensa_core::expense::ExpensePolicy;
use expensa_db::{ExpenseRepository, UserRepository};
use expensa_shared::{AppConfig, JwtConfig, JwtService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::notifier::BroadcastNotifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Expense storage.
    pub expenses: Arc<ExpenseRepository>,
    /// User storage.
    pub users: Arc<UserRepository>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Fan-out of committed transitions.
    pub notifier: BroadcastNotifier,
}

impl AppState {
    /// Builds empty repositories wired to a fresh notifier.
    #[must_use]
    pub fn new(policy: ExpensePolicy, jwt_service: JwtService, channel_capacity: usize) -> Self {
        let notifier = BroadcastNotifier::new(channel_capacity);
        Self {
            expenses: Arc::new(ExpenseRepository::new(policy, Arc::new(notifier.clone()))),
            users: Arc::new(UserRepository::new()),
            jwt_service: Arc::new(jwt_service),
            notifier,
        }
    }

    /// Builds the state described by the configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let jwt_config = JwtConfig {
            secret: config.jwt.secret.clone(),
            access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
                .unwrap_or(i64::MAX)
                .max(1),
        };
        Self::new(
            ExpensePolicy::from_settings(&config.expenses),
            JwtService::new(jwt_config),
            config.notifications.channel_capacity,
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
