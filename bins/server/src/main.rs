//! Expensa API Server
//!
//! Main entry point for the Expensa expense approval service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expensa_api::{AppState, create_router};
use expensa_core::user::NewUser;
use expensa_shared::{AppConfig, BootstrapSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expensa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Create application state
    let state = AppState::from_config(&config);
    info!(
        categories = state.expenses.policy().categories().len(),
        notification_capacity = config.notifications.channel_capacity,
        "Expense policy loaded"
    );

    if let Some(bootstrap) = &config.bootstrap {
        bootstrap_admin(&state, bootstrap)?;
    }

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Onboards the configured administrator and prints their access token.
fn bootstrap_admin(state: &AppState, settings: &BootstrapSettings) -> anyhow::Result<()> {
    let admin = state
        .users
        .onboard(NewUser {
            name: settings.admin_name.clone(),
            email: settings.admin_email.clone(),
            roles: Some(vec!["ADMIN".to_string(), "EMPLOYEE".to_string()]),
        })
        .context("Failed to onboard bootstrap admin")?;

    let token = state
        .jwt_service
        .generate_access_token(admin.id.into_inner(), &admin.name, &admin.role_names())
        .context("Failed to issue bootstrap admin token")?;

    info!(user_id = %admin.id, email = %admin.email, "Bootstrap admin created");
    println!("Bootstrap admin access token: {token}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
