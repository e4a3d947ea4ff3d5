//! Shared types, errors, and configuration for Expensa.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - JWT claims and token service (the session context)
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod jwt_tests;

pub use auth::Claims;
pub use config::{
    AppConfig, BootstrapSettings, ExpenseSettings, JwtSettings, NotificationSettings, ServerConfig,
};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
