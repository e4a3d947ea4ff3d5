//! Core business logic for Expensa.
//!
//! This crate contains pure business logic with ZERO web or storage dependencies.
//! All domain types, validation rules, and the approval state machine live here.
//!
//! # Modules
//!
//! - `workflow` - Roles, approval validation, and decision transitions
//! - `expense` - Expense entity, submission policy, and listing filters
//! - `user` - Users and onboarding validation
//! - `analytics` - Aggregate reporting over expenses

pub mod analytics;
pub mod expense;
pub mod user;
pub mod workflow;
