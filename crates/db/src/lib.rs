//! Storage layer with in-memory repositories.
//!
//! This crate provides:
//! - `ExpenseRepository` - expense snapshots and atomic decision commits
//! - `UserRepository` - onboarding with unique emails

pub mod repositories;

pub use repositories::{ExpenseRepository, UserRepository};
