//! Repository abstractions for data access.
//!
//! Repositories own the stored snapshots and hand out clones, so callers
//! never observe a half-applied change.

pub mod expense;
pub mod user;

pub use expense::ExpenseRepository;
pub use user::UserRepository;
