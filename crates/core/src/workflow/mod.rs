//! Expense approval workflow for Expensa.
//!
//! This module implements the multi-level approval state machine: which
//! role may act on an expense at which stage, and how a decision changes
//! the expense.
//!
//! # Modules
//!
//! - `role` - Roles and the role → level mapping
//! - `types` - Workflow domain types (ExpenseStatus, Decision, Actor)
//! - `error` - Workflow-specific error types
//! - `approval` - Approval validator
//! - `service` - Submission and the transition function
//! - `notify` - Sink for committed transitions

pub mod approval;
pub mod error;
pub mod notify;
pub mod role;
pub mod service;
pub mod types;

#[cfg(test)]
mod approval_props;
#[cfg(test)]
mod service_props;

pub use approval::{ApprovalEngine, ApprovalValidation, ApproverGrant};
pub use error::ApprovalError;
pub use notify::{InMemoryTransitionSink, TransitionSink};
pub use role::{FINAL_APPROVAL_LEVEL, Role, RoleSet, approver_role, level_of, parse_roles};
pub use service::{DecisionOutcome, WorkflowService};
pub use types::{Actor, Decision, ExpenseStatus, TransitionEvent};
