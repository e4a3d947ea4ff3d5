//! Workflow domain types for expense approval.
//!
//! This module defines the status of an expense in the approval chain,
//! the decision an approver submits, the acting user, and the event
//! emitted after a transition is committed.

use chrono::{DateTime, Utc};
use expensa_shared::types::{ExpenseId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::expense::Expense;
use crate::workflow::role::{FINAL_APPROVAL_LEVEL, Role, RoleSet, approver_role, level_of};

/// Expense status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → ManagerApproved (manager approves)
/// - ManagerApproved → AccountantApproved (accountant approves)
/// - AccountantApproved → FullyApproved (admin approves)
/// - any non-terminal status → Rejected (the approver due at that stage rejects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    /// Submitted, waiting for a manager.
    Pending,
    /// Waiting for an accountant.
    ManagerApproved,
    /// Waiting for an admin.
    AccountantApproved,
    /// Every stage approved (terminal).
    FullyApproved,
    /// Rejected at some stage (terminal).
    Rejected,
}

impl ExpenseStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::ManagerApproved,
        Self::AccountantApproved,
        Self::FullyApproved,
        Self::Rejected,
    ];

    /// Derives the status from the approval level and whether any approver
    /// rejected the expense.
    ///
    /// Returns `None` for levels above [`FINAL_APPROVAL_LEVEL`].
    #[must_use]
    pub const fn derive(level: u8, rejected: bool) -> Option<Self> {
        if rejected {
            return Some(Self::Rejected);
        }
        match level {
            0 => Some(Self::Pending),
            1 => Some(Self::ManagerApproved),
            2 => Some(Self::AccountantApproved),
            FINAL_APPROVAL_LEVEL => Some(Self::FullyApproved),
            _ => None,
        }
    }

    /// Returns the wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::ManagerApproved => "MANAGER_APPROVED",
            Self::AccountantApproved => "ACCOUNTANT_APPROVED",
            Self::FullyApproved => "FULLY_APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a status from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "MANAGER_APPROVED" => Some(Self::ManagerApproved),
            "ACCOUNTANT_APPROVED" => Some(Self::AccountantApproved),
            "FULLY_APPROVED" => Some(Self::FullyApproved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Human-readable label describing what the expense waits for.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending Manager Approval",
            Self::ManagerApproved => "Pending Accountant Approval",
            Self::AccountantApproved => "Pending Admin Approval",
            Self::FullyApproved => "Fully Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Returns true if no further decision may be recorded.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::FullyApproved | Self::Rejected)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision submitted by an approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Advance the expense one stage.
    Approved,
    /// Terminate the expense.
    Rejected,
}

impl Decision {
    /// Returns the wire representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a decision from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user performing an action, as supplied by the session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User identifier.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Roles held by the user.
    pub roles: RoleSet,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id,
            name: name.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Highest approval level the actor holds.
    #[must_use]
    pub fn level(&self) -> u8 {
        level_of(&self.roles)
    }

    /// Role the actor approves as, if any.
    #[must_use]
    pub fn approver_role(&self) -> Option<Role> {
        approver_role(&self.roles)
    }

    /// Returns true if the actor holds the role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Fact of a committed transition, handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionEvent {
    /// The expense that changed.
    pub expense_id: ExpenseId,
    /// Owner of the expense (the party usually notified).
    pub requester_id: UserId,
    /// Status after the transition.
    pub new_status: ExpenseStatus,
    /// Approval level after the transition.
    pub approval_level: u8,
    /// The decision that caused the transition; `None` for a submission.
    pub decision: Option<Decision>,
    /// Who acted.
    pub actor_id: UserId,
    /// Role the actor acted as.
    pub actor_role: Role,
    /// When the decision was recorded.
    pub occurred_at: DateTime<Utc>,
}

impl TransitionEvent {
    /// Event for a freshly submitted expense, waiting on the first approver.
    #[must_use]
    pub fn submitted(expense: &Expense) -> Self {
        Self {
            expense_id: expense.id(),
            requester_id: expense.requester().id,
            new_status: expense.status(),
            approval_level: expense.current_approval_level(),
            decision: None,
            actor_id: expense.requester().id,
            actor_role: Role::Employee,
            occurred_at: expense.created_at(),
        }
    }
}
