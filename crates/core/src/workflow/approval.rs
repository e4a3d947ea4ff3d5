//! Approval validator.
//!
//! Decides whether an actor may record a decision on an expense. Approval is
//! strictly sequential: an expense starts at level 0 and a role of level `N`
//! may act only while the expense sits at level `N - 1`. A user holding
//! several approver roles is evaluated at the highest one only.

use serde::Serialize;

use crate::expense::Expense;
use crate::workflow::error::ApprovalError;
use crate::workflow::role::{Role, RoleSet, approver_role};
use crate::workflow::types::ExpenseStatus;

/// Authority granted to an actor for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproverGrant {
    /// Role the actor acts as.
    pub approver_role: Role,
    /// Level the expense reaches if the actor approves.
    pub expected_level: u8,
}

/// Outcome of a permission check, in the shape shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalValidation {
    /// Whether the actor may approve or reject now.
    pub can_approve: bool,
    /// Approval level of the actor's role (0 without approver role).
    pub expected_level: u8,
    /// Role the actor would act as.
    pub approver_role: Option<Role>,
    /// Why the actor may not act.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Stateless engine evaluating approval permissions.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Checks whether an actor holding `roles` may decide on an expense in
    /// the given state.
    ///
    /// # Returns
    /// * `Ok(ApproverGrant)` if the actor may act
    /// * `Err(ApprovalError::AlreadyFinalized)` if the status is terminal
    ///   (checked first, for every actor)
    /// * `Err(ApprovalError::InsufficientPermission)` if the actor holds no
    ///   approver role
    /// * `Err(ApprovalError::InvalidApprovalSequence)` if the expense is not
    ///   at the stage the actor's highest role approves
    pub fn check(
        roles: &RoleSet,
        current_level: u8,
        status: ExpenseStatus,
    ) -> Result<ApproverGrant, ApprovalError> {
        if status.is_terminal() {
            return Err(ApprovalError::AlreadyFinalized { status });
        }

        let role = approver_role(roles).ok_or(ApprovalError::InsufficientPermission)?;
        let expected_level = role.level();
        let required_level = expected_level - 1;

        if current_level != required_level {
            return Err(ApprovalError::InvalidApprovalSequence {
                approver_role: role,
                required_level,
                current_level,
            });
        }

        Ok(ApproverGrant {
            approver_role: role,
            expected_level,
        })
    }

    /// Checks an actor against an expense snapshot.
    pub fn check_expense(roles: &RoleSet, expense: &Expense) -> Result<ApproverGrant, ApprovalError> {
        Self::check(roles, expense.current_approval_level(), expense.status())
    }

    /// Runs [`Self::check`] and reports the outcome as an [`ApprovalValidation`].
    #[must_use]
    pub fn validate(roles: &RoleSet, current_level: u8, status: ExpenseStatus) -> ApprovalValidation {
        match Self::check(roles, current_level, status) {
            Ok(grant) => ApprovalValidation {
                can_approve: true,
                expected_level: grant.expected_level,
                approver_role: Some(grant.approver_role),
                reason: None,
            },
            Err(err) => {
                let (expected_level, approver_role) = match &err {
                    ApprovalError::InvalidApprovalSequence { approver_role, .. } => {
                        (approver_role.level(), Some(*approver_role))
                    }
                    _ => (0, None),
                };
                ApprovalValidation {
                    can_approve: false,
                    expected_level,
                    approver_role,
                    reason: Some(err.to_string()),
                }
            }
        }
    }
}
