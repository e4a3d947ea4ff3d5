//! Workflow error types for expense submission and approval.
//!
//! Every variant is a recoverable validation failure that is shown to the
//! caller as-is. None of them is retried: the same actor and expense state
//! reproduce the same failure.

use expensa_shared::types::ExpenseId;
use thiserror::Error;

use crate::workflow::role::Role;
use crate::workflow::types::ExpenseStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    /// The expense is fully approved or rejected.
    #[error("Expense is already finalized ({status})")]
    AlreadyFinalized {
        /// The terminal status.
        status: ExpenseStatus,
    },

    /// The actor holds no approver role.
    #[error("User does not have approval permissions")]
    InsufficientPermission,

    /// The expense is not at the stage the actor approves.
    #[error(
        "Invalid approval sequence. {approver_role} approval expects level {required_level}, current level {current_level}"
    )]
    InvalidApprovalSequence {
        /// Role the actor approves as.
        approver_role: Role,
        /// Level the expense must be at for this role to act.
        required_level: u8,
        /// Level the expense is actually at.
        current_level: u8,
    },

    /// Rejection submitted without remarks.
    #[error("Remarks are required when rejecting an expense")]
    MissingRequiredRemarks,

    /// Submission input failed validation.
    #[error("Invalid expense input: {field} {message}")]
    InvalidExpenseInput {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Expense not found.
    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),
}

impl ApprovalError {
    pub(crate) fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidExpenseInput {
            field,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingRequiredRemarks | Self::InvalidExpenseInput { .. } => 400,

            Self::InsufficientPermission => 403,

            Self::ExpenseNotFound(_) => 404,

            Self::AlreadyFinalized { .. } | Self::InvalidApprovalSequence { .. } => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            Self::InsufficientPermission => "INSUFFICIENT_PERMISSION",
            Self::InvalidApprovalSequence { .. } => "INVALID_APPROVAL_SEQUENCE",
            Self::MissingRequiredRemarks => "MISSING_REQUIRED_REMARKS",
            Self::InvalidExpenseInput { .. } => "INVALID_EXPENSE_INPUT",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
        }
    }
}
