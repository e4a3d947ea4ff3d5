//! Workflow service for expense submission and approval decisions.
//!
//! This is the only code that writes an expense's status, level, or
//! approval history. Every method works on a snapshot and returns a new
//! one, so callers can commit the result atomically or drop it.

use chrono::{DateTime, Utc};
use expensa_shared::types::{ApprovalId, ExpenseId};
use rust_decimal::Decimal;

use crate::expense::{Approval, Approver, Expense, ExpensePolicy, NewExpense, Requester};
use crate::workflow::approval::ApprovalEngine;
use crate::workflow::error::ApprovalError;
use crate::workflow::types::{Actor, Decision, ExpenseStatus, TransitionEvent};

/// Result of an accepted decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// The expense after the decision.
    pub expense: Expense,
    /// The history entry that was appended.
    pub approval: Approval,
    /// Notification payload for the transition.
    pub event: TransitionEvent,
}

/// Stateless service for managing expense workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Creates a new expense in `PENDING` status at level 0.
    ///
    /// # Errors
    /// `ApprovalError::InvalidExpenseInput` when the amount is not positive,
    /// the category is not configured, the title or description is shorter
    /// than the policy minimum, or the receipt reference is blank.
    pub fn submit(
        requester: Requester,
        input: NewExpense,
        policy: &ExpensePolicy,
        now: DateTime<Utc>,
    ) -> Result<Expense, ApprovalError> {
        if input.amount <= Decimal::ZERO {
            return Err(ApprovalError::invalid_input(
                "amount",
                "must be greater than zero",
            ));
        }

        let title = input.title.trim();
        if title.chars().count() < policy.min_title_len() {
            return Err(ApprovalError::invalid_input(
                "title",
                format!("must be at least {} characters", policy.min_title_len()),
            ));
        }

        let description = input.description.trim();
        if description.chars().count() < policy.min_description_len() {
            return Err(ApprovalError::invalid_input(
                "description",
                format!(
                    "must be at least {} characters",
                    policy.min_description_len()
                ),
            ));
        }

        let category = policy
            .canonical_category(&input.category)
            .ok_or_else(|| {
                ApprovalError::invalid_input(
                    "category",
                    format!("'{}' is not an allowed category", input.category.trim()),
                )
            })?
            .to_string();

        let receipt_url = match input.receipt_url {
            Some(url) if url.trim().is_empty() => {
                return Err(ApprovalError::invalid_input(
                    "receipt_url",
                    "must not be blank",
                ));
            }
            Some(url) => Some(url.trim().to_string()),
            None => None,
        };

        Ok(Expense {
            id: ExpenseId::new(),
            title: title.to_string(),
            amount: input.amount,
            description: description.to_string(),
            category,
            receipt_url,
            status: ExpenseStatus::Pending,
            current_approval_level: 0,
            requester,
            approvals: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Records an approver's decision on an expense.
    ///
    /// Permission is re-validated here regardless of what the caller checked.
    /// Approving appends an `APPROVED` entry and advances the level by one;
    /// rejecting appends a `REJECTED` entry and finalizes the expense without
    /// touching the level. The input snapshot is left unchanged.
    ///
    /// # Errors
    /// * `AlreadyFinalized`, `InsufficientPermission`, `InvalidApprovalSequence`
    ///   from the validator (checked first)
    /// * `MissingRequiredRemarks` when rejecting without non-blank remarks
    pub fn apply_decision(
        expense: &Expense,
        decision: Decision,
        actor: &Actor,
        remarks: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome, ApprovalError> {
        let grant = ApprovalEngine::check_expense(&actor.roles, expense)?;

        let remarks = remarks.map(str::trim).filter(|r| !r.is_empty());
        if decision == Decision::Rejected && remarks.is_none() {
            return Err(ApprovalError::MissingRequiredRemarks);
        }

        let (level, rejected) = match decision {
            Decision::Approved => (grant.expected_level, false),
            Decision::Rejected => (expense.current_approval_level, true),
        };
        // The validator only grants non-terminal expenses one level below the
        // approver, so the derived status always exists.
        let status = ExpenseStatus::derive(level, rejected).ok_or(
            ApprovalError::InvalidApprovalSequence {
                approver_role: grant.approver_role,
                required_level: grant.expected_level - 1,
                current_level: expense.current_approval_level,
            },
        )?;

        let approval = Approval {
            id: ApprovalId::new(),
            expense_id: expense.id,
            approver: Approver {
                user_id: actor.user_id,
                name: actor.name.clone(),
                role: grant.approver_role,
            },
            decision,
            remarks: remarks.map(String::from),
            timestamp: now,
        };

        let mut updated = expense.clone();
        updated.approvals.push(approval.clone());
        updated.current_approval_level = level;
        updated.status = status;
        updated.updated_at = now;

        let event = TransitionEvent {
            expense_id: updated.id,
            requester_id: updated.requester.id,
            new_status: status,
            approval_level: level,
            decision: Some(decision),
            actor_id: actor.user_id,
            actor_role: grant.approver_role,
            occurred_at: now,
        };

        Ok(DecisionOutcome {
            expense: updated,
            approval,
            event,
        })
    }
}
