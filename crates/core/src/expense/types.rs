//! Expense entity and its approval history.

use chrono::{DateTime, Utc};
use expensa_shared::types::{ApprovalId, ExpenseId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflow::role::Role;
use crate::workflow::types::{Actor, Decision, ExpenseStatus};

/// Owner of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// User identifier.
    pub id: UserId,
    /// Display name at submission time.
    pub name: String,
}

impl From<&Actor> for Requester {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.user_id,
            name: actor.name.clone(),
        }
    }
}

/// The approver of a recorded decision, with the role resolved at that time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approver {
    /// User identifier.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Role the user acted as.
    pub role: Role,
}

/// One entry of an expense's append-only approval history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approval {
    /// Record identifier.
    pub id: ApprovalId,
    /// Owning expense.
    pub expense_id: ExpenseId,
    /// Who decided.
    pub approver: Approver,
    /// What was decided.
    pub decision: Decision,
    /// Approver remarks (always present on rejections).
    pub remarks: Option<String>,
    /// When the decision was recorded.
    pub timestamp: DateTime<Utc>,
}

/// User-supplied fields of a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewExpense {
    /// Short title.
    pub title: String,
    /// Amount spent, strictly positive.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// One of the configured categories.
    pub category: String,
    /// Reference to an uploaded receipt.
    #[serde(default)]
    pub receipt_url: Option<String>,
}

/// An expense moving through the approval chain.
///
/// State fields are only written by `WorkflowService`, so `status` always
/// matches `current_approval_level` and the approval history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub(crate) id: ExpenseId,
    pub(crate) title: String,
    pub(crate) amount: Decimal,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) receipt_url: Option<String>,
    pub(crate) status: ExpenseStatus,
    pub(crate) current_approval_level: u8,
    pub(crate) requester: Requester,
    pub(crate) approvals: Vec<Approval>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Expense {
    /// Expense identifier.
    #[must_use]
    pub const fn id(&self) -> ExpenseId {
        self.id
    }

    /// Title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category, in its configured spelling.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Receipt reference.
    #[must_use]
    pub fn receipt_url(&self) -> Option<&str> {
        self.receipt_url.as_deref()
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ExpenseStatus {
        self.status
    }

    /// Number of approvals granted so far.
    #[must_use]
    pub const fn current_approval_level(&self) -> u8 {
        self.current_approval_level
    }

    /// Owner of the expense.
    #[must_use]
    pub const fn requester(&self) -> &Requester {
        &self.requester
    }

    /// Approval history, oldest first.
    #[must_use]
    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// Submission time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last change.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true once no further decision may be recorded.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.status.is_terminal()
    }

    /// Time of the decision that finalized the expense.
    #[must_use]
    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        if self.is_finalized() {
            self.approvals.last().map(|a| a.timestamp)
        } else {
            None
        }
    }

    /// Checks the state invariants:
    /// - the level equals the number of `APPROVED` entries,
    /// - the status is derived from the level and the presence of a rejection,
    /// - nothing follows a rejection,
    /// - every entry belongs to this expense.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let approved = self
            .approvals
            .iter()
            .filter(|a| a.decision == Decision::Approved)
            .count();
        let rejection = self
            .approvals
            .iter()
            .position(|a| a.decision == Decision::Rejected);

        let level_matches = usize::from(self.current_approval_level) == approved;
        let status_matches =
            ExpenseStatus::derive(self.current_approval_level, rejection.is_some()) == Some(self.status);
        let rejection_is_last = rejection.is_none_or(|idx| idx + 1 == self.approvals.len());
        let owned = self.approvals.iter().all(|a| a.expense_id == self.id);

        level_matches && status_matches && rejection_is_last && owned
    }
}
