//! Analytics report types.

use expensa_shared::types::{ExpenseId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::workflow::types::ExpenseStatus;

/// Headline counts and totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    /// Number of expenses.
    pub total_expenses: u64,
    /// Sum of all amounts.
    pub total_amount: Decimal,
    /// Expenses still moving through the chain.
    pub pending_expenses: u64,
    /// Fully approved expenses.
    pub approved_expenses: u64,
    /// Rejected expenses.
    pub rejected_expenses: u64,
}

/// Spend in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category name.
    pub category: String,
    /// Number of expenses.
    pub count: u64,
    /// Sum of amounts.
    pub total: Decimal,
}

/// Number of expenses in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// Status.
    pub status: ExpenseStatus,
    /// Human-readable label.
    pub label: &'static str,
    /// Number of expenses.
    pub count: u64,
}

/// Time from submission to the final decision for one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalTime {
    /// Expense identifier.
    pub expense_id: ExpenseId,
    /// Expense title.
    pub title: String,
    /// Terminal status reached.
    pub status: ExpenseStatus,
    /// Seconds between creation and the final decision.
    pub seconds: i64,
}

/// Approval durations for all finalized expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalTimesReport {
    /// Per-expense durations, fastest first.
    pub expenses: Vec<ApprovalTime>,
    /// Mean duration in hours, two decimal places. Zero when empty.
    pub average_hours: Decimal,
}

/// A requester ranked by spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSpender {
    /// User identifier.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Sum of non-rejected amounts.
    pub total_spent: Decimal,
    /// Number of non-rejected expenses.
    pub expense_count: u64,
}
