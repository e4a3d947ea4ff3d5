//! Listing filters over expense snapshots.

use chrono::NaiveDate;
use expensa_shared::types::UserId;

use crate::expense::types::Expense;
use crate::workflow::types::ExpenseStatus;

/// Filter applied when listing expenses. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only expenses owned by this user.
    pub requester: Option<UserId>,
    /// Only expenses in this status.
    pub status: Option<ExpenseStatus>,
    /// Only this category (case-insensitive).
    pub category: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Created on or after this date (UTC).
    pub from: Option<NaiveDate>,
    /// Created on or before this date (UTC).
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Filter for the expenses of one requester.
    #[must_use]
    pub fn for_requester(requester: UserId) -> Self {
        Self {
            requester: Some(requester),
            ..Self::default()
        }
    }

    /// Returns true if the expense passes every set criterion.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        let created = expense.created_at().date_naive();

        self.requester.is_none_or(|id| expense.requester().id == id)
            && self.status.is_none_or(|s| expense.status() == s)
            && self
                .category
                .as_deref()
                .is_none_or(|c| expense.category().eq_ignore_ascii_case(c.trim()))
            && self.search.as_deref().is_none_or(|term| {
                let term = term.trim().to_lowercase();
                term.is_empty()
                    || expense.title().to_lowercase().contains(&term)
                    || expense.description().to_lowercase().contains(&term)
            })
            && self.from.is_none_or(|from| created >= from)
            && self.to.is_none_or(|to| created <= to)
    }
}
