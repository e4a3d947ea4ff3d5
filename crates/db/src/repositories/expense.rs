//! Expense repository.
//!
//! Decisions are applied while holding the entry lock of the expense's
//! `DashMap` shard: load, validate, and replace happen as one step, so two
//! approvers racing on the same level cannot both succeed. The loser is
//! re-validated against the advanced level and gets
//! `InvalidApprovalSequence`.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use expensa_core::expense::{Expense, ExpenseFilter, ExpensePolicy, NewExpense, Requester};
use expensa_core::workflow::{
    Actor, ApprovalEngine, ApprovalError, Decision, DecisionOutcome, TransitionEvent,
    TransitionSink, WorkflowService,
};
use expensa_shared::types::{ExpenseId, PageRequest, PageResponse};
use tracing::{debug, info};

/// Expense repository holding the current snapshot of every expense.
pub struct ExpenseRepository {
    expenses: DashMap<ExpenseId, Expense>,
    policy: ExpensePolicy,
    sink: Arc<dyn TransitionSink>,
}

impl ExpenseRepository {
    /// Creates an empty repository.
    ///
    /// `sink` receives every committed transition, after the commit.
    #[must_use]
    pub fn new(policy: ExpensePolicy, sink: Arc<dyn TransitionSink>) -> Self {
        Self {
            expenses: DashMap::new(),
            policy,
            sink,
        }
    }

    /// Submission policy in force.
    #[must_use]
    pub const fn policy(&self) -> &ExpensePolicy {
        &self.policy
    }

    /// Validates and stores a new expense, then notifies the sink.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpenseInput` if the input violates the policy.
    pub fn create(&self, requester: Requester, input: NewExpense) -> Result<Expense, ApprovalError> {
        let expense = WorkflowService::submit(requester, input, &self.policy, Utc::now())?;
        self.expenses.insert(expense.id(), expense.clone());

        info!(
            expense_id = %expense.id(),
            requester_id = %expense.requester().id,
            amount = %expense.amount(),
            category = expense.category(),
            "Expense submitted"
        );
        self.sink.emit(&TransitionEvent::submitted(&expense));
        Ok(expense)
    }

    /// Finds an expense by ID.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` if no such expense exists.
    pub fn get(&self, id: ExpenseId) -> Result<Expense, ApprovalError> {
        self.expenses
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(ApprovalError::ExpenseNotFound(id))
    }

    /// Lists expenses matching `filter`, newest first.
    #[must_use]
    pub fn list(&self, filter: &ExpenseFilter, page: PageRequest) -> PageResponse<Expense> {
        let mut items: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        items.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        PageResponse::from_items(items, page)
    }

    /// Lists the expenses `actor` may act on right now, oldest first.
    #[must_use]
    pub fn list_pending_for(&self, actor: &Actor, page: PageRequest) -> PageResponse<Expense> {
        let mut items: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| ApprovalEngine::check_expense(&actor.roles, e.value()).is_ok())
            .map(|e| e.value().clone())
            .collect();
        items.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        PageResponse::from_items(items, page)
    }

    /// Clones every stored expense, in no particular order.
    #[must_use]
    pub fn all_snapshots(&self) -> Vec<Expense> {
        self.expenses.iter().map(|e| e.value().clone()).collect()
    }

    /// Applies a decision atomically and notifies the sink.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound`, or whatever `WorkflowService::apply_decision`
    /// rejects. A failed decision leaves the stored expense untouched.
    pub fn decide(
        &self,
        id: ExpenseId,
        decision: Decision,
        actor: &Actor,
        remarks: Option<&str>,
    ) -> Result<DecisionOutcome, ApprovalError> {
        let outcome = {
            let mut entry = self
                .expenses
                .get_mut(&id)
                .ok_or(ApprovalError::ExpenseNotFound(id))?;
            let outcome =
                WorkflowService::apply_decision(entry.value(), decision, actor, remarks, Utc::now())
                    .inspect_err(|e| {
                        debug!(expense_id = %id, actor_id = %actor.user_id, error = %e, "Decision refused");
                    })?;
            *entry.value_mut() = outcome.expense.clone();
            outcome
        };

        self.committed(&outcome);
        Ok(outcome)
    }

    /// Commits an outcome computed outside the lock, if the stored expense
    /// is still the snapshot it was computed from.
    ///
    /// Returns `false` without changing anything when another decision was
    /// committed in between; the caller should reload and retry.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` if the expense does not exist.
    pub fn replace_if_level(
        &self,
        outcome: &DecisionOutcome,
        expected_level: u8,
    ) -> Result<bool, ApprovalError> {
        let id = outcome.expense.id();
        {
            let mut entry = self
                .expenses
                .get_mut(&id)
                .ok_or(ApprovalError::ExpenseNotFound(id))?;
            let stored = entry.value();
            let unchanged = !stored.is_finalized()
                && stored.current_approval_level() == expected_level
                && stored.approvals().len() + 1 == outcome.expense.approvals().len();
            if !unchanged {
                debug!(
                    expense_id = %id,
                    expected_level,
                    current_level = stored.current_approval_level(),
                    "Stale decision not committed"
                );
                return Ok(false);
            }
            *entry.value_mut() = outcome.expense.clone();
        }

        self.committed(outcome);
        Ok(true)
    }

    fn committed(&self, outcome: &DecisionOutcome) {
        info!(
            expense_id = %outcome.event.expense_id,
            actor_id = %outcome.event.actor_id,
            actor_role = %outcome.event.actor_role,
            decision = ?outcome.event.decision,
            status = %outcome.event.new_status,
            level = outcome.event.approval_level,
            "Expense decision recorded"
        );
        self.sink.emit(&outcome.event);
    }
}
