//! Property-based tests for WorkflowService.
//!
//! Drives random decision sequences through the transition function and
//! checks the expense invariants after every step.

use chrono::{Duration, TimeZone, Utc};
use expensa_shared::types::UserId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::expense::{Expense, ExpensePolicy, NewExpense, Requester};
use crate::workflow::error::ApprovalError;
use crate::workflow::role::{Role, RoleSet};
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{Actor, Decision, ExpenseStatus};

/// One attempted action in a generated history.
#[derive(Debug, Clone)]
struct Step {
    roles: RoleSet,
    decision: Decision,
    remarks: Option<String>,
}

fn arb_roles() -> impl Strategy<Value = RoleSet> {
    proptest::collection::btree_set(
        prop_oneof![
            Just(Role::Employee),
            Just(Role::Manager),
            Just(Role::Accountant),
            Just(Role::Admin),
        ],
        0..=3,
    )
}

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![
        3 => Just(Decision::Approved),
        1 => Just(Decision::Rejected),
    ]
}

fn arb_remarks() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("   ".to_string())),
        "[a-zA-Z ]{1,40}".prop_map(Some),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    (arb_roles(), arb_decision(), arb_remarks()).prop_map(|(roles, decision, remarks)| Step {
        roles,
        decision,
        remarks,
    })
}

/// Strategy for amounts between 0.01 and 10,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn fresh_expense(amount: Decimal) -> Expense {
    let requester = Requester {
        id: UserId::new(),
        name: "Requester".to_string(),
    };
    let input = NewExpense {
        title: "Conference".to_string(),
        amount,
        description: "Registration fee and hotel".to_string(),
        category: "Training".to_string(),
        receipt_url: None,
    };
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    WorkflowService::submit(requester, input, &ExpensePolicy::default(), created).unwrap()
}

fn actor_with(roles: impl IntoIterator<Item = Role>) -> Actor {
    Actor::new(UserId::new(), "Approver", roles)
}

/// Expense approved by the first `level` stages.
fn expense_at_level(level: u8) -> Expense {
    let mut expense = fresh_expense(Decimal::new(12000, 2));
    for stage in 1..=level {
        let role = Role::for_level(stage).unwrap();
        expense = WorkflowService::apply_decision(
            &expense,
            Decision::Approved,
            &actor_with([role]),
            None,
            Utc::now(),
        )
        .unwrap()
        .expense;
    }
    expense
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Over any history, status stays derived from level + rejection and
    /// failed attempts leave the snapshot untouched.
    #[test]
    fn prop_random_history_keeps_invariants(
        amount in arb_amount(),
        steps in proptest::collection::vec(arb_step(), 0..12)
    ) {
        let mut expense = fresh_expense(amount);
        let mut now = expense.created_at();

        for step in steps {
            now += Duration::minutes(5);
            let before = expense.clone();
            let actor = actor_with(step.roles.iter().copied());
            match WorkflowService::apply_decision(
                &expense,
                step.decision,
                &actor,
                step.remarks.as_deref(),
                now,
            ) {
                Ok(outcome) => {
                    prop_assert!(!before.is_finalized());
                    prop_assert_eq!(outcome.expense.approvals().len(), before.approvals().len() + 1);
                    prop_assert!(outcome.expense.current_approval_level() >= before.current_approval_level());
                    prop_assert_eq!(outcome.expense.approvals().last(), Some(&outcome.approval));
                    expense = outcome.expense;
                }
                Err(_) => prop_assert_eq!(&expense, &before),
            }
            prop_assert!(expense.is_consistent());
            prop_assert_eq!(
                ExpenseStatus::derive(
                    expense.current_approval_level(),
                    expense.approvals().iter().any(|a| a.decision == Decision::Rejected),
                ),
                Some(expense.status())
            );
        }
    }

    /// At level L only the role of level L + 1 may act; every other
    /// approver gets InvalidApprovalSequence.
    #[test]
    fn prop_sequential_approval(level in 0u8..=2, role_level in 1u8..=3) {
        let expense = expense_at_level(level);
        let role = Role::for_level(role_level).unwrap();
        let result = WorkflowService::apply_decision(
            &expense,
            Decision::Approved,
            &actor_with([role]),
            None,
            Utc::now(),
        );

        if role_level == level + 1 {
            let outcome = result.unwrap();
            prop_assert_eq!(outcome.expense.current_approval_level(), role_level);
        } else {
            let is_sequence_error = matches!(
                result,
                Err(ApprovalError::InvalidApprovalSequence { .. })
            );
            prop_assert!(is_sequence_error);
        }
    }

    /// Once rejected, every further call fails with AlreadyFinalized.
    #[test]
    fn prop_rejection_is_final(
        level in 0u8..=2,
        roles in arb_roles(),
        decision in arb_decision(),
        remarks in arb_remarks()
    ) {
        let expense = expense_at_level(level);
        let rejecter = actor_with([Role::for_level(level + 1).unwrap()]);
        let rejected = WorkflowService::apply_decision(
            &expense,
            Decision::Rejected,
            &rejecter,
            Some("not reimbursable"),
            Utc::now(),
        )
        .unwrap()
        .expense;
        prop_assert_eq!(rejected.current_approval_level(), level);

        let result = WorkflowService::apply_decision(
            &rejected,
            decision,
            &actor_with(roles),
            remarks.as_deref(),
            Utc::now(),
        );
        prop_assert_eq!(result, Err(ApprovalError::AlreadyFinalized { status: ExpenseStatus::Rejected }));
    }

    /// For the approver due at a stage: rejecting without remarks fails,
    /// approving without remarks succeeds.
    #[test]
    fn prop_remarks_law(level in 0u8..=2) {
        let expense = expense_at_level(level);
        let actor = actor_with([Role::for_level(level + 1).unwrap()]);

        let rejected = WorkflowService::apply_decision(&expense, Decision::Rejected, &actor, None, Utc::now());
        prop_assert_eq!(rejected, Err(ApprovalError::MissingRequiredRemarks));

        let approved = WorkflowService::apply_decision(&expense, Decision::Approved, &actor, None, Utc::now());
        prop_assert!(approved.is_ok());
    }
}
