//! Property-based tests for ApprovalEngine.
//!
//! Checks the permission rule over every combination of role set,
//! approval level, and status.

use proptest::prelude::*;

use crate::workflow::approval::ApprovalEngine;
use crate::workflow::error::ApprovalError;
use crate::workflow::role::{Role, RoleSet, approver_role, level_of};
use crate::workflow::types::ExpenseStatus;

/// Strategy for generating arbitrary role sets (including the empty set).
fn arb_roles() -> impl Strategy<Value = RoleSet> {
    proptest::collection::btree_set(
        prop_oneof![
            Just(Role::Employee),
            Just(Role::Manager),
            Just(Role::Accountant),
            Just(Role::Admin),
        ],
        0..=4,
    )
}

/// Strategy for generating random ExpenseStatus values.
fn arb_status() -> impl Strategy<Value = ExpenseStatus> {
    prop_oneof![
        Just(ExpenseStatus::Pending),
        Just(ExpenseStatus::ManagerApproved),
        Just(ExpenseStatus::AccountantApproved),
        Just(ExpenseStatus::FullyApproved),
        Just(ExpenseStatus::Rejected),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A grant is issued iff the status is open and the actor's highest
    /// approver level is exactly one above the expense level.
    #[test]
    fn prop_grant_iff_next_level(
        roles in arb_roles(),
        level in 0u8..=3,
        status in arb_status()
    ) {
        let result = ApprovalEngine::check(&roles, level, status);
        let actor_level = level_of(&roles);
        let expected = !status.is_terminal() && actor_level > 0 && actor_level == level + 1;

        prop_assert_eq!(result.is_ok(), expected);
        if let Ok(grant) = result {
            prop_assert_eq!(grant.expected_level, actor_level);
            prop_assert_eq!(Some(grant.approver_role), approver_role(&roles));
        }
    }

    /// Terminal statuses are reported before anything else.
    #[test]
    fn prop_terminal_always_finalized(
        roles in arb_roles(),
        level in 0u8..=3,
        terminal in prop_oneof![Just(ExpenseStatus::FullyApproved), Just(ExpenseStatus::Rejected)]
    ) {
        let result = ApprovalEngine::check(&roles, level, terminal);
        prop_assert_eq!(result, Err(ApprovalError::AlreadyFinalized { status: terminal }));
    }

    /// Failure kinds: no approver role → InsufficientPermission, otherwise
    /// a level mismatch → InvalidApprovalSequence.
    #[test]
    fn prop_failure_kind(
        roles in arb_roles(),
        level in 0u8..=2
    ) {
        let status = ExpenseStatus::derive(level, false).unwrap();
        match ApprovalEngine::check(&roles, level, status) {
            Ok(_) => prop_assert_eq!(level_of(&roles), level + 1),
            Err(ApprovalError::InsufficientPermission) => {
                prop_assert_eq!(level_of(&roles), 0);
            }
            Err(ApprovalError::InvalidApprovalSequence { approver_role: role, required_level, current_level }) => {
                prop_assert_eq!(Some(role), approver_role(&roles));
                prop_assert_eq!(required_level, role.level() - 1);
                prop_assert_eq!(current_level, level);
                prop_assert_ne!(required_level, current_level);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    /// The struct form agrees with the Result form.
    #[test]
    fn prop_validate_matches_check(
        roles in arb_roles(),
        level in 0u8..=3,
        status in arb_status()
    ) {
        let validation = ApprovalEngine::validate(&roles, level, status);
        let result = ApprovalEngine::check(&roles, level, status);

        prop_assert_eq!(validation.can_approve, result.is_ok());
        prop_assert_eq!(validation.reason.is_none(), result.is_ok());
        if let Err(err) = result {
            prop_assert_eq!(validation.reason, Some(err.to_string()));
        }
    }
}
