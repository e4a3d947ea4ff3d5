//! Analytics service.

use std::collections::BTreeMap;

use expensa_shared::types::UserId;
use rust_decimal::Decimal;

use super::types::{
    ApprovalTime, ApprovalTimesReport, CategoryTotal, ExpenseSummary, StatusCount, TopSpender,
};
use crate::expense::Expense;
use crate::workflow::types::ExpenseStatus;

const SECONDS_PER_HOUR: i64 = 3600;

/// Stateless aggregations over expense snapshots.
pub struct AnalyticsService;

impl AnalyticsService {
    /// Counts and totals across all expenses.
    #[must_use]
    pub fn summary(expenses: &[Expense]) -> ExpenseSummary {
        expenses.iter().fold(ExpenseSummary::default(), |mut acc, e| {
            acc.total_expenses += 1;
            acc.total_amount += e.amount();
            match e.status() {
                ExpenseStatus::FullyApproved => acc.approved_expenses += 1,
                ExpenseStatus::Rejected => acc.rejected_expenses += 1,
                _ => acc.pending_expenses += 1,
            }
            acc
        })
    }

    /// Spend per category, largest total first. Ties keep category order.
    #[must_use]
    pub fn expenses_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
        let mut totals: BTreeMap<&str, (u64, Decimal)> = BTreeMap::new();
        for e in expenses {
            let entry = totals.entry(e.category()).or_default();
            entry.0 += 1;
            entry.1 += e.amount();
        }

        let mut rows: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, (count, total))| CategoryTotal {
                category: category.to_string(),
                count,
                total,
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }

    /// Count per status, for every status in lifecycle order.
    #[must_use]
    pub fn expenses_by_status(expenses: &[Expense]) -> Vec<StatusCount> {
        ExpenseStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                label: status.label(),
                count: expenses.iter().filter(|e| e.status() == status).count() as u64,
            })
            .collect()
    }

    /// Submission-to-decision durations of finalized expenses.
    #[must_use]
    pub fn approval_times(expenses: &[Expense]) -> ApprovalTimesReport {
        let mut rows: Vec<ApprovalTime> = expenses
            .iter()
            .filter_map(|e| {
                e.finalized_at().map(|done| ApprovalTime {
                    expense_id: e.id(),
                    title: e.title().to_string(),
                    status: e.status(),
                    seconds: (done - e.created_at()).num_seconds(),
                })
            })
            .collect();
        rows.sort_by_key(|r| r.seconds);

        let average_hours = if rows.is_empty() {
            Decimal::ZERO
        } else {
            let total: i64 = rows.iter().map(|r| r.seconds).sum();
            let count = i64::try_from(rows.len()).unwrap_or(i64::MAX);
            (Decimal::from(total) / Decimal::from(count * SECONDS_PER_HOUR)).round_dp(2)
        };

        ApprovalTimesReport {
            expenses: rows,
            average_hours,
        }
    }

    /// Requesters ranked by non-rejected spend, at most `limit` of them.
    #[must_use]
    pub fn top_spenders(expenses: &[Expense], limit: usize) -> Vec<TopSpender> {
        let mut by_user: BTreeMap<UserId, TopSpender> = BTreeMap::new();
        for e in expenses.iter().filter(|e| e.status() != ExpenseStatus::Rejected) {
            let requester = e.requester();
            let row = by_user.entry(requester.id).or_insert_with(|| TopSpender {
                user_id: requester.id,
                name: requester.name.clone(),
                total_spent: Decimal::ZERO,
                expense_count: 0,
            });
            row.total_spent += e.amount();
            row.expense_count += 1;
        }

        let mut rows: Vec<TopSpender> = by_user.into_values().collect();
        rows.sort_by(|a, b| {
            b.total_spent
                .cmp(&a.total_spent)
                .then_with(|| b.expense_count.cmp(&a.expense_count))
        });
        rows.truncate(limit);
        rows
    }
}
