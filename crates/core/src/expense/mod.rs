//! Expense entity, submission policy, and listing filters.

pub mod policy;
pub mod query;
pub mod types;


pub use policy::ExpensePolicy;
pub use query::ExpenseFilter;
pub use types::{Approval, Approver, Expense, NewExpense, Requester};
