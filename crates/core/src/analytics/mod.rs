//! Aggregate reporting over expense snapshots.

mod service;
mod types;


pub use service::AnalyticsService;
pub use types::{
    ApprovalTime, ApprovalTimesReport, CategoryTotal, ExpenseSummary, StatusCount, TopSpender,
};
