//! Expense submission, listing, and approval routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use expensa_core::expense::{ExpenseFilter, NewExpense, Requester};
use expensa_core::workflow::{ApprovalEngine, ApprovalError, Decision, ExpenseStatus};
use expensa_shared::AppError;
use expensa_shared::types::{ExpenseId, PageRequest};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::{app_error_response, approval_error_response};
use crate::{AppState, middleware::AuthUser};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(submit_expense))
        .route("/expenses/my", get(my_expenses))
        .route("/expenses/pending-approvals", get(pending_approvals))
        .route("/expenses/{expense_id}", get(get_expense))
        .route("/expenses/{expense_id}/approve", post(decide_expense))
}

// ============================================================================
// Request Types
// ============================================================================

/// Pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 10, max: 100).
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Normalized page request.
    #[must_use]
    pub fn request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        )
    }
}

/// Query parameters for listing all expenses.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    /// Filter by status (e.g. `PENDING`).
    pub status: Option<String>,
    /// Filter by category.
    pub category: Option<String>,
    /// Substring of title or description.
    pub search: Option<String>,
    /// Created on or after (YYYY-MM-DD).
    #[serde(alias = "from")]
    pub start_date: Option<NaiveDate>,
    /// Created on or before (YYYY-MM-DD).
    #[serde(alias = "to")]
    pub end_date: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// Request body for an approval decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// `APPROVED` or `REJECTED`.
    pub status: String,
    /// Required when rejecting.
    pub remarks: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /expenses
async fn submit_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<NewExpense>,
) -> Response {
    match state.expenses.create(Requester::from(auth.actor()), input) {
        Ok(expense) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Expense submitted successfully",
                "expense": expense
            })),
        )
            .into_response(),
        Err(e) => approval_error_response(&e),
    }
}

/// GET /expenses/my
async fn my_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = state
        .expenses
        .list(&ExpenseFilter::for_requester(auth.user_id()), query.request());
    Json(page).into_response()
}

/// GET /expenses/pending-approvals
async fn pending_approvals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Response {
    if auth.actor().approver_role().is_none() {
        return approval_error_response(&ApprovalError::InsufficientPermission);
    }
    let page = state.expenses.list_pending_for(auth.actor(), query.request());
    Json(page).into_response()
}

/// GET /expenses
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListExpensesQuery>,
) -> Response {
    if let Err(response) = auth.require_approver() {
        return response;
    }

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match ExpenseStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return app_error_response(&AppError::Validation(format!(
                    "unknown status '{raw}'"
                )));
            }
        },
    };

    if let (Some(start), Some(end)) = (query.start_date, query.end_date)
        && start > end
    {
        return app_error_response(&AppError::Validation(
            "'start_date' must not be after 'end_date'".to_string(),
        ));
    }

    let filter = ExpenseFilter {
        requester: None,
        status,
        category: query.category.filter(|c| !c.trim().is_empty()),
        search: query.search.filter(|s| !s.trim().is_empty()),
        from: query.start_date,
        to: query.end_date,
    };
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };

    Json(state.expenses.list(&filter, page.request())).into_response()
}

/// GET /expenses/{expense_id}
///
/// Returns the expense with its approval history and whether the caller
/// may act on it right now.
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let expense = match state.expenses.get(expense_id) {
        Ok(expense) => expense,
        Err(e) => return approval_error_response(&e),
    };

    let is_owner = expense.requester().id == auth.user_id();
    if !is_owner && let Err(response) = auth.require_approver() {
        return response;
    }

    let validation = ApprovalEngine::validate(
        &auth.actor().roles,
        expense.current_approval_level(),
        expense.status(),
    );
    Json(json!({
        "expense": expense,
        "validation": validation
    }))
    .into_response()
}

/// POST /expenses/{expense_id}/approve
async fn decide_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
    Json(body): Json<DecisionRequest>,
) -> Response {
    let Some(decision) = Decision::parse(&body.status) else {
        return app_error_response(&AppError::Validation(format!(
            "status must be APPROVED or REJECTED, got '{}'",
            body.status
        )));
    };

    match state
        .expenses
        .decide(expense_id, decision, auth.actor(), body.remarks.as_deref())
    {
        Ok(outcome) => {
            info!(
                expense_id = %expense_id,
                user_id = %auth.user_id(),
                decision = %decision,
                "Approval decision applied"
            );
            let message = match decision {
                Decision::Approved => "Expense approved successfully",
                Decision::Rejected => "Expense rejected successfully",
            };
            Json(json!({
                "message": message,
                "expense": outcome.expense,
                "approval": outcome.approval
            }))
            .into_response()
        }
        Err(e) => approval_error_response(&e),
    }
}
