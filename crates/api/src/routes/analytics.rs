//! Administrator analytics routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use expensa_core::analytics::AnalyticsService;
use serde::Deserialize;

use crate::{AppState, middleware::AuthUser};

/// Default number of rows in the top spenders report.
const DEFAULT_TOP_SPENDERS: usize = 5;
/// Upper bound for the top spenders report.
const MAX_TOP_SPENDERS: usize = 100;

/// Creates the analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(summary))
        .route("/analytics/expenses-by-category", get(by_category))
        .route("/analytics/expenses-by-status", get(by_status))
        .route("/analytics/approval-times", get(approval_times))
        .route("/analytics/top-spenders", get(top_spenders))
}

/// Query parameters for the top spenders report.
#[derive(Debug, Deserialize)]
pub struct TopSpendersQuery {
    /// Number of rows (default: 5, max: 100).
    pub limit: Option<usize>,
}

/// GET /analytics/summary
async fn summary(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    Json(AnalyticsService::summary(&state.expenses.all_snapshots())).into_response()
}

/// GET /analytics/expenses-by-category
async fn by_category(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    Json(AnalyticsService::expenses_by_category(
        &state.expenses.all_snapshots(),
    ))
    .into_response()
}

/// GET /analytics/expenses-by-status
async fn by_status(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    Json(AnalyticsService::expenses_by_status(
        &state.expenses.all_snapshots(),
    ))
    .into_response()
}

/// GET /analytics/approval-times
async fn approval_times(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    Json(AnalyticsService::approval_times(
        &state.expenses.all_snapshots(),
    ))
    .into_response()
}

/// GET /analytics/top-spenders
async fn top_spenders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TopSpendersQuery>,
) -> Response {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TOP_SPENDERS)
        .clamp(1, MAX_TOP_SPENDERS);
    Json(AnalyticsService::top_spenders(
        &state.expenses.all_snapshots(),
        limit,
    ))
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use expensa_core::expense::{ExpensePolicy, NewExpense, Requester};
    use expensa_core::workflow::{Actor, Decision, Role};
    use expensa_shared::types::UserId;
    use expensa_shared::{JwtConfig, JwtService};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{AppState, create_router};

    fn seeded_state() -> AppState {
        let state = AppState::new(
            ExpensePolicy::default(),
            JwtService::new(JwtConfig::default()),
            16,
        );
        let erin = Actor::new(UserId::new(), "Erin", [Role::Employee]);
        let manager = Actor::new(UserId::new(), "Max", [Role::Manager]);

        for (amount, category) in [(dec!(300), "Travel"), (dec!(45.50), "Meals")] {
            state
                .expenses
                .create(
                    Requester::from(&erin),
                    NewExpense {
                        title: format!("{category} claim"),
                        amount,
                        description: "Quarterly client meeting".to_string(),
                        category: category.to_string(),
                        receipt_url: None,
                    },
                )
                .unwrap();
        }
        let first = state.expenses.all_snapshots()[0].id();
        state
            .expenses
            .decide(first, Decision::Rejected, &manager, Some("duplicate"))
            .unwrap();
        state
    }

    async fn get(state: &AppState, uri: &str, role: Role) -> (StatusCode, Value) {
        let token = state
            .jwt_service
            .generate_access_token(UserId::new().into_inner(), "Caller", &[role.as_str().to_string()])
            .unwrap();
        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case("/api/v1/analytics/summary")]
    #[case("/api/v1/analytics/expenses-by-category")]
    #[case("/api/v1/analytics/expenses-by-status")]
    #[case("/api/v1/analytics/approval-times")]
    #[case("/api/v1/analytics/top-spenders")]
    #[tokio::test]
    async fn test_admin_only(#[case] uri: &str) {
        let state = seeded_state();
        for role in [Role::Employee, Role::Manager, Role::Accountant] {
            let (status, body) = get(&state, uri, role).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["error"], "FORBIDDEN");
        }
        let (status, _) = get(&state, uri, Role::Admin).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_summary_and_status_counts() {
        let state = seeded_state();

        let (_, summary) = get(&state, "/api/v1/analytics/summary", Role::Admin).await;
        assert_eq!(summary["total_expenses"], 2);
        assert_eq!(summary["rejected_expenses"], 1);
        assert_eq!(summary["pending_expenses"], 1);

        let (_, statuses) = get(&state, "/api/v1/analytics/expenses-by-status", Role::Admin).await;
        assert_eq!(statuses.as_array().unwrap().len(), 5);

        let (_, times) = get(&state, "/api/v1/analytics/approval-times", Role::Admin).await;
        assert_eq!(times["expenses"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_top_spenders_limit() {
        let state = seeded_state();
        let (_, rows) = get(&state, "/api/v1/analytics/top-spenders?limit=0", Role::Admin).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Erin");
        assert_eq!(rows[0]["expense_count"], 1);
    }
}
