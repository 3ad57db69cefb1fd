//! Cross-organization views for the national council.

use axum::{Json, Router, extract::State, response::Response, routing::get};

use super::csv_attachment;
use crate::{AppState, error::ApiError, middleware::AuthUser};
use declara_core::consolidation::{ConsolidatedExpenses, ConsolidatedRevenues};

/// Creates the consolidation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/consolidated/expenses", get(expenses))
        .route("/consolidated/revenues", get(revenues))
        .route("/consolidated/expenses/bi", get(expense_bi))
        .route("/consolidated/revenues/bi", get(revenue_bi))
}

/// GET `/consolidated/expenses`
async fn expenses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ConsolidatedExpenses>, ApiError> {
    let consolidated = state.consolidation.expenses(&auth.principal()).await?;
    Ok(Json(consolidated))
}

/// GET `/consolidated/revenues`
async fn revenues(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ConsolidatedRevenues>, ApiError> {
    let consolidated = state.consolidation.revenues(&auth.principal()).await?;
    Ok(Json(consolidated))
}

/// GET `/consolidated/expenses/bi`
/// One row per organization, finalística and apoio columns per account.
async fn expense_bi(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    let file = state.consolidation.expense_bi(&auth.principal()).await?;
    Ok(csv_attachment("bi_despesas.csv", file))
}

/// GET `/consolidated/revenues/bi`
async fn revenue_bi(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    let file = state.consolidation.revenue_bi(&auth.principal()).await?;
    Ok(csv_attachment("bi_receitas.csv", file))
}
