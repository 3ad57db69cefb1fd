//! Expense and revenue entry routes.
//!
//! Every write goes through the entry service, which enforces the account
//! rules and the declaration lock before touching the store.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrganizationQuery, csv_attachment};
use crate::{AppState, error::ApiError, middleware::AuthUser};
use declara_core::audit::OrganizationActivity;
use declara_core::entries::{
    EntryChange, ExpenseAmounts, ExpenseValues, ImportReport, Report, RestoredSnapshot,
    RevenueValues,
};

/// Creates the entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(load_expenses).put(save_expenses))
        .route("/expenses/import", post(import_expenses))
        .route("/expenses/export", get(export_expenses))
        .route("/expenses/{account}", put(save_expense))
        .route("/revenues", get(load_revenues).put(save_revenues))
        .route("/revenues/import", post(import_revenues))
        .route("/revenues/export", get(export_revenues))
        .route("/revenues/{account}", put(save_revenue))
        .route("/history", get(history))
        .route("/snapshot/restore", post(restore_snapshot))
        .route("/report/expenses", get(expense_report))
        .route("/report/revenues", get(revenue_report))
        .route("/activity", get(activity))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for saving several expense accounts.
#[derive(Debug, Deserialize)]
pub struct SaveExpensesRequest {
    /// Figures keyed by account code.
    pub values: BTreeMap<String, ExpenseAmounts>,
}

/// Request body for saving several revenue accounts.
#[derive(Debug, Deserialize)]
pub struct SaveRevenuesRequest {
    /// Amounts keyed by account code.
    pub values: BTreeMap<String, Decimal>,
}

/// Request and response body for one revenue account.
#[derive(Debug, Deserialize, Serialize)]
pub struct RevenueRequest {
    /// Amount collected.
    pub value: Decimal,
}

/// History query.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Organization to read.
    pub organization_id: Option<declara_shared::OrganizationId>,
    /// `csv` to download instead of JSON.
    pub format: Option<String>,
}

/// Request body for rolling entries back.
#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    /// Instant whose values should be restored.
    pub as_of: DateTime<Utc>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/expenses`
async fn load_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<ExpenseValues>, ApiError> {
    let principal = auth.principal();
    let values = state
        .entries
        .load_expenses(&principal, query.target(&principal))
        .await?;
    Ok(Json(values))
}

/// PUT `/expenses`
/// Saves each account in key order; the first rejected account stops the
/// request and earlier accounts stay written.
async fn save_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
    Json(payload): Json<SaveExpensesRequest>,
) -> Result<Json<ExpenseValues>, ApiError> {
    let principal = auth.principal();
    let organization_id = query.target(&principal);
    let now = Utc::now();

    let mut saved = ExpenseValues::new();
    for (account, amounts) in payload.values {
        let stored = state
            .entries
            .save_expense(&principal, organization_id, &account, amounts, now)
            .await?;
        saved.insert(account, stored);
    }

    Ok(Json(saved))
}

/// PUT `/expenses/{account}`
async fn save_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account): Path<String>,
    Query(query): Query<OrganizationQuery>,
    Json(amounts): Json<ExpenseAmounts>,
) -> Result<Json<ExpenseAmounts>, ApiError> {
    let principal = auth.principal();
    let stored = state
        .entries
        .save_expense(
            &principal,
            query.target(&principal),
            &account,
            amounts,
            Utc::now(),
        )
        .await?;
    Ok(Json(stored))
}

/// POST `/expenses/import`
/// Body is the raw CSV file.
async fn import_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
    body: Bytes,
) -> Result<Json<ImportReport>, ApiError> {
    let principal = auth.principal();
    let report = state
        .entries
        .import_expenses(&principal, query.target(&principal), &body, Utc::now())
        .await?;
    Ok(Json(report))
}

/// GET `/expenses/export`
async fn export_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Response, ApiError> {
    let principal = auth.principal();
    let file = state
        .entries
        .export_expenses(&principal, query.target(&principal))
        .await?;
    Ok(csv_attachment("despesas.csv", file))
}

/// GET `/revenues`
async fn load_revenues(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<RevenueValues>, ApiError> {
    let principal = auth.principal();
    let values = state
        .entries
        .load_revenues(&principal, query.target(&principal))
        .await?;
    Ok(Json(values))
}

/// PUT `/revenues`
/// Same semantics as `PUT /expenses`.
async fn save_revenues(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
    Json(payload): Json<SaveRevenuesRequest>,
) -> Result<Json<RevenueValues>, ApiError> {
    let principal = auth.principal();
    let organization_id = query.target(&principal);
    let now = Utc::now();

    let mut saved = RevenueValues::new();
    for (account, value) in payload.values {
        let stored = state
            .entries
            .save_revenue(&principal, organization_id, &account, value, now)
            .await?;
        saved.insert(account, stored);
    }

    Ok(Json(saved))
}

/// PUT `/revenues/{account}`
async fn save_revenue(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account): Path<String>,
    Query(query): Query<OrganizationQuery>,
    Json(payload): Json<RevenueRequest>,
) -> Result<Json<RevenueRequest>, ApiError> {
    let principal = auth.principal();
    let value = state
        .entries
        .save_revenue(
            &principal,
            query.target(&principal),
            &account,
            payload.value,
            Utc::now(),
        )
        .await?;
    Ok(Json(RevenueRequest { value }))
}

/// POST `/revenues/import`
async fn import_revenues(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
    body: Bytes,
) -> Result<Json<ImportReport>, ApiError> {
    let principal = auth.principal();
    let report = state
        .entries
        .import_revenues(&principal, query.target(&principal), &body, Utc::now())
        .await?;
    Ok(Json(report))
}

/// GET `/revenues/export`
async fn export_revenues(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Response, ApiError> {
    let principal = auth.principal();
    let file = state
        .entries
        .export_revenues(&principal, query.target(&principal))
        .await?;
    Ok(csv_attachment("receitas.csv", file))
}

/// GET `/history`
/// Change log of an organization's entries, newest first.
async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let principal = auth.principal();
    let organization_id = query.organization_id.unwrap_or(principal.organization_id);

    if query.format.as_deref() == Some("csv") {
        let file = state
            .entries
            .export_history(&principal, organization_id)
            .await?;
        return Ok(csv_attachment("historico.csv", file));
    }

    let changes: Vec<EntryChange> = state.entries.history(&principal, organization_id).await?;
    Ok(Json(changes).into_response())
}

/// POST `/snapshot/restore`
/// Rolls the organization's entries back to their values at `as_of`.
async fn restore_snapshot(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
    Json(payload): Json<RestoreRequest>,
) -> Result<Json<RestoredSnapshot>, ApiError> {
    let principal = auth.principal();
    let restored = state
        .entries
        .restore_snapshot(
            &principal,
            query.target(&principal),
            payload.as_of,
            Utc::now(),
        )
        .await?;
    Ok(Json(restored))
}

/// GET `/report/expenses`
async fn expense_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<Report>, ApiError> {
    let principal = auth.principal();
    let report = state
        .entries
        .expense_report(&principal, query.target(&principal), Utc::now())
        .await?;
    Ok(Json(report))
}

/// GET `/report/revenues`
async fn revenue_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<Report>, ApiError> {
    let principal = auth.principal();
    let report = state
        .entries
        .revenue_report(&principal, query.target(&principal), Utc::now())
        .await?;
    Ok(Json(report))
}

/// GET `/activity`
/// Responsible updates, printed reports and restores, newest first.
async fn activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<Vec<OrganizationActivity>>, ApiError> {
    let principal = auth.principal();
    let entries = state
        .entries
        .activity(&principal, query.target(&principal))
        .await?;
    Ok(Json(entries))
}
