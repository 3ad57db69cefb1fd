//! Declaration lifecycle and responsible persons routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OrganizationQuery;
use crate::{AppState, error::ApiError, middleware::AuthUser};
use declara_core::declaration::{Declaration, LockState, ResponsibleData};
use declara_shared::OrganizationId;

/// Creates the declaration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/declaration", get(current))
        .route("/declaration/history", get(history))
        .route("/declaration/lock", get(lock_state))
        .route("/declaration/submit", post(submit))
        .route("/declaration/rectify", post(rectify))
        .route("/responsible", get(responsible).put(save_responsible))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Lock query.
#[derive(Debug, Default, Deserialize)]
pub struct LockQuery {
    /// Organization to evaluate.
    pub organization_id: Option<OrganizationId>,
    /// The user already acknowledged a rectification prompt.
    #[serde(default)]
    pub rectify_ack: bool,
}

/// Lock state of an organization for the active period.
#[derive(Debug, Serialize)]
pub struct LockResponse {
    /// Current state.
    pub state: LockState,
    /// Whether entries are read-only.
    pub locked: bool,
    /// Whether a rectification may lift the lock.
    pub can_rectify: bool,
    /// Active reporting year.
    pub period_year: i32,
    /// Hard cutoff of the period.
    pub deadline: DateTime<Utc>,
}

/// Request body for submitting a declaration.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    /// Responsible persons; the stored data is used when omitted.
    #[serde(default)]
    pub responsible: Option<ResponsibleData>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/declaration`
/// Latest declaration of the active period, `null` when none was submitted.
async fn current(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<Option<Declaration>>, ApiError> {
    let principal = auth.principal();
    let declaration = state
        .declarations
        .current(&principal, query.target(&principal))
        .await?;
    Ok(Json(declaration))
}

/// GET `/declaration/history`
async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<Vec<Declaration>>, ApiError> {
    let principal = auth.principal();
    let declarations = state
        .declarations
        .history(&principal, query.target(&principal))
        .await?;
    Ok(Json(declarations))
}

/// GET `/declaration/lock`
async fn lock_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LockQuery>,
) -> Result<Json<LockResponse>, ApiError> {
    let principal = auth.principal();
    let organization_id = query.organization_id.unwrap_or(principal.organization_id);
    let lock = state
        .declarations
        .lock_state(&principal, organization_id, Utc::now(), query.rectify_ack)
        .await?;

    Ok(Json(lock_response(&state, lock)))
}

/// POST `/declaration/submit`
async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
    Json(payload): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Declaration>), ApiError> {
    let principal = auth.principal();
    let declaration = state
        .declarations
        .submit(
            &principal,
            query.target(&principal),
            payload.responsible,
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(declaration)))
}

/// POST `/declaration/rectify`
/// Reopens a submitted declaration; returns the new lock state.
async fn rectify(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<LockResponse>, ApiError> {
    let principal = auth.principal();
    let lock = state
        .declarations
        .rectify(&principal, query.target(&principal), Utc::now())
        .await?;

    Ok(Json(lock_response(&state, lock)))
}

/// GET `/responsible`
async fn responsible(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<Option<ResponsibleData>>, ApiError> {
    let principal = auth.principal();
    let data = state
        .declarations
        .responsible(&principal, query.target(&principal))
        .await?;
    Ok(Json(data))
}

/// PUT `/responsible`
async fn save_responsible(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrganizationQuery>,
    Json(data): Json<ResponsibleData>,
) -> Result<Json<ResponsibleData>, ApiError> {
    let principal = auth.principal();
    state
        .declarations
        .save_responsible(&principal, query.target(&principal), &data, Utc::now())
        .await?;
    Ok(Json(data))
}

fn lock_response(state: &AppState, lock: LockState) -> LockResponse {
    let period = state.declarations.period();
    LockResponse {
        state: lock,
        locked: lock.is_locked(),
        can_rectify: lock.can_rectify(),
        period_year: period.year,
        deadline: period.deadline,
    }
}
