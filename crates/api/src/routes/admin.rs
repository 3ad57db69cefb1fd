//! Administrative routes: registration review, moderation, audit trail
//! and data maintenance.
//!
//! Authorization is checked by the services; the seed job has no service
//! level check and is guarded here.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::warn;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use declara_core::audit::UserActionLogEntry;
use declara_core::batch::BatchReport;
use declara_core::catalog::Catalog;
use declara_core::entries::{ClearedData, ExpenseAmounts};
use declara_core::organization::OrganizationRepository as _;
use declara_core::registration::{RegistrationRequest, RegistrationStatus};
use declara_core::user::UserProfile;
use declara_shared::AppError;
use declara_shared::types::{PageRequest, PageResponse, RegistrationRequestId, UserId};

/// Creates the admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/registrations", get(list_registrations))
        .route("/admin/registrations/{id}/approve", post(approve_registration))
        .route("/admin/registrations/{id}/reject", post(reject_registration))
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}/suspend", post(suspend_user))
        .route("/admin/users/{id}", delete(delete_user))
        .route("/admin/actions", get(list_actions))
        .route("/admin/clear-data", post(clear_data))
        .route("/admin/seed", post(seed))
}

// ============================================================================
// Request Types
// ============================================================================

/// Registration list filter.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationQuery {
    /// Only requests with this status.
    pub status: Option<RegistrationStatus>,
}

/// Request body for rejecting a registration.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    /// Reason shown to the requester.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request body for suspending or reactivating a user.
#[derive(Debug, Deserialize)]
pub struct SuspendRequest {
    /// `true` to suspend, `false` to reactivate.
    pub suspended: bool,
}

/// Request body carrying a typed confirmation phrase.
#[derive(Debug, Deserialize)]
pub struct ConfirmationRequest {
    /// The phrase the operation expects.
    pub confirmation: String,
}

/// Request body for the seed job.
#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SeedRequest {
    /// Random figures for every analytic account of every organization.
    Random,
    /// One fixed expense entry for every regional council.
    FixedExpense {
        /// Account code.
        account_id: String,
        /// Figures to write.
        amounts: ExpenseAmounts,
    },
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/admin/registrations`
async fn list_registrations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RegistrationQuery>,
) -> Result<Json<Vec<RegistrationRequest>>, ApiError> {
    let requests = state
        .registrations
        .list(&auth.principal(), query.status)
        .await?;
    Ok(Json(requests))
}

/// POST `/admin/registrations/{id}/approve`
async fn approve_registration(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RegistrationRequestId>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .registrations
        .approve(&auth.principal(), id, Utc::now())
        .await?;
    Ok(Json(profile))
}

/// POST `/admin/registrations/{id}/reject`
async fn reject_registration(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RegistrationRequestId>,
    Json(payload): Json<RejectRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .registrations
        .reject(&auth.principal(), id, payload.reason.as_deref(), Utc::now())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/admin/users`
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<UserProfile>>, ApiError> {
    let users = state.moderation.list_users(&auth.principal(), &page).await?;
    Ok(Json(users))
}

/// POST `/admin/users/{id}/suspend`
async fn suspend_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    Json(payload): Json<SuspendRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .moderation
        .set_suspended(&auth.principal(), id, payload.suspended, Utc::now())
        .await?;
    Ok(Json(profile))
}

/// DELETE `/admin/users/{id}`
/// The confirmation phrase is the target user's e-mail.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    Json(payload): Json<ConfirmationRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .moderation
        .delete_user(&auth.principal(), id, &payload.confirmation, Utc::now())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/admin/actions`
async fn list_actions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<UserActionLogEntry>>, ApiError> {
    let actions = state
        .moderation
        .list_actions(&auth.principal(), &page)
        .await?;
    Ok(Json(actions))
}

/// POST `/admin/clear-data`
async fn clear_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ConfirmationRequest>,
) -> Result<Json<ClearedData>, ApiError> {
    let cleared = state
        .entries
        .clear_all_data(&auth.principal(), &payload.confirmation)
        .await?;
    Ok(Json(cleared))
}

/// POST `/admin/seed`
/// Writes test data; bypasses the declaration lock.
async fn seed(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SeedRequest>,
) -> Result<Json<BatchReport>, ApiError> {
    let principal = auth.principal();
    if !principal.is_admin() {
        warn!(user_id = %principal.user_id, "seed attempted by non-admin");
        return Err(AppError::Forbidden("only administrators can seed data".to_string()).into());
    }

    let organizations = state.organizations.list().await?;
    let report = match payload {
        SeedRequest::Random => {
            let mut rng = StdRng::from_os_rng();
            state.seeder.seed_random(&organizations, &mut rng).await
        }
        SeedRequest::FixedExpense {
            account_id,
            amounts,
        } => {
            Catalog::expense()
                .require_analytic(&account_id)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            amounts.validate()?;
            state
                .seeder
                .seed_fixed_expense(&organizations, &account_id, amounts)
                .await
        }
    };
    Ok(Json(report))
}
