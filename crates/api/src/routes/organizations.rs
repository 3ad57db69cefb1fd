//! Organization catalog routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::{AppState, error::ApiError, middleware::AuthUser};
use declara_core::organization::{Organization, OrganizationRepository as _};

/// Creates the organization routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/organizations", get(list_organizations))
}

/// GET `/organizations`
/// Every council ordered by name.
async fn list_organizations(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Organization>>, ApiError> {
    let organizations = state.organizations.list().await?;
    Ok(Json(organizations))
}
