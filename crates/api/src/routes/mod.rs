//! API route definitions.

use axum::{
    Router,
    http::header,
    middleware,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{AppState, middleware::auth::auth_middleware};
use declara_shared::{OrganizationId, Principal};

pub mod admin;
pub mod consolidation;
pub mod declaration;
pub mod entries;
pub mod health;
pub mod legislation;
pub mod messages;
pub mod organizations;
pub mod registration;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(entries::routes())
        .merge(declaration::routes())
        .merge(consolidation::routes())
        .merge(organizations::routes())
        .merge(messages::routes())
        .merge(legislation::routes())
        .merge(admin::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(registration::routes())
        .merge(protected_routes)
}

/// Optional organization selector; defaults to the caller's own.
#[derive(Debug, Default, Deserialize)]
pub struct OrganizationQuery {
    /// Organization to act on (CFA and admins only, for others).
    pub organization_id: Option<OrganizationId>,
}

impl OrganizationQuery {
    /// Resolves the target organization.
    #[must_use]
    pub fn target(&self, principal: &Principal) -> OrganizationId {
        self.organization_id.unwrap_or(principal.organization_id)
    }
}

/// Serves CSV bytes as a downloadable file.
pub(crate) fn csv_attachment(file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}
