//! Public self-registration.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::Utc;
use serde::Serialize;

use crate::{AppState, error::ApiError};
use declara_core::registration::{NewRegistration, RegistrationStatus};
use declara_shared::types::RegistrationRequestId;

/// Creates the registration routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// Response for a submitted request.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    /// Request ID.
    pub id: RegistrationRequestId,
    /// Always `pending`.
    pub status: RegistrationStatus,
}

/// POST `/register`
/// Queue an access request for administrator review.
async fn register(
    State(state): State<AppState>,
    Json(form): Json<NewRegistration>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let request = state.registrations.submit(form, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            id: request.id,
            status: request.status,
        }),
    ))
}
