//! Session validation for protected routes.
//!
//! Sessions are issued by the external identity provider; this layer only
//! checks the bearer token and exposes the principal to handlers.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;
use declara_shared::{Claims, JwtError, Principal};

/// Bearer token of the request, if any. The scheme is case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn rejection(err: &JwtError) -> ApiError {
    match err {
        JwtError::Expired => {
            ApiError::new(StatusCode::UNAUTHORIZED, "token_expired", "Session has expired")
        }
        _ => ApiError::new(
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "Invalid or malformed session token",
        ),
    }
}

/// Rejects requests without a valid session and stores its [`Claims`] in the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ApiError::new(
            StatusCode::UNAUTHORIZED,
            "missing_token",
            "Authorization header with Bearer token is required",
        )
        .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "session rejected");
            rejection(&e).into_response()
        }
    }
}

/// The authenticated caller.
///
/// Only usable behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the principal described by the session.
    #[must_use]
    pub fn principal(&self) -> Principal {
        self.0.principal()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", "Authentication required")
            })
    }
}
