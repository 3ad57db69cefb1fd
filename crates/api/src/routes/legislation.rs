//! Legislation document routes.
//!
//! Listing is open to every signed-in user; uploads, deletion and ordering
//! are reserved to the national council.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{AppState, Legislation, error::ApiError, middleware::AuthUser};
use declara_core::legislation::{LegislationDocument, NewDocument};
use declara_shared::types::DocumentId;

/// Upload bodies may exceed axum's default limit; the service enforces the
/// document size cap.
const UPLOAD_BODY_LIMIT: usize = 11 * 1024 * 1024;

/// Creates the legislation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/legislation",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/legislation/order", put(reorder_documents))
        .route("/legislation/{id}", delete(delete_document))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A document with its public URL.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Stored metadata.
    #[serde(flatten)]
    pub document: LegislationDocument,
    /// Where the file is served from.
    pub url: String,
}

/// One position in a reorder request.
#[derive(Debug, Deserialize)]
pub struct DocumentPosition {
    /// Document ID.
    pub id: DocumentId,
    /// New position.
    pub display_order: i32,
}

/// Request body for reordering documents.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// New positions.
    pub order: Vec<DocumentPosition>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn service(state: &AppState) -> Result<&Arc<Legislation>, ApiError> {
    state
        .legislation
        .as_ref()
        .ok_or_else(ApiError::storage_not_configured)
}

fn with_url(service: &Legislation, document: LegislationDocument) -> DocumentResponse {
    DocumentResponse {
        url: service.url(&document.file_path),
        document,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/legislation`
async fn list_documents(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let service = service(&state)?;
    let documents = service.list().await?;
    Ok(Json(
        documents
            .into_iter()
            .map(|d| with_url(service, d))
            .collect(),
    ))
}

/// POST `/legislation`
/// Multipart form with a `file` part and an optional `description` part.
async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let service = service(&state)?;

    let mut file = None;
    let mut description = String::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("documento.pdf").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                file = Some((file_name, content_type, data));
            }
            Some("description") => {
                description = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
            }
            _ => {}
        }
    }

    let Some((file_name, content_type, data)) = file else {
        return Err(ApiError::bad_request("a `file` part is required"));
    };

    let document = service
        .upload(
            &auth.principal(),
            NewDocument {
                file_name,
                content_type,
                description,
                data,
            },
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(with_url(service, document))))
}

/// DELETE `/legislation/{id}`
async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DocumentId>,
) -> Result<StatusCode, ApiError> {
    service(&state)?.delete(&auth.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/legislation/order`
async fn reorder_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    let order: Vec<(DocumentId, i32)> = payload
        .order
        .into_iter()
        .map(|p| (p.id, p.display_order))
        .collect();

    service(&state)?.reorder(&auth.principal(), &order).await?;
    Ok(StatusCode::NO_CONTENT)
}
