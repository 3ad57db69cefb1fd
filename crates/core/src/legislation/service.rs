//! Document upload, ordering and removal.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use declara_shared::Principal;
use declara_shared::types::{DocumentId, UserId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::LegislationError;
use crate::storage::{StorageService, sanitize_filename};
use crate::store::StoreError;

/// A published document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationDocument {
    /// Document ID.
    pub id: DocumentId,
    /// Original file name.
    pub file_name: String,
    /// Path in object storage.
    pub file_path: String,
    /// Free text shown next to the link.
    pub description: String,
    /// Position in the list, ascending.
    pub display_order: i32,
    /// Uploader.
    pub uploaded_by: UserId,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// An upload.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Original file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Description.
    pub description: String,
    /// File contents.
    pub data: Bytes,
}

/// Repository trait for document records.
pub trait LegislationRepository: Send + Sync {
    /// Inserts a record.
    fn insert(
        &self,
        document: &LegislationDocument,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Finds a record by ID.
    fn find(
        &self,
        id: DocumentId,
    ) -> impl Future<Output = Result<Option<LegislationDocument>, StoreError>> + Send;

    /// Every record ordered by `display_order`.
    fn list(&self) -> impl Future<Output = Result<Vec<LegislationDocument>, StoreError>> + Send;

    /// Highest `display_order` in use.
    fn max_display_order(&self) -> impl Future<Output = Result<Option<i32>, StoreError>> + Send;

    /// Sets the position of each listed document.
    fn set_display_order(
        &self,
        order: &[(DocumentId, i32)],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes a record.
    fn delete(&self, id: DocumentId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Legislation document service.
pub struct LegislationService<L: LegislationRepository> {
    documents: Arc<L>,
    storage: StorageService,
}

impl<L: LegislationRepository> LegislationService<L> {
    /// Create a new legislation service.
    #[must_use]
    pub fn new(documents: Arc<L>, storage: StorageService) -> Self {
        Self { documents, storage }
    }

    fn authorize(principal: &Principal) -> Result<(), LegislationError> {
        if principal.can_view_consolidated() {
            Ok(())
        } else {
            Err(LegislationError::Forbidden)
        }
    }

    /// Documents in display order.
    ///
    /// # Errors
    ///
    /// `Store` on read failures.
    pub async fn list(&self) -> Result<Vec<LegislationDocument>, LegislationError> {
        Ok(self.documents.list().await?)
    }

    /// Public URL of a stored document.
    #[must_use]
    pub fn url(&self, file_path: &str) -> String {
        self.storage.public_url(file_path)
    }

    /// Stores a PDF and appends it to the end of the list.
    ///
    /// The file is written first; if the record cannot be inserted the file
    /// is removed again.
    ///
    /// # Errors
    ///
    /// `Validation` for non-PDF or oversized files.
    pub async fn upload(
        &self,
        principal: &Principal,
        upload: NewDocument,
        now: DateTime<Utc>,
    ) -> Result<LegislationDocument, LegislationError> {
        Self::authorize(principal)?;
        let file_name = upload.file_name.trim();
        if file_name.is_empty() {
            return Err(LegislationError::Validation(
                "file name is required".to_string(),
            ));
        }

        let file_path = format!(
            "{}_{}",
            now.timestamp_millis(),
            sanitize_filename(file_name)
        );
        self.storage
            .upload(&file_path, &upload.content_type, upload.data)
            .await?;

        let display_order = match self.documents.max_display_order().await {
            Ok(max) => max.map_or(0, |m| m + 1),
            Err(e) => {
                self.discard(&file_path).await;
                return Err(e.into());
            }
        };
        let document = LegislationDocument {
            id: DocumentId::new(),
            file_name: file_name.to_string(),
            file_path,
            description: upload.description.trim().to_string(),
            display_order,
            uploaded_by: principal.user_id,
            uploaded_at: now,
        };
        if let Err(e) = self.documents.insert(&document).await {
            self.discard(&document.file_path).await;
            return Err(e.into());
        }

        info!(document_id = %document.id, path = %document.file_path, "legislation uploaded");
        Ok(document)
    }

    async fn discard(&self, file_path: &str) {
        if let Err(e) = self.storage.remove(file_path).await {
            warn!(path = file_path, error = %e, "orphaned file not removed");
        }
    }

    /// Removes a document and its file.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown IDs.
    pub async fn delete(&self, principal: &Principal, id: DocumentId) -> Result<(), LegislationError> {
        Self::authorize(principal)?;
        let document = self
            .documents
            .find(id)
            .await?
            .ok_or(LegislationError::NotFound)?;
        self.storage.remove(&document.file_path).await?;
        self.documents.delete(id).await?;
        info!(document_id = %id, "legislation deleted");
        Ok(())
    }

    /// Applies new positions.
    ///
    /// # Errors
    ///
    /// `Forbidden` for regional members.
    pub async fn reorder(
        &self,
        principal: &Principal,
        order: &[(DocumentId, i32)],
    ) -> Result<(), LegislationError> {
        Self::authorize(principal)?;
        self.documents.set_display_order(order).await?;
        Ok(())
    }
}
