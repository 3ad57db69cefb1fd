//! Message service.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use declara_shared::Principal;
use declara_shared::types::{MessageId, OrganizationId};
use tracing::info;

use super::error::MessageError;
use super::types::{Message, MessageKind};
use crate::store::StoreError;

const MAX_CONTENT_CHARS: usize = 5_000;

/// Repository trait for messages.
pub trait MessageRepository: Send + Sync {
    /// Inserts a message.
    fn insert(&self, message: &Message) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Finds a message by ID.
    fn find(
        &self,
        id: MessageId,
    ) -> impl Future<Output = Result<Option<Message>, StoreError>> + Send;

    /// Messages newest first. With `viewer`, only broadcasts and messages
    /// sent by that organization.
    fn list(
        &self,
        viewer: Option<OrganizationId>,
    ) -> impl Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Marks a message read. Returns false when it does not exist.
    fn mark_read(&self, id: MessageId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Message service.
pub struct MessageService<M: MessageRepository> {
    messages: Arc<M>,
}

impl<M: MessageRepository> MessageService<M> {
    /// Create a new message service.
    #[must_use]
    pub fn new(messages: Arc<M>) -> Self {
        Self { messages }
    }

    /// Sends a message.
    ///
    /// # Errors
    ///
    /// `Validation` for empty content, `Forbidden` when the direction does
    /// not match the sender's organization.
    pub async fn send(
        &self,
        principal: &Principal,
        kind: MessageKind,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Message, MessageError> {
        if kind != MessageKind::sent_by(principal.organization_type) {
            return Err(MessageError::Forbidden(format!(
                "{} messages cannot be sent from this organization",
                kind.as_str()
            )));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(MessageError::Validation("message is empty".to_string()));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(MessageError::Validation(format!(
                "message exceeds {MAX_CONTENT_CHARS} characters"
            )));
        }

        let message = Message {
            id: MessageId::new(),
            sender_org: principal.organization_id,
            kind,
            content: content.to_string(),
            read: false,
            created_at: now,
        };
        self.messages.insert(&message).await?;
        info!(message_id = %message.id, kind = kind.as_str(), "message sent");
        Ok(message)
    }

    /// Messages visible to the caller, newest first.
    ///
    /// # Errors
    ///
    /// `Store` on read failures.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Message>, MessageError> {
        let viewer = (!principal.is_cfa()).then_some(principal.organization_id);
        Ok(self.messages.list(viewer).await?)
    }

    /// Marks a visible message read.
    ///
    /// # Errors
    ///
    /// `NotFound` for missing or invisible messages.
    pub async fn mark_read(&self, principal: &Principal, id: MessageId) -> Result<(), MessageError> {
        let message = self
            .messages
            .find(id)
            .await?
            .filter(|m| m.is_visible_to(principal.organization_id, principal.organization_type))
            .ok_or(MessageError::NotFound)?;
        if !self.messages.mark_read(message.id).await? {
            return Err(MessageError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, principal_for};
    use declara_shared::types::OrganizationKind;

    #[tokio::test]
    async fn test_regional_council_sees_broadcasts_and_own() {
        let store = Arc::new(MemoryStore::new());
        let service = MessageService::new(store);
        let cfa = principal_for(OrganizationKind::Cfa);
        let ce = principal_for(OrganizationKind::Cra);
        let sp = principal_for(OrganizationKind::Cra);
        let now = Utc::now();

        service
            .send(&cfa, MessageKind::CfaToCras, "Prazo prorrogado", now)
            .await
            .unwrap();
        service
            .send(&ce, MessageKind::CraToCfa, "Dúvida sobre a conta 1.1.1.1", now)
            .await
            .unwrap();
        service
            .send(&sp, MessageKind::CraToCfa, "Enviado", now)
            .await
            .unwrap();

        assert_eq!(service.list(&cfa).await.unwrap().len(), 3);
        let seen = service.list(&ce).await.unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|m| m.sender_org != sp.organization_id));
    }

    #[tokio::test]
    async fn test_direction_and_content_rules() {
        let service = MessageService::new(Arc::new(MemoryStore::new()));
        let cra = principal_for(OrganizationKind::Cra);
        let now = Utc::now();

        let wrong = service.send(&cra, MessageKind::CfaToCras, "oi", now).await;
        assert!(matches!(wrong, Err(MessageError::Forbidden(_))));
        let empty = service.send(&cra, MessageKind::CraToCfa, "   ", now).await;
        assert!(matches!(empty, Err(MessageError::Validation(_))));
    }

    #[tokio::test]
    async fn test_mark_read_requires_visibility() {
        let service = MessageService::new(Arc::new(MemoryStore::new()));
        let cfa = principal_for(OrganizationKind::Cfa);
        let ce = principal_for(OrganizationKind::Cra);
        let sp = principal_for(OrganizationKind::Cra);
        let message = service
            .send(&ce, MessageKind::CraToCfa, "Olá", Utc::now())
            .await
            .unwrap();

        assert!(matches!(
            service.mark_read(&sp, message.id).await,
            Err(MessageError::NotFound)
        ));
        service.mark_read(&cfa, message.id).await.unwrap();
        assert!(service.list(&cfa).await.unwrap()[0].read);
        assert!(matches!(
            service.mark_read(&cfa, MessageId::new()).await,
            Err(MessageError::NotFound)
        ));
    }
}
