//! Message repository for database operations.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{corrupt, db_err};
use crate::entities::messages;
use declara_core::messages::{Message, MessageKind, MessageRepository as MessageRepoTrait};
use declara_core::store::StoreError;
use declara_shared::types::{MessageId, OrganizationId};

/// Message repository implementation.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    db: DatabaseConnection,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl MessageRepoTrait for MessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), StoreError> {
        let active_model = messages::ActiveModel {
            id: Set(message.id.into_inner()),
            sender_org: Set(message.sender_org.into_inner()),
            kind: Set(message.kind.as_str().to_string()),
            content: Set(message.content.clone()),
            read: Set(message.read),
            created_at: Set(message.created_at.into()),
        };

        active_model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find(&self, id: MessageId) -> Result<Option<Message>, StoreError> {
        let model = messages::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(to_domain).transpose()
    }

    async fn list(&self, viewer: Option<OrganizationId>) -> Result<Vec<Message>, StoreError> {
        let mut query = messages::Entity::find().order_by_desc(messages::Column::CreatedAt);
        if let Some(org) = viewer {
            query = query.filter(
                Condition::any()
                    .add(messages::Column::Kind.eq(MessageKind::CfaToCras.as_str()))
                    .add(messages::Column::SenderOrg.eq(org.into_inner())),
            );
        }

        let models = query.all(&self.db).await.map_err(db_err)?;
        models.into_iter().map(to_domain).collect()
    }

    async fn mark_read(&self, id: MessageId) -> Result<bool, StoreError> {
        let result = messages::Entity::update_many()
            .col_expr(messages::Column::Read, Expr::value(true))
            .filter(messages::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: messages::Model) -> Result<Message, StoreError> {
    let kind =
        MessageKind::parse(&model.kind).ok_or_else(|| corrupt("messages.kind", &model.kind))?;

    Ok(Message {
        id: MessageId::from_uuid(model.id),
        sender_org: OrganizationId::from_uuid(model.sender_org),
        kind,
        content: model.content,
        read: model.read,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
