//! Chat repository for internal staff messaging.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{chat_messages, users};
use pelita_shared::types::PageRequest;

/// Error types for chat operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Recipient not found or inactive.
    #[error("Recipient not found: {0}")]
    RecipientNotFound(Uuid),

    /// Messages must carry a non-empty body.
    #[error("Message body must not be empty")]
    EmptyBody,

    /// Sending to oneself is not allowed.
    #[error("Cannot send a message to yourself")]
    SelfMessage,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Chat repository.
#[derive(Debug, Clone)]
pub struct ChatRepository {
    db: DatabaseConnection,
}

impl ChatRepository {
    /// Creates a new chat repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sends a message from one user to another.
    pub async fn send(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> Result<chat_messages::Model, ChatError> {
        if body.trim().is_empty() {
            return Err(ChatError::EmptyBody);
        }
        if sender_id == recipient_id {
            return Err(ChatError::SelfMessage);
        }

        let recipient = users::Entity::find_by_id(recipient_id).one(&self.db).await?;
        match recipient {
            Some(user) if user.is_active => {}
            _ => return Err(ChatError::RecipientNotFound(recipient_id)),
        }

        let message = chat_messages::ActiveModel {
            id: Set(Uuid::now_v7()),
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            body: Set(body.trim().to_string()),
            sent_at: Set(Utc::now().into()),
            read_at: Set(None),
        };

        Ok(message.insert(&self.db).await?)
    }

    /// Lists the conversation between two users, newest first, with total
    /// count.
    pub async fn conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<chat_messages::Model>, u64), ChatError> {
        let query = chat_messages::Entity::find().filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(chat_messages::Column::SenderId.eq(user_a))
                        .add(chat_messages::Column::RecipientId.eq(user_b)),
                )
                .add(
                    Condition::all()
                        .add(chat_messages::Column::SenderId.eq(user_b))
                        .add(chat_messages::Column::RecipientId.eq(user_a)),
                ),
        );

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(chat_messages::Column::SentAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Marks every message from `sender_id` to `recipient_id` as read.
    /// Returns the number of messages touched.
    pub async fn mark_read(&self, recipient_id: Uuid, sender_id: Uuid) -> Result<u64, ChatError> {
        let result = chat_messages::Entity::update_many()
            .col_expr(
                chat_messages::Column::ReadAt,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .filter(chat_messages::Column::RecipientId.eq(recipient_id))
            .filter(chat_messages::Column::SenderId.eq(sender_id))
            .filter(chat_messages::Column::ReadAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Counts unread messages for a user.
    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<u64, ChatError> {
        Ok(chat_messages::Entity::find()
            .filter(chat_messages::Column::RecipientId.eq(recipient_id))
            .filter(chat_messages::Column::ReadAt.is_null())
            .count(&self.db)
            .await?)
    }
}
