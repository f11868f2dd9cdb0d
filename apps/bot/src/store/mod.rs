//! Persistence seam for subscribers and their delivered-content history.
//!
//! The dispatcher and the command handler only see `Arc<dyn ContentStore>`;
//! `PgContentStore` is the production backend.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::content::{ContentRecord, NewContent};
use crate::models::subscriber::Subscriber;

pub mod postgres;

pub use postgres::PgContentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Snapshot of every subscriber whose flag is set, oldest first.
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, StoreError>;

    /// Every question ever delivered to `user_id`.
    async fn get_question_history(&self, user_id: Uuid) -> Result<Vec<String>, StoreError>;

    /// Appends one record to the user's history.
    async fn insert_content(
        &self,
        user_id: Uuid,
        content: &NewContent,
    ) -> Result<ContentRecord, StoreError>;

    /// Creates the subscriber, or re-enables an existing one.
    async fn subscribe(&self, chat_id: i64) -> Result<Subscriber, StoreError>;

    /// Clears the subscription flag. Returns `false` for an unknown chat.
    async fn unsubscribe(&self, chat_id: i64) -> Result<bool, StoreError>;
}
