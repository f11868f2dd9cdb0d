//! Messaging channel seam. Delivery is fire-and-forget relative to
//! persistence: callers log a `DeliveryError` and move on.

use async_trait::async_trait;
use thiserror::Error;

pub mod commands;
pub mod telegram;

pub use telegram::TelegramClient;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("messaging API error (status {status}): {description}")]
    Api { status: u16, description: String },
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;
}
